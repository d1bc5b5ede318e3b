use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    InvalidRequest(String),
    #[error("{0}")]
    AlreadyExists(String),
    #[error("Database error: {0}")]
    Database(String),
    #[error("Token error: {0}")]
    Token(String),
    #[error("Payment provider error: {0}")]
    PaymentProvider(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    pub fn forbidden() -> Self {
        AppError::Forbidden("forbidden access".to_string())
    }

    /// Message exposed to the client; internal details stay in the logs.
    fn public_message(&self) -> String {
        match self {
            AppError::Database(_) => "database error".to_string(),
            AppError::Token(_) => "failed to issue token".to_string(),
            AppError::Config(_) => "server misconfigured".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(e: mongodb::error::Error) -> Self {
        AppError::Database(e.to_string())
    }
}

impl From<mongodb::bson::ser::Error> for AppError {
    fn from(e: mongodb::bson::ser::Error) -> Self {
        AppError::Database(format!("serialization failed: {}", e))
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::AlreadyExists(_) => StatusCode::CONFLICT,
            AppError::PaymentProvider(_) => StatusCode::BAD_GATEWAY,
            AppError::Database(_) | AppError::Token(_) | AppError::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() || status == StatusCode::BAD_GATEWAY {
            log::error!("❌ {}", self);
        }

        HttpResponse::build(status).json(serde_json::json!({
            "message": self.public_message()
        }))
    }
}
