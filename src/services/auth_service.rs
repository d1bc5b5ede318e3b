use crate::{database::Store, utils::AppError};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Claim names the service sets itself; a client payload cannot override them.
const RESERVED_CLAIMS: [&str; 5] = ["email", "iat", "exp", "nbf", "jti"];

// JWT Claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub email: String,
    pub iat: usize,            // issued at
    pub exp: usize,            // expiration
    pub jti: String,           // JWT ID
    /// Remaining user-info fields from the `/jwt` request, embedded verbatim.
    #[serde(flatten)]
    pub profile: Map<String, Value>,
}

impl Claims {
    /// Rejects requests that address another user's data.
    pub fn ensure_owner(&self, email: &str) -> Result<(), AppError> {
        if self.email == email {
            Ok(())
        } else {
            log::warn!("🚫 {} tried to access data of {}", self.email, email);
            Err(AppError::forbidden())
        }
    }
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct TokenRequest {
    pub email: String,
    /// Any other user-info fields (name, photo, ...).
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub profile: Map<String, Value>,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct TokenResponse {
    pub token: String,
}

/// Signs and verifies the HS256 access tokens.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::hours(1),
        }
    }

    #[cfg(test)]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn issue(&self, email: &str, mut profile: Map<String, Value>) -> Result<String, AppError> {
        for claim in RESERVED_CLAIMS {
            profile.remove(claim);
        }

        let now = Utc::now();
        let claims = Claims {
            email: email.to_string(),
            iat: now.timestamp() as usize,
            exp: (now + self.ttl).timestamp().max(0) as usize,
            jti: Uuid::new_v4().to_string(),
            profile,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Token(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        let validation = Validation::new(Algorithm::HS256);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                log::debug!("Token rejected: {}", e);
                AppError::Unauthorized("invalid token".to_string())
            })
    }
}

/// Issues a token for the user-info payload unless the matching account was fired.
pub async fn issue_for_user(
    store: &dyn Store,
    tokens: &TokenService,
    request: TokenRequest,
) -> Result<String, AppError> {
    let email = request.email.trim();
    if email.is_empty() {
        return Err(AppError::InvalidRequest("email is required".to_string()));
    }

    if let Some(user) = store.find_user_by_email(email).await? {
        if user.is_fired {
            log::warn!("🚫 Token refused for fired user {}", email);
            return Err(AppError::Forbidden("this account has been terminated".to_string()));
        }
    }

    tokens.issue(email, request.profile)
}
