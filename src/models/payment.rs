use mongodb::bson::{doc, oid::ObjectId, DateTime as BsonDateTime, Document};
use serde::{Deserialize, Serialize};

use crate::utils::AppError;

/// Document of the `payments` collection. Written once by HR, never updated.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: String,
    pub user_email: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,
    /// Pay period, e.g. "2024-05".
    pub payment_for: String,
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub transaction_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub created_at: Option<BsonDateTime>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentRequest {
    pub user_id: String,
    pub user_email: String,
    pub name: Option<String>,
    pub payment_for: String,
    pub amount: f64,
    pub transaction_id: Option<String>,
}

impl CreatePaymentRequest {
    pub fn into_payment(self) -> Result<Payment, AppError> {
        if self.user_email.trim().is_empty() || self.user_id.trim().is_empty() {
            return Err(AppError::InvalidRequest("userId and userEmail are required".to_string()));
        }
        if self.payment_for.trim().is_empty() {
            return Err(AppError::InvalidRequest("paymentFor is required".to_string()));
        }
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(AppError::InvalidRequest("amount must be a positive number".to_string()));
        }

        Ok(Payment {
            id: None,
            user_id: self.user_id,
            user_email: self.user_email.trim().to_string(),
            name: self.name,
            payment_for: self.payment_for.trim().to_string(),
            amount: self.amount,
            transaction_id: self.transaction_id,
            created_at: Some(BsonDateTime::now()),
        })
    }
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatusRequest {
    #[serde(alias = "userEmail")]
    pub email: String,
    pub payment_for: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    pub user_email: String,
    pub name: Option<String>,
    pub payment_for: String,
    pub amount: f64,
    pub transaction_id: Option<String>,
    pub created_at: Option<String>,
}

impl From<Payment> for PaymentResponse {
    fn from(payment: Payment) -> Self {
        PaymentResponse {
            id: payment.id.map(|id| id.to_hex()).unwrap_or_default(),
            user_id: payment.user_id,
            user_email: payment.user_email,
            name: payment.name,
            payment_for: payment.payment_for,
            amount: payment.amount,
            transaction_id: payment.transaction_id,
            created_at: payment.created_at.and_then(|t| t.try_to_rfc3339_string().ok()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentFilter {
    ByUserId(String),
    ByEmail(String),
}

impl PaymentFilter {
    pub fn to_document(&self) -> Document {
        match self {
            PaymentFilter::ByUserId(user_id) => doc! { "userId": user_id },
            PaymentFilter::ByEmail(email) => doc! { "userEmail": email },
        }
    }
}
