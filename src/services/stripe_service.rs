use async_trait::async_trait;
use serde::Deserialize;

use crate::utils::AppError;

const STRIPE_API_BASE: &str = "https://api.stripe.com/v1";
const CURRENCY: &str = "usd";

/// Provider that turns an amount into a client-side payment intent.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Returns the intent's client secret. `amount` is in cents.
    async fn create_payment_intent(&self, amount: i64) -> Result<String, AppError>;
}

/// Converts a salary figure to integer cents, truncating sub-cent fractions.
pub fn salary_to_cents(salary: f64) -> Result<i64, AppError> {
    if !salary.is_finite() || salary <= 0.0 {
        return Err(AppError::InvalidRequest("salary must be a positive number".to_string()));
    }

    let cents = (salary * 100.0).trunc();
    if cents < 1.0 || cents > i64::MAX as f64 {
        return Err(AppError::InvalidRequest("salary is out of range".to_string()));
    }

    Ok(cents as i64)
}

#[derive(Debug, Deserialize)]
struct PaymentIntent {
    id: String,
    client_secret: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    error: StripeErrorDetail,
}

#[derive(Debug, Deserialize)]
struct StripeErrorDetail {
    message: Option<String>,
}

pub struct StripeGateway {
    client: reqwest::Client,
    secret_key: String,
    base_url: String,
}

impl StripeGateway {
    pub fn new(secret_key: &str) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| AppError::PaymentProvider(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            secret_key: secret_key.to_string(),
            base_url: STRIPE_API_BASE.to_string(),
        })
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn create_payment_intent(&self, amount: i64) -> Result<String, AppError> {
        log::info!("💳 Creating payment intent: {} {} cents", amount, CURRENCY);

        let url = format!("{}/payment_intents", self.base_url);
        let form = [
            ("amount", amount.to_string()),
            ("currency", CURRENCY.to_string()),
            ("payment_method_types[]", "card".to_string()),
        ];

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.secret_key)
            .form(&form)
            .send()
            .await
            .map_err(|e| AppError::PaymentProvider(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<StripeErrorBody>()
                .await
                .ok()
                .and_then(|body| body.error.message)
                .unwrap_or_else(|| status.to_string());
            return Err(AppError::PaymentProvider(message));
        }

        let intent: PaymentIntent = response
            .json()
            .await
            .map_err(|e| AppError::PaymentProvider(format!("failed to parse payment intent: {}", e)))?;

        log::info!("✅ Payment intent created: {}", intent.id);

        intent
            .client_secret
            .ok_or_else(|| AppError::PaymentProvider("payment intent has no client secret".to_string()))
    }
}
