use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::{
    services::{stripe_service::salary_to_cents, PaymentGateway},
    utils::AppError,
};

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct PaymentIntentRequest {
    pub salary: f64,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentResponse {
    pub client_secret: String,
}

#[utoipa::path(
    post,
    path = "/create-payment-intent",
    tag = "Payments",
    request_body = PaymentIntentRequest,
    responses(
        (status = 200, description = "Stripe client secret", body = PaymentIntentResponse),
        (status = 400, description = "Salary is not a positive number"),
        (status = 502, description = "Stripe refused or was unreachable")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_payment_intent(
    gateway: web::Data<dyn PaymentGateway>,
    request: web::Json<PaymentIntentRequest>,
) -> Result<HttpResponse, AppError> {
    let amount = salary_to_cents(request.salary)?;
    log::info!("💳 POST /create-payment-intent - salary {} -> {} cents", request.salary, amount);

    let client_secret = gateway.create_payment_intent(amount).await?;

    Ok(HttpResponse::Ok().json(PaymentIntentResponse { client_secret }))
}
