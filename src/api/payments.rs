use actix_web::{web, HttpResponse};

use crate::{
    database::Store,
    models::{CreatePaymentRequest, PaymentFilter, PaymentResponse, PaymentStatusRequest},
    services::Claims,
    utils::AppError,
};

#[utoipa::path(
    post,
    path = "/payments",
    tag = "Payments",
    request_body = CreatePaymentRequest,
    responses(
        (status = 200, description = "Payment recorded", body = crate::models::InsertOutcome),
        (status = 400, description = "Missing period or invalid amount")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_payment(
    claims: web::ReqData<Claims>,
    store: web::Data<dyn Store>,
    request: web::Json<CreatePaymentRequest>,
) -> Result<HttpResponse, AppError> {
    let payment = request.into_inner().into_payment()?;
    log::info!(
        "💰 POST /payments - {} for {} by {}",
        payment.user_email,
        payment.payment_for,
        claims.email
    );

    let outcome = store.insert_payment(payment).await?;
    Ok(HttpResponse::Ok().json(outcome))
}

#[utoipa::path(
    post,
    path = "/payments-status",
    tag = "Payments",
    request_body = PaymentStatusRequest,
    responses((status = 200, description = "The payment for that period, or null when none exists", body = PaymentResponse)),
    security(("bearer_auth" = []))
)]
pub async fn payment_status(
    store: web::Data<dyn Store>,
    request: web::Json<PaymentStatusRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("🔎 POST /payments-status - {} / {}", request.email, request.payment_for);

    let payment = store
        .find_payment_for_period(&request.email, &request.payment_for)
        .await?
        .map(PaymentResponse::from);

    Ok(HttpResponse::Ok().json(payment))
}

async fn list(store: &dyn Store, filter: PaymentFilter) -> Result<HttpResponse, AppError> {
    let payments: Vec<PaymentResponse> = store
        .find_payments(filter)
        .await?
        .into_iter()
        .map(PaymentResponse::from)
        .collect();

    log::info!("✅ Found {} payments", payments.len());
    Ok(HttpResponse::Ok().json(payments))
}

#[utoipa::path(
    get,
    path = "/payments/{id}",
    tag = "Payments",
    params(("id" = String, Path, description = "The employee's user id")),
    responses((status = 200, description = "Payments of that employee, newest first", body = [PaymentResponse])),
    security(("bearer_auth" = []))
)]
pub async fn payments_by_user(
    store: web::Data<dyn Store>,
    user_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    log::info!("📋 GET /payments/{}", user_id);
    list(store.get_ref(), PaymentFilter::ByUserId(user_id.into_inner())).await
}

#[utoipa::path(
    get,
    path = "/payment-history/{email}",
    tag = "Payments",
    params(("email" = String, Path, description = "Must match the token's email")),
    responses(
        (status = 200, description = "Own payments, newest first", body = [PaymentResponse]),
        (status = 403, description = "Not the owner")
    ),
    security(("bearer_auth" = []))
)]
pub async fn payment_history(
    claims: web::ReqData<Claims>,
    store: web::Data<dyn Store>,
    email: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    log::info!("📋 GET /payment-history/{}", email);
    claims.ensure_owner(&email)?;

    list(store.get_ref(), PaymentFilter::ByEmail(email.into_inner())).await
}

#[cfg(test)]
mod tests {
    use crate::test_support::*;
    use actix_web::{http::StatusCode, test, App};
    use serde_json::{json, Value};

    fn payment(email: &str, period: &str, amount: f64) -> Value {
        json!({
            "userId": "6650f1c2a1b2c3d4e5f60718",
            "userEmail": email,
            "name": "Ana",
            "paymentFor": period,
            "amount": amount,
            "transactionId": "pi_3Abc"
        })
    }

    #[actix_web::test]
    async fn test_payment_status_match_or_null() {
        let ctx = TestContext::new();
        ctx.seed_user("hr@example.com", Role::Hr, false).await;
        let app = test::init_service(App::new().configure(ctx.configure())).await;

        let req = test::TestRequest::post()
            .uri("/payments")
            .insert_header(ctx.bearer("hr@example.com"))
            .set_json(payment("ana@example.com", "2024-05", 1200.0))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert!(body["insertedId"].is_string());

        let req = test::TestRequest::post()
            .uri("/payments-status")
            .insert_header(ctx.bearer("hr@example.com"))
            .set_json(json!({ "email": "ana@example.com", "paymentFor": "2024-05" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["userEmail"], "ana@example.com");
        assert_eq!(body["amount"], 1200.0);

        let req = test::TestRequest::post()
            .uri("/payments-status")
            .insert_header(ctx.bearer("hr@example.com"))
            .set_json(json!({ "email": "ana@example.com", "paymentFor": "2024-06" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert!(body.is_null());
    }

    #[actix_web::test]
    async fn test_employee_cannot_record_payment() {
        let ctx = TestContext::new();
        ctx.seed_user("ana@example.com", Role::Employee, false).await;
        let app = test::init_service(App::new().configure(ctx.configure())).await;

        let req = test::TestRequest::post()
            .uri("/payments")
            .insert_header(ctx.bearer("ana@example.com"))
            .set_json(payment("ana@example.com", "2024-05", 99999.0))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);
        assert_eq!(ctx.store.payment_count(), 0);
    }

    #[actix_web::test]
    async fn test_invalid_amount_is_400() {
        let ctx = TestContext::new();
        ctx.seed_user("hr@example.com", Role::Hr, false).await;
        let app = test::init_service(App::new().configure(ctx.configure())).await;

        let req = test::TestRequest::post()
            .uri("/payments")
            .insert_header(ctx.bearer("hr@example.com"))
            .set_json(payment("ana@example.com", "2024-05", -1.0))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_payment_history_newest_first_and_owner_only() {
        let ctx = TestContext::new();
        ctx.seed_user("hr@example.com", Role::Hr, false).await;
        ctx.seed_user("ana@example.com", Role::Employee, false).await;
        ctx.seed_user("bo@example.com", Role::Employee, false).await;
        let app = test::init_service(App::new().configure(ctx.configure())).await;

        for period in ["2024-04", "2024-05"] {
            let req = test::TestRequest::post()
                .uri("/payments")
                .insert_header(ctx.bearer("hr@example.com"))
                .set_json(payment("ana@example.com", period, 1000.0))
                .to_request();
            assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
        }

        let req = test::TestRequest::get()
            .uri("/payment-history/ana@example.com")
            .insert_header(ctx.bearer("ana@example.com"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let periods: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["paymentFor"].as_str().unwrap())
            .collect();
        assert_eq!(periods, vec!["2024-05", "2024-04"]);

        let req = test::TestRequest::get()
            .uri("/payment-history/ana@example.com")
            .insert_header(ctx.bearer("bo@example.com"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::get()
            .uri("/payments/6650f1c2a1b2c3d4e5f60718")
            .insert_header(ctx.bearer("hr@example.com"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.as_array().unwrap().len(), 2);
    }
}
