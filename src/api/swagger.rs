use utoipa::OpenApi;
use utoipa::openapi::security::{SecurityScheme, HttpAuthScheme, HttpBuilder};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Employee Service API",
        version = "1.0.0",
        description = "REST backend for employee management. \n\n**Authentication:** obtain a token from `POST /jwt` and send it as `Authorization: Bearer <token>`. Tokens expire after one hour.\n\n**Roles:**\n- employee: submits work sheets, reads own payment history\n- hr: verifies employees, records payments, reads work sheets\n- admin: fires users and promotes employees to HR"
    ),
    paths(
        // Auth
        crate::api::auth::issue_token,

        // Users
        crate::api::users::create_user,
        crate::api::users::get_user,
        crate::api::users::get_user_role,
        crate::api::users::employee_list,
        crate::api::users::all_employee_list,
        crate::api::users::verify_user,
        crate::api::users::fire_user,
        crate::api::users::make_hr,

        // Payments
        crate::api::payments::create_payment,
        crate::api::payments::payment_status,
        crate::api::payments::payments_by_user,
        crate::api::payments::payment_history,
        crate::api::payment_intents::create_payment_intent,

        // Work sheets
        crate::api::work_sheets::submit_work_sheet,
        crate::api::work_sheets::list_work_sheets,
        crate::api::work_sheets::work_sheets_by_email,

        // Health
        crate::api::health::health_check,
    ),
    components(
        schemas(
            crate::services::auth_service::TokenRequest,
            crate::services::auth_service::TokenResponse,
            crate::models::Role,
            crate::models::RegisterUserRequest,
            crate::models::VerifyUserRequest,
            crate::models::UserResponse,
            crate::models::RoleResponse,
            crate::models::CreatePaymentRequest,
            crate::models::PaymentStatusRequest,
            crate::models::PaymentResponse,
            crate::models::CreateWorkSheetRequest,
            crate::models::InsertOutcome,
            crate::models::UpdateOutcome,
            crate::api::payment_intents::PaymentIntentRequest,
            crate::api::payment_intents::PaymentIntentResponse,
            crate::api::health::HealthResponse,
        )
    ),
    tags(
        (name = "Auth", description = "Token issuance. Fired users are refused."),
        (name = "Users", description = "Registration, role lookup, verification, termination and promotion."),
        (name = "Payments", description = "Salary payment records and Stripe payment intents."),
        (name = "Work sheets", description = "Work submitted by employees."),
        (name = "Health", description = "Service and database status."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token from POST /jwt"))
                        .build()
                ),
            );
        }
    }
}
