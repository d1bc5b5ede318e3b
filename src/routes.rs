use actix_web::{guard, web};

use crate::{
    api,
    middleware::{JwtAuth, RequireRole},
    models::Role,
    utils::AppError,
};

/// Malformed bodies answer `{"message": ..}` like every other error.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        log::warn!("❌ Rejected request body: {}", err);
        AppError::InvalidRequest(err.to_string()).into()
    })
}

/// Full route table. `wrap` order matters: the last one added runs first, so
/// `JwtAuth` always precedes `RequireRole`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config());

    cfg
        // Public
        .route("/", web::get().to(api::health::root))
        .route("/health", web::get().to(api::health::health_check))
        .route("/jwt", web::post().to(api::auth::issue_token))
        .route("/users", web::post().to(api::users::create_user))

        // ==================== USERS ====================
        .service(
            web::resource("/users/role/{email}")
                .wrap(JwtAuth)
                .route(web::get().to(api::users::get_user_role))
        )
        .service(
            web::resource("/users/fired/{id}")
                .wrap(RequireRole::admin())
                .wrap(JwtAuth)
                .route(web::patch().to(api::users::fire_user))
        )
        .service(
            web::resource("/users/make-hr/{id}")
                .wrap(RequireRole::admin())
                .wrap(JwtAuth)
                .route(web::patch().to(api::users::make_hr))
        )
        // Same path, different audiences: resource guards let routing fall through by method
        .service(
            web::resource("/users/{id}")
                .guard(guard::Get())
                .wrap(RequireRole::any_of(&[Role::Hr, Role::Admin]))
                .wrap(JwtAuth)
                .route(web::get().to(api::users::get_user))
        )
        .service(
            web::resource("/users/{id}")
                .guard(guard::Patch())
                .wrap(RequireRole::hr())
                .wrap(JwtAuth)
                .route(web::patch().to(api::users::verify_user))
        )
        .service(
            web::resource("/employee-list")
                .wrap(RequireRole::hr())
                .wrap(JwtAuth)
                .route(web::get().to(api::users::employee_list))
        )
        .service(
            web::resource("/all-employee-list")
                .wrap(RequireRole::admin())
                .wrap(JwtAuth)
                .route(web::get().to(api::users::all_employee_list))
        )

        // ==================== PAYMENTS ====================
        .service(
            web::resource("/payments")
                .wrap(RequireRole::hr())
                .wrap(JwtAuth)
                .route(web::post().to(api::payments::create_payment))
        )
        .service(
            web::resource("/payments-status")
                .wrap(RequireRole::hr())
                .wrap(JwtAuth)
                .route(web::post().to(api::payments::payment_status))
        )
        .service(
            web::resource("/payments/{id}")
                .wrap(RequireRole::hr())
                .wrap(JwtAuth)
                .route(web::get().to(api::payments::payments_by_user))
        )
        .service(
            web::resource("/payment-history/{email}")
                .wrap(RequireRole::employee())
                .wrap(JwtAuth)
                .route(web::get().to(api::payments::payment_history))
        )
        .service(
            web::resource("/create-payment-intent")
                .wrap(RequireRole::hr())
                .wrap(JwtAuth)
                .route(web::post().to(api::payment_intents::create_payment_intent))
        )

        // ==================== WORK SHEETS ====================
        .service(
            web::resource("/work-sheets")
                .guard(guard::Post())
                .wrap(RequireRole::employee())
                .wrap(JwtAuth)
                .route(web::post().to(api::work_sheets::submit_work_sheet))
        )
        .service(
            web::resource("/work-sheets")
                .guard(guard::Get())
                .wrap(RequireRole::hr())
                .wrap(JwtAuth)
                .route(web::get().to(api::work_sheets::list_work_sheets))
        )
        .service(
            web::resource("/work-sheets/{email}")
                .wrap(RequireRole::employee())
                .wrap(JwtAuth)
                .route(web::get().to(api::work_sheets::work_sheets_by_email))
        );
}
