use actix_web::{web, HttpResponse};

use crate::{
    database::Store,
    services::auth_service::{self, TokenRequest, TokenResponse},
    services::TokenService,
    utils::AppError,
};

#[utoipa::path(
    post,
    path = "/jwt",
    tag = "Auth",
    request_body = TokenRequest,
    responses(
        (status = 200, description = "Token issued, valid for one hour", body = TokenResponse),
        (status = 403, description = "The account has been terminated")
    )
)]
pub async fn issue_token(
    store: web::Data<dyn Store>,
    tokens: web::Data<TokenService>,
    request: web::Json<TokenRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("🔐 POST /jwt - email: {}", request.email);

    let token = auth_service::issue_for_user(store.get_ref(), &tokens, request.into_inner()).await?;

    Ok(HttpResponse::Ok().json(TokenResponse { token }))
}
