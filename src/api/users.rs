use actix_web::{web, HttpResponse};

use crate::{
    database::Store,
    models::{
        parse_object_id, RegisterUserRequest, RoleResponse, UpdateOutcome, UserListFilter,
        UserResponse, UserUpdate, VerifyUserRequest,
    },
    services::Claims,
    utils::AppError,
};

#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    request_body = RegisterUserRequest,
    responses(
        (status = 200, description = "User stored, or already registered (insertedId null)", body = crate::models::InsertOutcome),
        (status = 400, description = "Missing email or admin self-registration")
    )
)]
pub async fn create_user(
    store: web::Data<dyn Store>,
    request: web::Json<RegisterUserRequest>,
) -> Result<HttpResponse, AppError> {
    let user = request.into_inner().into_user()?;
    log::info!("📝 POST /users - email: {}, role: {}", user.email, user.role);

    // Uniqueness is enforced by the store.
    match store.insert_user(user).await {
        Ok(outcome) => Ok(HttpResponse::Ok().json(outcome)),
        Err(AppError::AlreadyExists(email)) => {
            log::info!("ℹ️  User already exists: {}", email);
            Ok(HttpResponse::Ok().json(serde_json::json!({
                "message": "user already exists",
                "insertedId": null
            })))
        }
        Err(e) => Err(e),
    }
}

#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User ObjectId")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, description = "No such user")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_user(
    store: web::Data<dyn Store>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    log::info!("👤 GET /users/{}", id);

    let object_id = parse_object_id(&id)?;
    let user = store
        .find_user_by_id(object_id)
        .await?
        .ok_or_else(|| AppError::NotFound("user not found".to_string()))?;

    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

#[utoipa::path(
    get,
    path = "/users/role/{email}",
    tag = "Users",
    params(("email" = String, Path, description = "Must match the token's email")),
    responses(
        (status = 200, description = "Role of the caller", body = RoleResponse),
        (status = 403, description = "Email does not belong to the token owner")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_user_role(
    claims: web::ReqData<Claims>,
    store: web::Data<dyn Store>,
    email: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    log::info!("🎭 GET /users/role/{}", email);
    claims.ensure_owner(&email)?;

    let user = store
        .find_user_by_email(&email)
        .await?
        .ok_or_else(|| AppError::NotFound("user not found".to_string()))?;

    Ok(HttpResponse::Ok().json(RoleResponse { role: user.role }))
}

async fn list(store: &dyn Store, filter: UserListFilter) -> Result<HttpResponse, AppError> {
    let users: Vec<UserResponse> = store
        .find_users(filter)
        .await?
        .into_iter()
        .map(UserResponse::from)
        .collect();

    log::info!("✅ Listed {} users ({:?})", users.len(), filter);
    Ok(HttpResponse::Ok().json(users))
}

#[utoipa::path(
    get,
    path = "/employee-list",
    tag = "Users",
    responses((status = 200, description = "All employees", body = [UserResponse])),
    security(("bearer_auth" = []))
)]
pub async fn employee_list(store: web::Data<dyn Store>) -> Result<HttpResponse, AppError> {
    log::info!("📋 GET /employee-list");
    list(store.get_ref(), UserListFilter::Employees).await
}

#[utoipa::path(
    get,
    path = "/all-employee-list",
    tag = "Users",
    responses((status = 200, description = "Verified employees and HR staff", body = [UserResponse])),
    security(("bearer_auth" = []))
)]
pub async fn all_employee_list(store: web::Data<dyn Store>) -> Result<HttpResponse, AppError> {
    log::info!("📋 GET /all-employee-list");
    list(store.get_ref(), UserListFilter::VerifiedStaff).await
}

async fn update(
    store: &dyn Store,
    raw_id: &str,
    update: UserUpdate,
    acting: &Claims,
) -> Result<HttpResponse, AppError> {
    let object_id = parse_object_id(raw_id)?;
    let outcome: UpdateOutcome = store.update_user(object_id, update).await?;

    log::info!(
        "✅ {:?} on user {} by {} (matched {}, modified {})",
        update,
        raw_id,
        acting.email,
        outcome.matched_count,
        outcome.modified_count
    );
    Ok(HttpResponse::Ok().json(outcome))
}

#[utoipa::path(
    patch,
    path = "/users/{id}",
    tag = "Users",
    request_body = VerifyUserRequest,
    params(("id" = String, Path, description = "User ObjectId")),
    responses((status = 200, description = "Update result", body = UpdateOutcome)),
    security(("bearer_auth" = []))
)]
pub async fn verify_user(
    claims: web::ReqData<Claims>,
    store: web::Data<dyn Store>,
    id: web::Path<String>,
    request: web::Json<VerifyUserRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("🔧 PATCH /users/{} - isVerified: {}", id, request.is_verified);
    update(store.get_ref(), &id, UserUpdate::Verify(request.is_verified), &claims).await
}

#[utoipa::path(
    patch,
    path = "/users/fired/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User ObjectId")),
    responses((status = 200, description = "Update result", body = UpdateOutcome)),
    security(("bearer_auth" = []))
)]
pub async fn fire_user(
    claims: web::ReqData<Claims>,
    store: web::Data<dyn Store>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    log::info!("🔧 PATCH /users/fired/{}", id);
    update(store.get_ref(), &id, UserUpdate::Fire, &claims).await
}

#[utoipa::path(
    patch,
    path = "/users/make-hr/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User ObjectId")),
    responses((status = 200, description = "Update result; matchedCount 0 unless the user is an employee", body = UpdateOutcome)),
    security(("bearer_auth" = []))
)]
pub async fn make_hr(
    claims: web::ReqData<Claims>,
    store: web::Data<dyn Store>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    log::info!("🔧 PATCH /users/make-hr/{}", id);
    update(store.get_ref(), &id, UserUpdate::PromoteToHr, &claims).await
}
