use actix_web::{web, HttpResponse};

use crate::{
    database::Store,
    models::{CreateWorkSheetRequest, WorkSheetResponse},
    services::Claims,
    utils::AppError,
};

#[utoipa::path(
    post,
    path = "/work-sheets",
    tag = "Work sheets",
    request_body = CreateWorkSheetRequest,
    responses(
        (status = 200, description = "Work sheet stored", body = crate::models::InsertOutcome),
        (status = 403, description = "employeeEmail is not the caller's")
    ),
    security(("bearer_auth" = []))
)]
pub async fn submit_work_sheet(
    claims: web::ReqData<Claims>,
    store: web::Data<dyn Store>,
    request: web::Json<CreateWorkSheetRequest>,
) -> Result<HttpResponse, AppError> {
    let sheet = request.into_inner().into_work_sheet()?;
    log::info!("🗒️  POST /work-sheets - {}", sheet.employee_email);
    claims.ensure_owner(&sheet.employee_email)?;

    let outcome = store.insert_work_sheet(sheet).await?;
    Ok(HttpResponse::Ok().json(outcome))
}

async fn list(store: &dyn Store, employee_email: Option<&str>) -> Result<HttpResponse, AppError> {
    let sheets: Vec<WorkSheetResponse> = store
        .find_work_sheets(employee_email)
        .await?
        .into_iter()
        .map(WorkSheetResponse::from)
        .collect();

    log::info!("✅ Found {} work sheets", sheets.len());
    Ok(HttpResponse::Ok().json(sheets))
}

#[utoipa::path(
    get,
    path = "/work-sheets",
    tag = "Work sheets",
    responses((status = 200, description = "Every submitted work sheet, newest first")),
    security(("bearer_auth" = []))
)]
pub async fn list_work_sheets(store: web::Data<dyn Store>) -> Result<HttpResponse, AppError> {
    log::info!("📋 GET /work-sheets");
    list(store.get_ref(), None).await
}

#[utoipa::path(
    get,
    path = "/work-sheets/{email}",
    tag = "Work sheets",
    params(("email" = String, Path, description = "Must match the token's email")),
    responses(
        (status = 200, description = "Own work sheets, newest first"),
        (status = 403, description = "Not the owner")
    ),
    security(("bearer_auth" = []))
)]
pub async fn work_sheets_by_email(
    claims: web::ReqData<Claims>,
    store: web::Data<dyn Store>,
    email: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    log::info!("📋 GET /work-sheets/{}", email);
    claims.ensure_owner(&email)?;

    list(store.get_ref(), Some(email.as_str())).await
}
