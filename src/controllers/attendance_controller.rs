use actix_web::{HttpRequest, HttpResponse, web};

use crate::AppState;
use crate::auth;
use crate::controllers::method_not_allowed;
use crate::error::ApiError;
use crate::models::attendance::{AttendanceQuery, MarkAttendanceRequest};
use crate::services::attendance;
use crate::utils::{parse_json, parse_query};

pub async fn get_attendance(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    auth::verify_jwt(&req, &state.jwt)?;
    let query: AttendanceQuery = parse_query(&req)?;
    let rows = attendance::list_attendance(state.store(), query).await?;
    Ok(HttpResponse::Ok().json(rows))
}

pub async fn mark_attendance(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let claims = auth::verify_jwt(&req, &state.jwt)?;
    let payload: MarkAttendanceRequest = parse_json(&body)?;
    let row = attendance::mark_attendance(state.store(), &claims, payload).await?;
    Ok(HttpResponse::Created().json(row))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/attendance")
            .route(web::get().to(get_attendance))
            .route(web::post().to(mark_attendance))
            .default_service(web::to(method_not_allowed)),
    );
}
