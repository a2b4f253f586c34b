use actix_web::{HttpRequest, HttpResponse, web};

use crate::AppState;
use crate::auth;
use crate::error::ApiError;

pub mod activity_controller;
pub mod attendance_controller;
pub mod audit_log_controller;
pub mod auth_controller;
pub mod gallery_controller;
pub mod iuran_controller;
pub mod meeting_controller;
pub mod transaction_controller;
pub mod user_controller;

/// Method yang tidak didukung pada resource terproteksi: token tetap dicek dulu.
pub async fn method_not_allowed(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    auth::verify_jwt(&req, &state.jwt)?;
    Err(ApiError::MethodNotAllowed)
}

pub async fn public_method_not_allowed() -> Result<HttpResponse, ApiError> {
    Err(ApiError::MethodNotAllowed)
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    auth_controller::configure(cfg);
    user_controller::configure(cfg);
    activity_controller::configure(cfg);
    attendance_controller::configure(cfg);
    meeting_controller::configure(cfg);
    transaction_controller::configure(cfg);
    gallery_controller::configure(cfg);
    iuran_controller::configure(cfg);
    audit_log_controller::configure(cfg);
}
