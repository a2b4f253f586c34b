use actix_web::{HttpRequest, HttpResponse, web};

use crate::AppState;
use crate::auth;
use crate::controllers::method_not_allowed;
use crate::error::ApiError;
use crate::models::audit_log::AuditLogQuery;
use crate::services::audit_logs;
use crate::utils::parse_query;

pub async fn get_audit_logs(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let claims = auth::verify_jwt(&req, &state.jwt)?;
    let query: AuditLogQuery = parse_query(&req)?;
    let logs = audit_logs::list_audit_logs(state.store(), &claims, query.limit).await?;
    Ok(HttpResponse::Ok().json(logs))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/audit-logs")
            .route(web::get().to(get_audit_logs))
            .default_service(web::to(method_not_allowed)),
    );
}
