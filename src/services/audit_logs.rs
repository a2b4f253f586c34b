use crate::auth::{Claims, is_admin, require};
use crate::error::ApiError;
use crate::models::audit_log::AuditLog;
use crate::store::Store;

pub const DEFAULT_LIMIT: i64 = 50;
pub const MAX_LIMIT: i64 = 200;

pub async fn list_audit_logs(
    store: &dyn Store,
    claims: &Claims,
    limit: Option<i64>,
) -> Result<Vec<AuditLog>, ApiError> {
    require(is_admin(claims))?;
    let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    Ok(store.list_audit_logs(limit).await?)
}
