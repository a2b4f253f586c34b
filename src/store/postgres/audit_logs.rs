use async_trait::async_trait;
use sqlx::query_as;

use super::PgStore;
use crate::models::audit_log::AuditLog;
use crate::store::{AuditLogStore, StoreResult};

#[async_trait]
impl AuditLogStore for PgStore {
    async fn list_audit_logs(&self, limit: i64) -> StoreResult<Vec<AuditLog>> {
        let rows = query_as::<_, AuditLog>(
            "SELECT l.id, l.table_name, l.record_id::TEXT AS record_id, l.action,
                    l.old_values, l.new_values, l.user_id, l.created_at, u.name AS user_name
             FROM audit_logs l
             LEFT JOIN users u ON l.user_id = u.id
             ORDER BY l.created_at DESC
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
