use async_trait::async_trait;
use sqlx::query_as;

use super::PgStore;
use crate::models::attendance::{Attendance, AttendanceQuery, NewAttendance};
use crate::store::{AttendanceStore, StoreResult};

#[async_trait]
impl AttendanceStore for PgStore {
    async fn list_attendance(&self, filter: &AttendanceQuery) -> StoreResult<Vec<Attendance>> {
        let rows = query_as::<_, Attendance>(
            "SELECT a.*, u.name AS user_name, act.title AS activity_title
             FROM attendance a
             JOIN users u ON a.user_id = u.id
             JOIN activities act ON a.activity_id = act.id
             WHERE act.deleted_at IS NULL
               AND ($1::UUID IS NULL OR a.activity_id = $1)
               AND ($2::UUID IS NULL OR a.user_id = $2)
             ORDER BY a.attended_at DESC",
        )
        .bind(filter.activity_id)
        .bind(filter.user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn upsert_attendance(&self, attendance: &NewAttendance) -> StoreResult<Option<Attendance>> {
        let row = query_as::<_, Attendance>(
            "WITH a AS (
                INSERT INTO attendance (activity_id, user_id, check_in_method, notes)
                SELECT $1, $2, $3, $4
                WHERE EXISTS (SELECT 1 FROM activities WHERE id = $1 AND deleted_at IS NULL)
                ON CONFLICT (activity_id, user_id) DO UPDATE SET
                    attended_at = NOW(),
                    check_in_method = EXCLUDED.check_in_method,
                    notes = COALESCE(EXCLUDED.notes, attendance.notes)
                RETURNING *
             )
             SELECT a.*, u.name AS user_name, act.title AS activity_title
             FROM a
             JOIN users u ON a.user_id = u.id
             JOIN activities act ON a.activity_id = act.id",
        )
        .bind(attendance.activity_id)
        .bind(attendance.user_id)
        .bind(attendance.check_in_method.as_str())
        .bind(&attendance.notes)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }
}
