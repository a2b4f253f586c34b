use async_trait::async_trait;
use sqlx::query_as;
use uuid::Uuid;

use super::PgStore;
use crate::models::activity::{
    Activity, ActivityPatch, ActivityRegistration, ActivityStatus, NewActivity,
};
use crate::store::{ActivityStore, StoreResult};

// Kolom tampilan untuk alias `a` (activities).
const ACTIVITY_VIEW: &str = "a.*, u.name AS created_by_name,
    (SELECT COUNT(*) FROM activity_registrations r WHERE r.activity_id = a.id) AS registered_count,
    (SELECT COUNT(*) FROM attendance t WHERE t.activity_id = a.id) AS attended_count";

#[async_trait]
impl ActivityStore for PgStore {
    async fn list_activities(&self, status: Option<ActivityStatus>) -> StoreResult<Vec<Activity>> {
        let sql = format!(
            "SELECT {ACTIVITY_VIEW}
             FROM activities a
             LEFT JOIN users u ON a.created_by = u.id
             WHERE a.deleted_at IS NULL
               AND ($1::TEXT IS NULL OR a.status = $1)
             ORDER BY a.date DESC"
        );
        let rows = query_as::<_, Activity>(&sql)
            .bind(status.map(|s| s.as_str()))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get_activity(&self, id: Uuid) -> StoreResult<Option<Activity>> {
        let sql = format!(
            "SELECT {ACTIVITY_VIEW}
             FROM activities a
             LEFT JOIN users u ON a.created_by = u.id
             WHERE a.id = $1 AND a.deleted_at IS NULL"
        );
        Ok(query_as::<_, Activity>(&sql).bind(id).fetch_optional(&self.pool).await?)
    }

    async fn find_activity_by_qr(&self, qr_code: &str) -> StoreResult<Option<Uuid>> {
        let row: Option<(Uuid,)> =
            query_as("SELECT id FROM activities WHERE qr_code = $1 AND deleted_at IS NULL")
                .bind(qr_code)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|(id,)| id))
    }

    async fn insert_activity(&self, activity: &NewActivity) -> StoreResult<Activity> {
        let sql = format!(
            "WITH a AS (
                INSERT INTO activities (title, description, date, time, location, qr_code, status,
                                        max_participants, registration_deadline, created_by)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                RETURNING *
             )
             SELECT {ACTIVITY_VIEW} FROM a LEFT JOIN users u ON a.created_by = u.id"
        );
        let row = query_as::<_, Activity>(&sql)
            .bind(&activity.title)
            .bind(&activity.description)
            .bind(activity.date)
            .bind(activity.time)
            .bind(&activity.location)
            .bind(&activity.qr_code)
            .bind(activity.status.as_str())
            .bind(activity.max_participants)
            .bind(activity.registration_deadline)
            .bind(activity.created_by)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update_activity(&self, id: Uuid, patch: &ActivityPatch) -> StoreResult<Option<Activity>> {
        let sql = format!(
            "WITH a AS (
                UPDATE activities SET
                    title = COALESCE($2, title),
                    description = COALESCE($3, description),
                    date = COALESCE($4, date),
                    time = COALESCE($5, time),
                    location = COALESCE($6, location),
                    qr_code = COALESCE($7, qr_code),
                    status = COALESCE($8, status),
                    max_participants = COALESCE($9, max_participants),
                    registration_deadline = COALESCE($10, registration_deadline),
                    updated_at = NOW()
                WHERE id = $1 AND deleted_at IS NULL
                RETURNING *
             )
             SELECT {ACTIVITY_VIEW} FROM a LEFT JOIN users u ON a.created_by = u.id"
        );
        let row = query_as::<_, Activity>(&sql)
            .bind(id)
            .bind(&patch.title)
            .bind(&patch.description)
            .bind(patch.date)
            .bind(patch.time)
            .bind(&patch.location)
            .bind(&patch.qr_code)
            .bind(patch.status.map(|s| s.as_str()))
            .bind(patch.max_participants)
            .bind(patch.registration_deadline)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn soft_delete_activity(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE activities SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_registrations(&self, activity_id: Uuid) -> StoreResult<Vec<ActivityRegistration>> {
        let rows = query_as::<_, ActivityRegistration>(
            "SELECT r.*, u.name AS user_name, u.school
             FROM activity_registrations r
             JOIN users u ON r.user_id = u.id
             WHERE r.activity_id = $1
             ORDER BY r.registered_at ASC",
        )
        .bind(activity_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn insert_registration(
        &self,
        activity_id: Uuid,
        user_id: Uuid,
        notes: Option<&str>,
    ) -> StoreResult<Option<ActivityRegistration>> {
        let row = query_as::<_, ActivityRegistration>(
            "WITH r AS (
                INSERT INTO activity_registrations (activity_id, user_id, notes)
                SELECT $1, $2, $3
                WHERE EXISTS (SELECT 1 FROM activities WHERE id = $1 AND deleted_at IS NULL)
                  AND NOT EXISTS (
                      SELECT 1 FROM activity_registrations WHERE activity_id = $1 AND user_id = $2
                  )
                RETURNING *
             )
             SELECT r.*, u.name AS user_name, u.school FROM r JOIN users u ON r.user_id = u.id",
        )
        .bind(activity_id)
        .bind(user_id)
        .bind(notes)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }
}
