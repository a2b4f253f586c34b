use async_trait::async_trait;
use sqlx::query_as;
use uuid::Uuid;

use super::PgStore;
use crate::models::meeting::{Meeting, MeetingPatch, MeetingType, NewMeeting};
use crate::store::{MeetingStore, StoreResult};

const MEETING_VIEW: &str = "m.*, u.name AS created_by_name, act.title AS activity_title";
const MEETING_JOINS: &str = "LEFT JOIN users u ON m.created_by = u.id
     LEFT JOIN activities act ON m.activity_id = act.id";

#[async_trait]
impl MeetingStore for PgStore {
    async fn list_meetings(&self, meeting_type: Option<MeetingType>) -> StoreResult<Vec<Meeting>> {
        let sql = format!(
            "SELECT {MEETING_VIEW} FROM meetings m {MEETING_JOINS}
             WHERE m.deleted_at IS NULL
               AND ($1::TEXT IS NULL OR m.meeting_type = $1)
             ORDER BY m.date DESC"
        );
        let rows = query_as::<_, Meeting>(&sql)
            .bind(meeting_type.map(|t| t.as_str()))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get_meeting(&self, id: Uuid) -> StoreResult<Option<Meeting>> {
        let sql = format!(
            "SELECT {MEETING_VIEW} FROM meetings m {MEETING_JOINS}
             WHERE m.id = $1 AND m.deleted_at IS NULL"
        );
        Ok(query_as::<_, Meeting>(&sql).bind(id).fetch_optional(&self.pool).await?)
    }

    async fn insert_meeting(&self, meeting: &NewMeeting) -> StoreResult<Meeting> {
        let sql = format!(
            "WITH m AS (
                INSERT INTO meetings (title, date, start_time, end_time, location, agenda, notes,
                                      meeting_type, activity_id, created_by)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                RETURNING *
             )
             SELECT {MEETING_VIEW} FROM m {MEETING_JOINS}"
        );
        let row = query_as::<_, Meeting>(&sql)
            .bind(&meeting.title)
            .bind(meeting.date)
            .bind(meeting.start_time)
            .bind(meeting.end_time)
            .bind(&meeting.location)
            .bind(&meeting.agenda)
            .bind(&meeting.notes)
            .bind(meeting.meeting_type.as_str())
            .bind(meeting.activity_id)
            .bind(meeting.created_by)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update_meeting(&self, id: Uuid, patch: &MeetingPatch) -> StoreResult<Option<Meeting>> {
        let sql = format!(
            "WITH m AS (
                UPDATE meetings SET
                    title = COALESCE($2, title),
                    date = COALESCE($3, date),
                    start_time = COALESCE($4, start_time),
                    end_time = COALESCE($5, end_time),
                    location = COALESCE($6, location),
                    agenda = COALESCE($7, agenda),
                    notes = COALESCE($8, notes),
                    meeting_type = COALESCE($9, meeting_type),
                    activity_id = COALESCE($10, activity_id),
                    updated_at = NOW()
                WHERE id = $1 AND deleted_at IS NULL
                RETURNING *
             )
             SELECT {MEETING_VIEW} FROM m {MEETING_JOINS}"
        );
        let row = query_as::<_, Meeting>(&sql)
            .bind(id)
            .bind(&patch.title)
            .bind(patch.date)
            .bind(patch.start_time)
            .bind(patch.end_time)
            .bind(&patch.location)
            .bind(&patch.agenda)
            .bind(&patch.notes)
            .bind(patch.meeting_type.map(|t| t.as_str()))
            .bind(patch.activity_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn soft_delete_meeting(&self, id: Uuid) -> StoreResult<bool> {
        let result =
            sqlx::query("UPDATE meetings SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
                .bind(id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
