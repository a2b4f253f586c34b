use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeetingType {
    Regular,
    Emergency,
    Planning,
    Evaluation,
}

text_enum!(MeetingType {
    Regular => "regular",
    Emergency => "emergency",
    Planning => "planning",
    Evaluation => "evaluation",
});

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Meeting {
    pub id: Uuid,
    pub title: String,
    pub date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub location: Option<String>,
    pub agenda: Option<String>,
    pub notes: Option<String>,
    #[sqlx(try_from = "String")]
    pub meeting_type: MeetingType,
    pub activity_id: Option<Uuid>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[sqlx(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by_name: Option<String>,
    #[sqlx(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateMeetingRequest {
    pub title: Option<String>,
    pub date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub location: Option<String>,
    pub agenda: Option<String>,
    pub notes: Option<String>,
    pub meeting_type: Option<MeetingType>,
    pub activity_id: Option<Uuid>,
}

#[derive(Debug, Clone)]
pub struct NewMeeting {
    pub title: String,
    pub date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub location: Option<String>,
    pub agenda: Option<String>,
    pub notes: Option<String>,
    pub meeting_type: MeetingType,
    pub activity_id: Uuid,
    pub created_by: Uuid,
}

#[derive(Debug, Default, Deserialize)]
pub struct MeetingPatch {
    pub title: Option<String>,
    pub date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub location: Option<String>,
    pub agenda: Option<String>,
    pub notes: Option<String>,
    pub meeting_type: Option<MeetingType>,
    pub activity_id: Option<Uuid>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MeetingQuery {
    pub id: Option<Uuid>,
    #[serde(rename = "type")]
    pub meeting_type: Option<MeetingType>,
}
