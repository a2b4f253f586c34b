use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityStatus {
    Draft,
    Active,
    Completed,
    Cancelled,
}

text_enum!(ActivityStatus {
    Draft => "draft",
    Active => "active",
    Completed => "completed",
    Cancelled => "cancelled",
});

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Activity {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
    pub location: Option<String>,
    pub qr_code: String,
    #[sqlx(try_from = "String")]
    pub status: ActivityStatus,
    pub max_participants: Option<i32>,
    pub registration_deadline: Option<NaiveDate>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[sqlx(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by_name: Option<String>,
    #[sqlx(default)]
    pub registered_count: i64,
    #[sqlx(default)]
    pub attended_count: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateActivityRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub location: Option<String>,
    pub qr_code: Option<String>,
    pub status: Option<ActivityStatus>,
    pub max_participants: Option<i32>,
    pub registration_deadline: Option<NaiveDate>,
}

#[derive(Debug, Clone)]
pub struct NewActivity {
    pub title: String,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
    pub location: Option<String>,
    pub qr_code: String,
    pub status: ActivityStatus,
    pub max_participants: Option<i32>,
    pub registration_deadline: Option<NaiveDate>,
    pub created_by: Uuid,
}

#[derive(Debug, Default, Deserialize)]
pub struct ActivityPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub location: Option<String>,
    pub qr_code: Option<String>,
    pub status: Option<ActivityStatus>,
    pub max_participants: Option<i32>,
    pub registration_deadline: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ActivityQuery {
    pub id: Option<Uuid>,
    pub status: Option<ActivityStatus>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    Registered,
    Cancelled,
    Waitlist,
}

text_enum!(RegistrationStatus {
    Registered => "registered",
    Cancelled => "cancelled",
    Waitlist => "waitlist",
});

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ActivityRegistration {
    pub id: Uuid,
    pub activity_id: Uuid,
    pub user_id: Uuid,
    pub registered_at: DateTime<Utc>,
    #[sqlx(try_from = "String")]
    pub status: RegistrationStatus,
    pub notes: Option<String>,
    #[sqlx(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[sqlx(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RegisterActivityRequest {
    pub activity_id: Uuid,
    pub user_id: Option<Uuid>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RegistrationQuery {
    pub activity_id: Option<Uuid>,
}
