use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckInMethod {
    QrCode,
    Manual,
}

text_enum!(CheckInMethod {
    QrCode => "qr_code",
    Manual => "manual",
});

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Attendance {
    pub id: Uuid,
    pub activity_id: Uuid,
    pub user_id: Uuid,
    pub attended_at: DateTime<Utc>,
    #[sqlx(try_from = "String")]
    pub check_in_method: CheckInMethod,
    pub notes: Option<String>,
    #[sqlx(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[sqlx(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_title: Option<String>,
}

/// Presensi bisa dikirim dengan `activity_id` atau kode QR kegiatan.
#[derive(Debug, Deserialize)]
pub struct MarkAttendanceRequest {
    pub activity_id: Option<Uuid>,
    pub qr_code: Option<String>,
    pub user_id: Option<Uuid>,
    pub check_in_method: Option<CheckInMethod>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewAttendance {
    pub activity_id: Uuid,
    pub user_id: Uuid,
    pub check_in_method: CheckInMethod,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AttendanceQuery {
    pub activity_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
}
