use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Image,
    Video,
    Document,
}

text_enum!(FileType {
    Image => "image",
    Video => "video",
    Document => "document",
});

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GalleryItem {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub file_url: String,
    #[sqlx(try_from = "String")]
    pub file_type: FileType,
    pub file_size: Option<i64>,
    pub activity_id: Option<Uuid>,
    pub uploaded_by: Option<Uuid>,
    pub is_featured: bool,
    pub uploaded_at: DateTime<Utc>,
    #[sqlx(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateGalleryRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub file_url: Option<String>,
    pub file_type: Option<FileType>,
    pub file_size: Option<i64>,
    pub activity_id: Option<Uuid>,
    pub is_featured: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct NewGalleryItem {
    pub title: String,
    pub description: Option<String>,
    pub file_url: String,
    pub file_type: FileType,
    pub file_size: Option<i64>,
    pub activity_id: Option<Uuid>,
    pub is_featured: bool,
    pub uploaded_by: Uuid,
}

#[derive(Debug, Default, Deserialize)]
pub struct GalleryQuery {
    pub id: Option<Uuid>,
    pub activity_id: Option<Uuid>,
}
