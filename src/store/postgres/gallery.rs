use async_trait::async_trait;
use sqlx::query_as;
use uuid::Uuid;

use super::PgStore;
use crate::models::gallery::{GalleryItem, NewGalleryItem};
use crate::store::{GalleryStore, StoreResult};

#[async_trait]
impl GalleryStore for PgStore {
    async fn list_gallery(&self, activity_id: Option<Uuid>) -> StoreResult<Vec<GalleryItem>> {
        let rows = query_as::<_, GalleryItem>(
            "SELECT g.*, a.title AS activity_title
             FROM gallery g
             LEFT JOIN activities a ON g.activity_id = a.id
             WHERE g.deleted_at IS NULL
               AND ($1::UUID IS NULL OR g.activity_id = $1)
             ORDER BY g.uploaded_at DESC",
        )
        .bind(activity_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_gallery_item(&self, id: Uuid) -> StoreResult<Option<GalleryItem>> {
        let row = query_as::<_, GalleryItem>(
            "SELECT g.*, a.title AS activity_title
             FROM gallery g
             LEFT JOIN activities a ON g.activity_id = a.id
             WHERE g.id = $1 AND g.deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn insert_gallery_item(&self, item: &NewGalleryItem) -> StoreResult<GalleryItem> {
        let row = query_as::<_, GalleryItem>(
            "WITH g AS (
                INSERT INTO gallery (title, description, file_url, file_type, file_size,
                                     activity_id, uploaded_by, is_featured)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                RETURNING *
             )
             SELECT g.*, a.title AS activity_title FROM g LEFT JOIN activities a ON g.activity_id = a.id",
        )
        .bind(&item.title)
        .bind(&item.description)
        .bind(&item.file_url)
        .bind(item.file_type.as_str())
        .bind(item.file_size)
        .bind(item.activity_id)
        .bind(item.uploaded_by)
        .bind(item.is_featured)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn soft_delete_gallery_item(&self, id: Uuid) -> StoreResult<bool> {
        let result =
            sqlx::query("UPDATE gallery SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
                .bind(id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
