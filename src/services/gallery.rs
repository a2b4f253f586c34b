use uuid::Uuid;

use super::not_found;
use crate::auth::{Claims, is_admin, require};
use crate::error::ApiError;
use crate::models::gallery::{CreateGalleryRequest, FileType, GalleryItem, NewGalleryItem};
use crate::store::Store;
use crate::utils::required_text;

pub async fn list_gallery(
    store: &dyn Store,
    activity_id: Option<Uuid>,
) -> Result<Vec<GalleryItem>, ApiError> {
    Ok(store.list_gallery(activity_id).await?)
}

pub async fn get_gallery_item(store: &dyn Store, id: Uuid) -> Result<GalleryItem, ApiError> {
    store.get_gallery_item(id).await?.ok_or_else(|| not_found("Galeri", id))
}

/// Hanya menyimpan URL; file di-hosting di luar aplikasi ini.
pub async fn create_gallery_item(
    store: &dyn Store,
    claims: &Claims,
    payload: CreateGalleryRequest,
) -> Result<GalleryItem, ApiError> {
    require(is_admin(claims))?;

    let item = NewGalleryItem {
        title: required_text(payload.title, "title")?,
        description: payload.description,
        file_url: required_text(payload.file_url, "file_url")?,
        file_type: payload.file_type.unwrap_or(FileType::Image),
        file_size: payload.file_size,
        activity_id: payload.activity_id,
        is_featured: payload.is_featured.unwrap_or(false),
        uploaded_by: claims.user_id,
    };

    Ok(store.insert_gallery_item(&item).await?)
}

pub async fn delete_gallery_item(store: &dyn Store, claims: &Claims, id: Uuid) -> Result<(), ApiError> {
    require(is_admin(claims))?;
    store.soft_delete_gallery_item(id).await?;
    Ok(())
}
