use actix_web::{HttpRequest, HttpResponse, web};

use crate::AppState;
use crate::auth;
use crate::controllers::method_not_allowed;
use crate::error::ApiError;
use crate::models::gallery::{CreateGalleryRequest, GalleryQuery};
use crate::services::gallery;
use crate::utils::{parse_json, parse_query, required};

pub async fn get_gallery(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    auth::verify_jwt(&req, &state.jwt)?;
    let query: GalleryQuery = parse_query(&req)?;

    match query.id {
        Some(id) => Ok(HttpResponse::Ok().json(gallery::get_gallery_item(state.store(), id).await?)),
        None => Ok(HttpResponse::Ok().json(
            gallery::list_gallery(state.store(), query.activity_id).await?,
        )),
    }
}

pub async fn create_gallery_item(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let claims = auth::verify_jwt(&req, &state.jwt)?;
    let payload: CreateGalleryRequest = parse_json(&body)?;
    let item = gallery::create_gallery_item(state.store(), &claims, payload).await?;
    Ok(HttpResponse::Created().json(item))
}

pub async fn delete_gallery_item(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let claims = auth::verify_jwt(&req, &state.jwt)?;
    let query: GalleryQuery = parse_query(&req)?;
    let id = required(query.id, "id")?;
    gallery::delete_gallery_item(state.store(), &claims, id).await?;
    Ok(HttpResponse::NoContent().finish())
}

// Item galeri tidak bisa diedit, hanya dihapus lalu diunggah ulang.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/gallery")
            .route(web::get().to(get_gallery))
            .route(web::post().to(create_gallery_item))
            .route(web::delete().to(delete_gallery_item))
            .default_service(web::to(method_not_allowed)),
    );
}
