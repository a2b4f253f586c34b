// src/controllers/iuran_controller.rs
use actix_web::{HttpRequest, HttpResponse, web};

use crate::AppState;
use crate::auth;
use crate::controllers::method_not_allowed;
use crate::error::ApiError;
use crate::models::iuran::{
    ChecklistQuery, CreatePembayaranRequest, IuranConfigPatch, IuranConfigQuery, PembayaranPatch,
    PembayaranQuery, UpsertIuranConfigRequest,
};
use crate::services::{checklist, iuran};
use crate::utils::{parse_json, parse_patch, parse_query, required};

// ---------- /api/iuran/config ----------

pub async fn get_configs(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    auth::verify_jwt(&req, &state.jwt)?;
    let query: IuranConfigQuery = parse_query(&req)?;

    match query.id {
        Some(id) => Ok(HttpResponse::Ok().json(iuran::get_config(state.store(), id).await?)),
        None => Ok(HttpResponse::Ok().json(iuran::list_configs(state.store(), query).await?)),
    }
}

pub async fn upsert_config(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let claims = auth::verify_jwt(&req, &state.jwt)?;
    let payload: UpsertIuranConfigRequest = parse_json(&body)?;
    let config = iuran::upsert_config(state.store(), &claims, payload).await?;
    Ok(HttpResponse::Created().json(config))
}

pub async fn update_config(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let claims = auth::verify_jwt(&req, &state.jwt)?;
    let query: IuranConfigQuery = parse_query(&req)?;
    let id = required(query.id, "id")?;
    let patch: IuranConfigPatch = parse_patch(&body)?;
    let config = iuran::update_config(state.store(), &claims, id, patch).await?;
    Ok(HttpResponse::Ok().json(config))
}

pub async fn delete_config(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let claims = auth::verify_jwt(&req, &state.jwt)?;
    let query: IuranConfigQuery = parse_query(&req)?;
    let id = required(query.id, "id")?;
    iuran::delete_config(state.store(), &claims, id).await?;
    Ok(HttpResponse::NoContent().finish())
}

// ---------- /api/iuran/pembayaran ----------

pub async fn get_payments(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    auth::verify_jwt(&req, &state.jwt)?;
    let query: PembayaranQuery = parse_query(&req)?;

    match query.id {
        Some(id) => Ok(HttpResponse::Ok().json(iuran::get_payment(state.store(), id).await?)),
        None => Ok(HttpResponse::Ok().json(
            iuran::list_payments(state.store(), query.tahun, query.user_id).await?,
        )),
    }
}

pub async fn create_payment(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let claims = auth::verify_jwt(&req, &state.jwt)?;
    let payload: CreatePembayaranRequest = parse_json(&body)?;
    let payment = iuran::create_payment(state.store(), &claims, payload).await?;
    Ok(HttpResponse::Created().json(payment))
}

/// `?id=..&action=request_delete|approve_delete`; tanpa `action` berarti edit.
pub async fn update_payment(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let claims = auth::verify_jwt(&req, &state.jwt)?;
    // Semua cabang PUT butuh bendahara atau admin; cek sebelum query dibaca.
    auth::require(auth::is_bendahara_or_admin(&claims))?;
    let query: PembayaranQuery = parse_query(&req)?;
    let id = required(query.id, "id")?;
    let patch: PembayaranPatch = match query.action {
        Some(_) => PembayaranPatch::default(),
        None => parse_patch(&body)?,
    };
    let payment = iuran::update_payment(state.store(), &claims, id, query.action, patch).await?;
    Ok(HttpResponse::Ok().json(payment))
}

// ---------- /api/iuran/checklist ----------

pub async fn get_checklist(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    auth::verify_jwt(&req, &state.jwt)?;
    let query: ChecklistQuery = parse_query(&req)?;
    let rows = checklist::checklist(state.store(), query.tahun).await?;
    Ok(HttpResponse::Ok().json(rows))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/iuran/config")
            .route(web::get().to(get_configs))
            .route(web::post().to(upsert_config))
            .route(web::put().to(update_config))
            .route(web::delete().to(delete_config))
            .default_service(web::to(method_not_allowed)),
    )
    // Pembayaran tidak punya DELETE langsung; penghapusan lewat PUT ?action=.
    .service(
        web::resource("/api/iuran/pembayaran")
            .route(web::get().to(get_payments))
            .route(web::post().to(create_payment))
            .route(web::put().to(update_payment))
            .default_service(web::to(method_not_allowed)),
    )
    .service(
        web::resource("/api/iuran/checklist")
            .route(web::get().to(get_checklist))
            .default_service(web::to(method_not_allowed)),
    );
}
