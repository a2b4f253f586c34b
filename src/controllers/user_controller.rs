use actix_web::{HttpRequest, HttpResponse, web};

use crate::AppState;
use crate::auth;
use crate::controllers::{method_not_allowed, public_method_not_allowed};
use crate::error::ApiError;
use crate::models::user::{CreateUserRequest, PublicUserQuery, UserPatch, UserQuery};
use crate::services::users;
use crate::utils::{parse_json, parse_patch, parse_query, required};

pub async fn get_users(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let claims = auth::verify_jwt(&req, &state.jwt)?;
    let query: UserQuery = parse_query(&req)?;

    match query.id {
        Some(id) => Ok(HttpResponse::Ok().json(users::get_user(state.store(), &claims, id).await?)),
        None => Ok(HttpResponse::Ok().json(users::list_users(state.store(), &claims).await?)),
    }
}

pub async fn create_user(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let claims = auth::verify_jwt(&req, &state.jwt)?;
    let payload: CreateUserRequest = parse_json(&body)?;
    let user = users::create_user(&state, &claims, payload).await?;
    Ok(HttpResponse::Created().json(user))
}

pub async fn update_user(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let claims = auth::verify_jwt(&req, &state.jwt)?;
    let query: UserQuery = parse_query(&req)?;
    let id = required(query.id, "id")?;
    let patch: UserPatch = parse_patch(&body)?;
    let user = users::update_user(state.store(), &claims, id, patch).await?;
    Ok(HttpResponse::Ok().json(user))
}

pub async fn delete_user(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let claims = auth::verify_jwt(&req, &state.jwt)?;
    let query: UserQuery = parse_query(&req)?;
    let id = required(query.id, "id")?;
    users::delete_user(state.store(), &claims, id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Endpoint publik, tanpa token.
pub async fn get_public(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let query: PublicUserQuery = parse_query(&req)?;
    match query.kind.as_deref() {
        Some("count") => Ok(HttpResponse::Ok().json(users::count_users(state.store()).await?)),
        _ => Ok(HttpResponse::Ok().json(users::public_members(state.store()).await?)),
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/users")
            .route(web::get().to(get_users))
            .route(web::post().to(create_user))
            .route(web::put().to(update_user))
            .route(web::delete().to(delete_user))
            .default_service(web::to(method_not_allowed)),
    )
    .service(
        web::resource("/api/users/public")
            .route(web::get().to(get_public))
            .default_service(web::to(public_method_not_allowed)),
    );
}
