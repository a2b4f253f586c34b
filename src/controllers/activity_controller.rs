use actix_web::{HttpRequest, HttpResponse, web};

use crate::AppState;
use crate::auth;
use crate::controllers::method_not_allowed;
use crate::error::ApiError;
use crate::models::activity::{
    ActivityPatch, ActivityQuery, CreateActivityRequest, RegisterActivityRequest, RegistrationQuery,
};
use crate::services::activities;
use crate::utils::{parse_json, parse_patch, parse_query, required};

pub async fn get_activities(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    auth::verify_jwt(&req, &state.jwt)?;
    let query: ActivityQuery = parse_query(&req)?;

    match query.id {
        Some(id) => Ok(HttpResponse::Ok().json(activities::get_activity(state.store(), id).await?)),
        None => Ok(HttpResponse::Ok().json(
            activities::list_activities(state.store(), query.status).await?,
        )),
    }
}

pub async fn create_activity(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let claims = auth::verify_jwt(&req, &state.jwt)?;
    let payload: CreateActivityRequest = parse_json(&body)?;
    let activity = activities::create_activity(state.store(), &claims, payload).await?;
    Ok(HttpResponse::Created().json(activity))
}

pub async fn update_activity(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let claims = auth::verify_jwt(&req, &state.jwt)?;
    let query: ActivityQuery = parse_query(&req)?;
    let id = required(query.id, "id")?;
    let patch: ActivityPatch = parse_patch(&body)?;
    let activity = activities::update_activity(state.store(), &claims, id, patch).await?;
    Ok(HttpResponse::Ok().json(activity))
}

pub async fn delete_activity(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let claims = auth::verify_jwt(&req, &state.jwt)?;
    let query: ActivityQuery = parse_query(&req)?;
    let id = required(query.id, "id")?;
    activities::delete_activity(state.store(), &claims, id).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn get_registrations(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    auth::verify_jwt(&req, &state.jwt)?;
    let query: RegistrationQuery = parse_query(&req)?;
    let registrations = activities::list_registrations(state.store(), query.activity_id).await?;
    Ok(HttpResponse::Ok().json(registrations))
}

pub async fn register(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let claims = auth::verify_jwt(&req, &state.jwt)?;
    let payload: RegisterActivityRequest = parse_json(&body)?;
    let registration = activities::register(state.store(), &claims, payload).await?;
    Ok(HttpResponse::Created().json(registration))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/activities")
            .route(web::get().to(get_activities))
            .route(web::post().to(create_activity))
            .route(web::put().to(update_activity))
            .route(web::delete().to(delete_activity))
            .default_service(web::to(method_not_allowed)),
    )
    .service(
        web::resource("/api/activities/register")
            .route(web::get().to(get_registrations))
            .route(web::post().to(register))
            .default_service(web::to(method_not_allowed)),
    );
}
