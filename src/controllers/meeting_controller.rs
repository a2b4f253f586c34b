use actix_web::{HttpRequest, HttpResponse, web};

use crate::AppState;
use crate::auth;
use crate::controllers::method_not_allowed;
use crate::error::ApiError;
use crate::models::meeting::{CreateMeetingRequest, MeetingPatch, MeetingQuery};
use crate::services::meetings;
use crate::utils::{parse_json, parse_patch, parse_query, required};

pub async fn get_meetings(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    auth::verify_jwt(&req, &state.jwt)?;
    let query: MeetingQuery = parse_query(&req)?;

    match query.id {
        Some(id) => Ok(HttpResponse::Ok().json(meetings::get_meeting(state.store(), id).await?)),
        None => Ok(HttpResponse::Ok().json(
            meetings::list_meetings(state.store(), query.meeting_type).await?,
        )),
    }
}

pub async fn create_meeting(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let claims = auth::verify_jwt(&req, &state.jwt)?;
    let payload: CreateMeetingRequest = parse_json(&body)?;
    let meeting = meetings::create_meeting(state.store(), &claims, payload).await?;
    Ok(HttpResponse::Created().json(meeting))
}

pub async fn update_meeting(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let claims = auth::verify_jwt(&req, &state.jwt)?;
    let query: MeetingQuery = parse_query(&req)?;
    let id = required(query.id, "id")?;
    let patch: MeetingPatch = parse_patch(&body)?;
    let meeting = meetings::update_meeting(state.store(), &claims, id, patch).await?;
    Ok(HttpResponse::Ok().json(meeting))
}

pub async fn delete_meeting(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let claims = auth::verify_jwt(&req, &state.jwt)?;
    let query: MeetingQuery = parse_query(&req)?;
    let id = required(query.id, "id")?;
    meetings::delete_meeting(state.store(), &claims, id).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/meetings")
            .route(web::get().to(get_meetings))
            .route(web::post().to(create_meeting))
            .route(web::put().to(update_meeting))
            .route(web::delete().to(delete_meeting))
            .default_service(web::to(method_not_allowed)),
    );
}
