use actix_web::{HttpResponse, web};

use crate::AppState;
use crate::controllers::public_method_not_allowed;
use crate::error::ApiError;
use crate::models::user::{LoginRequest, SignupRequest};
use crate::services;
use crate::utils::parse_json;

pub async fn login(state: web::Data<AppState>, body: web::Bytes) -> Result<HttpResponse, ApiError> {
    let payload: LoginRequest = parse_json(&body)?;
    let response = services::auth::login(&state, payload).await?;
    Ok(HttpResponse::Ok().json(response))
}

pub async fn signup(state: web::Data<AppState>, body: web::Bytes) -> Result<HttpResponse, ApiError> {
    let payload: SignupRequest = parse_json(&body)?;
    let user = services::auth::signup(&state, payload).await?;
    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": "Registrasi berhasil",
        "user": user,
    })))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/auth/login")
            .route(web::post().to(login))
            .default_service(web::to(public_method_not_allowed)),
    )
    .service(
        web::resource("/api/auth/signup")
            .route(web::post().to(signup))
            .default_service(web::to(public_method_not_allowed)),
    );
}
