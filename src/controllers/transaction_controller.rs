use actix_web::{HttpRequest, HttpResponse, web};

use crate::AppState;
use crate::auth;
use crate::controllers::method_not_allowed;
use crate::error::ApiError;
use crate::models::transaction::{
    CreateTransactionRequest, SummaryQuery, TransactionPatch, TransactionQuery,
};
use crate::services::transactions;
use crate::utils::{parse_json, parse_patch, parse_query, required};

pub async fn get_transactions(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    auth::verify_jwt(&req, &state.jwt)?;
    let query: TransactionQuery = parse_query(&req)?;

    match query.id {
        Some(id) => Ok(HttpResponse::Ok().json(transactions::get_transaction(state.store(), id).await?)),
        None => Ok(HttpResponse::Ok().json(transactions::list_transactions(state.store(), query).await?)),
    }
}

pub async fn get_summary(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    auth::verify_jwt(&req, &state.jwt)?;
    let query: SummaryQuery = parse_query(&req)?;
    let summary = transactions::summary(state.store(), query.category.as_deref()).await?;
    Ok(HttpResponse::Ok().json(summary))
}

pub async fn create_transaction(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let claims = auth::verify_jwt(&req, &state.jwt)?;
    let payload: CreateTransactionRequest = parse_json(&body)?;
    let tx = transactions::create_transaction(state.store(), &claims, payload).await?;
    Ok(HttpResponse::Created().json(tx))
}

pub async fn update_transaction(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let claims = auth::verify_jwt(&req, &state.jwt)?;
    let query: TransactionQuery = parse_query(&req)?;
    let id = required(query.id, "id")?;
    let patch: TransactionPatch = parse_patch(&body)?;
    let tx = transactions::update_transaction(state.store(), &claims, id, patch).await?;
    Ok(HttpResponse::Ok().json(tx))
}

pub async fn delete_transaction(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let claims = auth::verify_jwt(&req, &state.jwt)?;
    let query: TransactionQuery = parse_query(&req)?;
    let id = required(query.id, "id")?;
    transactions::delete_transaction(state.store(), &claims, id).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/transactions")
            .route(web::get().to(get_transactions))
            .route(web::post().to(create_transaction))
            .route(web::put().to(update_transaction))
            .route(web::delete().to(delete_transaction))
            .default_service(web::to(method_not_allowed)),
    )
    .service(
        web::resource("/api/transactions/summary")
            .route(web::get().to(get_summary))
            .default_service(web::to(method_not_allowed)),
    );
}
