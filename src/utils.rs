//utils.rs
use actix_web::HttpRequest;
use actix_web::web::{Bytes, Query};
use chrono::{Datelike, Utc};
use rand::Rng;
use serde::de::DeserializeOwned;

use crate::error::ApiError;

pub fn parse_query<T: DeserializeOwned>(req: &HttpRequest) -> Result<T, ApiError> {
    Query::<T>::from_query(req.query_string())
        .map(Query::into_inner)
        .map_err(|e| ApiError::Validation(format!("Query tidak valid: {}", e)))
}

/// Body JSON wajib ada.
pub fn parse_json<T: DeserializeOwned>(body: &Bytes) -> Result<T, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ApiError::Validation("Body JSON wajib diisi".into()));
    }
    serde_json::from_slice(body).map_err(|e| ApiError::Validation(format!("JSON tidak valid: {}", e)))
}

/// Untuk PUT: body kosong berarti tidak ada field yang diubah.
pub fn parse_patch<T: DeserializeOwned + Default>(body: &Bytes) -> Result<T, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|e| ApiError::Validation(format!("JSON tidak valid: {}", e)))
}

pub fn required<T>(value: Option<T>, field: &str) -> Result<T, ApiError> {
    value.ok_or_else(|| ApiError::Validation(format!("{} wajib diisi", field)))
}

pub fn required_text(value: Option<String>, field: &str) -> Result<String, ApiError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::Validation(format!("{} wajib diisi", field)))
}

pub fn generate_qr_code() -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

    let mut rng = rand::rng();
    (0..6)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

pub fn current_year() -> i32 {
    Utc::now().year()
}
