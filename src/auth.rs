use actix_web::HttpRequest;
use actix_web::http::header;
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::user::Role;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
    pub iat: usize,
    pub exp: usize,
}

/// Kunci HS256 dan masa berlaku token, dibuat sekali saat start.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl JwtKeys {
    pub fn new(secret: &str, ttl_days: i64) -> Self {
        JwtKeys {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::days(ttl_days),
        }
    }
}

pub fn generate_jwt(
    keys: &JwtKeys,
    user_id: Uuid,
    email: &str,
    role: Role,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = Claims {
        user_id,
        email: email.to_string(),
        role,
        iat: now.timestamp() as usize,
        exp: (now + keys.ttl).timestamp() as usize,
    };

    encode(&Header::new(Algorithm::HS256), &claims, &keys.encoding)
}

pub fn verify_jwt(req: &HttpRequest, keys: &JwtKeys) -> Result<Claims, ApiError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            log::warn!("No bearer token in request to {}", req.path());
            ApiError::Unauthorized("Token tidak ditemukan".into())
        })?;

    let token_data = decode::<Claims>(token, &keys.decoding, &Validation::new(Algorithm::HS256))
        .map_err(|e| {
            log::warn!("JWT verification failed for {}: {:?}", req.path(), e);
            ApiError::Unauthorized("Token tidak valid atau kedaluwarsa".into())
        })?;

    Ok(token_data.claims)
}

pub fn is_admin(claims: &Claims) -> bool {
    claims.role == Role::Admin
}

/// Hanya bendahara; admin tidak termasuk.
pub fn is_bendahara(claims: &Claims) -> bool {
    claims.role == Role::Bendahara
}

pub fn is_bendahara_or_admin(claims: &Claims) -> bool {
    matches!(claims.role, Role::Admin | Role::Bendahara)
}

pub fn is_sekretaris_or_admin(claims: &Claims) -> bool {
    matches!(claims.role, Role::Admin | Role::Sekretaris)
}

pub fn require(allowed: bool) -> Result<(), ApiError> {
    if allowed {
        Ok(())
    } else {
        Err(ApiError::forbidden())
    }
}
