use serde::Serialize;
use validator::Validate;

use crate::AppState;
use crate::auth::generate_jwt;
use crate::error::ApiError;
use crate::models::user::{LoginRequest, NewUser, Role, SignupRequest, User};

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub user: User,
}

pub async fn login(state: &AppState, payload: LoginRequest) -> Result<LoginResponse, ApiError> {
    let email = payload.email.trim().to_lowercase();
    if email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::Validation("Email dan password wajib diisi".into()));
    }

    let invalid = || ApiError::Unauthorized("Email atau password salah".into());

    let Some(creds) = state.store.find_credentials(&email).await? else {
        log::warn!("Login gagal, email tidak terdaftar: {}", email);
        return Err(invalid());
    };

    if !bcrypt::verify(&payload.password, &creds.password_hash)? {
        log::warn!("Login gagal, password salah untuk {}", email);
        return Err(invalid());
    }

    let token = generate_jwt(&state.jwt, creds.id, &creds.email, creds.role).map_err(|e| {
        log::error!("Gagal menghasilkan JWT: {:?}", e);
        ApiError::Internal(e.to_string())
    })?;

    state.store.touch_last_login(creds.id).await?;
    let user = state
        .store
        .get_user(creds.id)
        .await?
        .ok_or_else(invalid)?;

    log::info!("User {} login sebagai {}", user.email, user.role);

    Ok(LoginResponse {
        message: "Berhasil login".into(),
        token,
        user,
    })
}

pub async fn signup(state: &AppState, payload: SignupRequest) -> Result<User, ApiError> {
    payload.validate()?;

    let password_hash = bcrypt::hash(&payload.password, state.bcrypt_cost)?;
    let new_user = NewUser {
        email: payload.email.trim().to_lowercase(),
        password_hash,
        name: payload.name.trim().to_string(),
        role: Role::Anggota,
        position: payload.position,
        school: payload.school,
        phone: payload.phone,
    };

    let user = state
        .store
        .insert_user(&new_user)
        .await?
        .ok_or_else(|| ApiError::Duplicate("Email sudah terdaftar".into()))?;

    log::info!("Anggota baru terdaftar: {}", user.email);
    Ok(user)
}
