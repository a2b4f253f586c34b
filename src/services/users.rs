use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use super::not_found;
use crate::AppState;
use crate::auth::{Claims, is_admin, require};
use crate::error::ApiError;
use crate::models::user::{CreateUserRequest, NewUser, PublicMember, Role, User, UserPatch};
use crate::store::Store;
use crate::utils::required_text;

#[derive(Debug, Serialize)]
pub struct UserCount {
    pub count: i64,
}

pub async fn list_users(store: &dyn Store, claims: &Claims) -> Result<Vec<User>, ApiError> {
    require(is_admin(claims))?;
    Ok(store.list_users().await?)
}

pub async fn get_user(store: &dyn Store, claims: &Claims, id: Uuid) -> Result<User, ApiError> {
    require(is_admin(claims))?;
    store.get_user(id).await?.ok_or_else(|| not_found("User", id))
}

pub async fn create_user(
    state: &AppState,
    claims: &Claims,
    payload: CreateUserRequest,
) -> Result<User, ApiError> {
    require(is_admin(claims))?;
    payload.validate()?;

    let email = required_text(payload.email, "email")?.to_lowercase();
    let name = required_text(payload.name, "name")?;
    let raw_password = payload
        .password
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| state.default_member_password.clone());

    let new_user = NewUser {
        email,
        password_hash: bcrypt::hash(&raw_password, state.bcrypt_cost)?,
        name,
        role: payload.role.unwrap_or(Role::Anggota),
        position: payload.position,
        school: payload.school,
        phone: payload.phone,
    };

    let user = state
        .store
        .insert_user(&new_user)
        .await?
        .ok_or_else(|| ApiError::Duplicate("Email sudah terdaftar".into()))?;

    log::info!("Admin {} menambahkan user {}", claims.email, user.email);
    Ok(user)
}

pub async fn update_user(
    store: &dyn Store,
    claims: &Claims,
    id: Uuid,
    patch: UserPatch,
) -> Result<User, ApiError> {
    require(is_admin(claims))?;
    store
        .update_user(id, &patch)
        .await?
        .ok_or_else(|| not_found("User", id))
}

pub async fn delete_user(store: &dyn Store, claims: &Claims, id: Uuid) -> Result<(), ApiError> {
    require(is_admin(claims))?;
    if store.soft_delete_user(id).await? {
        log::info!("User {} dinonaktifkan oleh {}", id, claims.email);
    }
    Ok(())
}

/// Tanpa autentikasi: dipakai frontend untuk mengecek apakah setup awal sudah dilakukan.
pub async fn count_users(store: &dyn Store) -> Result<UserCount, ApiError> {
    Ok(UserCount {
        count: store.count_users().await?,
    })
}

pub async fn public_members(store: &dyn Store) -> Result<Vec<PublicMember>, ApiError> {
    Ok(store.list_public_members().await?)
}
