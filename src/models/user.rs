// src/models/user.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Bendahara,
    Sekretaris,
    Anggota,
}

text_enum!(Role {
    Admin => "admin",
    Bendahara => "bendahara",
    Sekretaris => "sekretaris",
    Anggota => "anggota",
});

/// Baris `users` tanpa password hash; bentuk yang dikirim ke klien.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub position: Option<String>,
    pub school: Option<String>,
    pub phone: Option<String>,
    pub is_active: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Dipakai hanya oleh login.
#[derive(Debug, Clone, FromRow)]
pub struct UserCredentials {
    pub id: Uuid,
    pub email: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub password_hash: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PublicMember {
    pub id: Uuid,
    pub name: String,
    pub school: Option<String>,
    pub position: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(email(message = "Email tidak valid"))]
    pub email: Option<String>,
    pub password: Option<String>,
    #[validate(length(min = 1, message = "Nama wajib diisi"))]
    pub name: Option<String>,
    pub school: Option<String>,
    pub role: Option<Role>,
    pub position: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(email(message = "Email tidak valid"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password minimal 6 karakter"))]
    pub password: String,
    #[validate(length(min = 1, message = "Nama wajib diisi"))]
    pub name: String,
    pub position: Option<String>,
    pub school: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Field `None` berarti tidak diubah.
#[derive(Debug, Default, Deserialize)]
pub struct UserPatch {
    pub name: Option<String>,
    pub role: Option<Role>,
    pub position: Option<String>,
    pub school: Option<String>,
    pub phone: Option<String>,
    pub is_active: Option<bool>,
}

/// Data yang siap disimpan; password sudah di-hash.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub role: Role,
    pub position: Option<String>,
    pub school: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UserQuery {
    pub id: Option<Uuid>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PublicUserQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_text() {
        for role in [Role::Admin, Role::Bendahara, Role::Sekretaris, Role::Anggota] {
            assert_eq!(Role::try_from(role.as_str().to_string()).unwrap(), role);
        }
        assert!("superadmin".parse::<Role>().is_err());
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Bendahara).unwrap(), "\"bendahara\"");
    }
}
