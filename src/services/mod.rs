//! Logika bisnis per resource. Controller hanya memanggil fungsi di sini
//! setelah token diverifikasi; cek role dilakukan di sini.

pub mod activities;
pub mod attendance;
pub mod audit_logs;
pub mod auth;
pub mod checklist;
pub mod gallery;
pub mod iuran;
pub mod meetings;
pub mod transactions;
pub mod users;

use uuid::Uuid;

use crate::error::ApiError;

pub(crate) fn not_found(what: &str, id: Uuid) -> ApiError {
    ApiError::NotFound(format!("{} {} tidak ditemukan", what, id))
}
