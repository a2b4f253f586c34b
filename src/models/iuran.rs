// src/models/iuran.rs
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::user::Role;

// ---------- Konfigurasi iuran ----------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigStatus {
    Aktif,
    Nonaktif,
}

text_enum!(ConfigStatus {
    Aktif => "aktif",
    Nonaktif => "nonaktif",
});

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct IuranConfig {
    pub id: Uuid,
    pub periode_tahun: i32,
    pub nominal: i64,
    #[sqlx(try_from = "String")]
    pub status: ConfigStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpsertIuranConfigRequest {
    #[validate(range(min = 2000, max = 2100, message = "periode_tahun tidak valid"))]
    pub periode_tahun: Option<i32>,
    #[validate(range(min = 0i64, max = 1000000000000i64, message = "nominal harus 0 sampai 1 triliun"))]
    pub nominal: Option<i64>,
    pub status: Option<ConfigStatus>,
}

#[derive(Debug, Clone)]
pub struct NewIuranConfig {
    pub periode_tahun: i32,
    pub nominal: i64,
    pub status: ConfigStatus,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct IuranConfigPatch {
    #[validate(range(min = 2000, max = 2100, message = "periode_tahun tidak valid"))]
    pub periode_tahun: Option<i32>,
    #[validate(range(min = 0i64, max = 1000000000000i64, message = "nominal harus 0 sampai 1 triliun"))]
    pub nominal: Option<i64>,
    pub status: Option<ConfigStatus>,
}

#[derive(Debug, Default, Deserialize)]
pub struct IuranConfigQuery {
    pub id: Option<Uuid>,
    pub tahun: Option<i32>,
    pub status: Option<ConfigStatus>,
}

// ---------- Pembayaran iuran & alur hapus ----------

/// Sub-state penghapusan pembayaran: `active → requested → approved`.
/// `approved` selalu bersamaan dengan `deleted_at` terisi.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeleteStatus {
    Active,
    Requested,
    Approved,
}

text_enum!(DeleteStatus {
    Active => "active",
    Requested => "requested",
    Approved => "approved",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DeleteTransitionError {
    #[error("Permintaan hapus sudah diajukan")]
    AlreadyRequested,
    #[error("Pembayaran sudah dihapus")]
    AlreadyApproved,
    #[error("Permintaan hapus diperlukan sebelum persetujuan")]
    RequestRequired,
}

impl DeleteStatus {
    /// Transisi yang dipicu bendahara.
    pub fn request(self) -> Result<DeleteStatus, DeleteTransitionError> {
        match self {
            DeleteStatus::Active => Ok(DeleteStatus::Requested),
            DeleteStatus::Requested => Err(DeleteTransitionError::AlreadyRequested),
            DeleteStatus::Approved => Err(DeleteTransitionError::AlreadyApproved),
        }
    }

    /// Transisi yang dipicu admin.
    pub fn approve(self) -> Result<DeleteStatus, DeleteTransitionError> {
        match self {
            DeleteStatus::Requested => Ok(DeleteStatus::Approved),
            DeleteStatus::Active => Err(DeleteTransitionError::RequestRequired),
            DeleteStatus::Approved => Err(DeleteTransitionError::AlreadyApproved),
        }
    }

    pub fn allows_edit(self) -> bool {
        self == DeleteStatus::Active
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PembayaranIuran {
    pub id: Uuid,
    pub user_id: Uuid,
    pub periode_tahun: i32,
    pub bulan_dibayar: Vec<i32>,
    pub jumlah: i64,
    pub metode_bayar: String,
    pub tanggal_bayar: NaiveDate,
    pub recorded_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    #[sqlx(try_from = "String")]
    pub delete_status: DeleteStatus,
    pub delete_requested_by: Option<Uuid>,
    pub delete_requested_at: Option<DateTime<Utc>>,
    pub delete_approved_by: Option<Uuid>,
    pub delete_approved_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
    #[sqlx(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[sqlx(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recorded_by_name: Option<String>,
    #[sqlx(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete_requested_by_name: Option<String>,
    #[sqlx(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete_approved_by_name: Option<String>,
}

/// Status hapus sebuah baris, dipakai untuk menjelaskan kenapa update bersyarat gagal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteState {
    pub status: DeleteStatus,
    pub deleted: bool,
}

#[allow(clippy::ptr_arg)]
fn validate_months(months: &Vec<i32>) -> Result<(), ValidationError> {
    if months.is_empty() {
        return Err(ValidationError::new("bulan_kosong").with_message("bulan_dibayar wajib diisi".into()));
    }
    if months.iter().any(|m| !(1..=12).contains(m)) {
        return Err(ValidationError::new("bulan_tidak_valid").with_message("bulan_dibayar harus 1-12".into()));
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePembayaranRequest {
    pub user_id: Option<Uuid>,
    #[validate(range(min = 2000, max = 2100, message = "periode_tahun tidak valid"))]
    pub periode_tahun: Option<i32>,
    #[validate(custom(function = "validate_months"))]
    pub bulan_dibayar: Option<Vec<i32>>,
    #[validate(range(min = 1i64, max = 1000000000000i64, message = "jumlah harus 1 sampai 1 triliun"))]
    pub jumlah: Option<i64>,
    pub metode_bayar: Option<String>,
    pub tanggal_bayar: Option<NaiveDate>,
}

#[derive(Debug, Clone)]
pub struct NewPembayaran {
    pub user_id: Uuid,
    pub periode_tahun: i32,
    pub bulan_dibayar: Vec<i32>,
    pub jumlah: i64,
    pub metode_bayar: String,
    pub tanggal_bayar: NaiveDate,
    pub recorded_by: Uuid,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct PembayaranPatch {
    pub user_id: Option<Uuid>,
    #[validate(range(min = 2000, max = 2100, message = "periode_tahun tidak valid"))]
    pub periode_tahun: Option<i32>,
    #[validate(custom(function = "validate_months"))]
    pub bulan_dibayar: Option<Vec<i32>>,
    #[validate(range(min = 1i64, max = 1000000000000i64, message = "jumlah harus 1 sampai 1 triliun"))]
    pub jumlah: Option<i64>,
    pub metode_bayar: Option<String>,
    pub tanggal_bayar: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentAction {
    RequestDelete,
    ApproveDelete,
}

#[derive(Debug, Default, Deserialize)]
pub struct PembayaranQuery {
    pub id: Option<Uuid>,
    pub tahun: Option<i32>,
    pub user_id: Option<Uuid>,
    pub action: Option<PaymentAction>,
}

// ---------- Checklist ----------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentStanding {
    Lunas,
    Partial,
    Belum,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChecklistRow {
    pub user_id: Uuid,
    pub nama_anggota: String,
    pub sekolah: Option<String>,
    pub role: Role,
    pub periode_tahun: i32,
    pub iuran_per_bulan: Option<i64>,
    pub total_dibayar: i64,
    pub total_iuran: Option<i64>,
    pub sisa_tunggakan: Option<i64>,
    pub bulan_lunas: Vec<i32>,
    pub bulan_belum_lunas: Vec<i32>,
    pub status_pembayaran: PaymentStanding,
}

#[derive(Debug, Clone, FromRow)]
pub struct ChecklistMember {
    pub user_id: Uuid,
    pub name: String,
    pub school: Option<String>,
    #[sqlx(try_from = "String")]
    pub role: Role,
}

#[derive(Debug, Clone, FromRow)]
pub struct ChecklistPayment {
    pub user_id: Uuid,
    pub bulan_dibayar: Vec<i32>,
    pub jumlah: i64,
}

/// Bahan checklist yang dibaca dari satu snapshot database.
#[derive(Debug, Clone, Default)]
pub struct ChecklistSnapshot {
    pub members: Vec<ChecklistMember>,
    pub monthly_fee: Option<i64>,
    pub payments: Vec<ChecklistPayment>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChecklistQuery {
    pub tahun: Option<i32>,
}
