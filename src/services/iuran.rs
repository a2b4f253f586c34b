// src/services/iuran.rs
//! Konfigurasi iuran tahunan dan pembayaran iuran, termasuk alur hapus dua
//! langkah: bendahara mengajukan, admin menyetujui.

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use super::not_found;
use crate::auth::{Claims, is_admin, is_bendahara, is_bendahara_or_admin, require};
use crate::error::ApiError;
use crate::models::iuran::{
    ConfigStatus, CreatePembayaranRequest, DeleteStatus, IuranConfig, IuranConfigPatch,
    IuranConfigQuery, NewIuranConfig, NewPembayaran, PaymentAction, PembayaranIuran,
    PembayaranPatch, UpsertIuranConfigRequest,
};
use crate::store::Store;
use crate::utils::required;

const DEFAULT_PAYMENT_METHOD: &str = "tunai";

// ---------- Konfigurasi ----------

pub async fn list_configs(
    store: &dyn Store,
    filter: IuranConfigQuery,
) -> Result<Vec<IuranConfig>, ApiError> {
    Ok(store.list_configs(filter.tahun, filter.status).await?)
}

pub async fn get_config(store: &dyn Store, id: Uuid) -> Result<IuranConfig, ApiError> {
    store.get_config(id).await?.ok_or_else(|| not_found("Konfigurasi iuran", id))
}

pub async fn upsert_config(
    store: &dyn Store,
    claims: &Claims,
    payload: UpsertIuranConfigRequest,
) -> Result<IuranConfig, ApiError> {
    require(is_bendahara_or_admin(claims))?;
    payload.validate()?;

    let config = NewIuranConfig {
        periode_tahun: required(payload.periode_tahun, "periode_tahun")?,
        nominal: required(payload.nominal, "nominal")?,
        status: payload.status.unwrap_or(ConfigStatus::Aktif),
    };

    let saved = store.upsert_config(&config).await?;
    log::info!(
        "Iuran {} diset {} per bulan ({}) oleh {}",
        saved.periode_tahun,
        saved.nominal,
        saved.status,
        claims.email
    );
    Ok(saved)
}

pub async fn update_config(
    store: &dyn Store,
    claims: &Claims,
    id: Uuid,
    patch: IuranConfigPatch,
) -> Result<IuranConfig, ApiError> {
    require(is_bendahara_or_admin(claims))?;
    patch.validate()?;
    store
        .update_config(id, &patch)
        .await?
        .ok_or_else(|| not_found("Konfigurasi iuran", id))
}

pub async fn delete_config(store: &dyn Store, claims: &Claims, id: Uuid) -> Result<(), ApiError> {
    require(is_admin(claims))?;
    store.soft_delete_config(id).await?;
    Ok(())
}

// ---------- Pembayaran ----------

pub async fn list_payments(
    store: &dyn Store,
    tahun: Option<i32>,
    user_id: Option<Uuid>,
) -> Result<Vec<PembayaranIuran>, ApiError> {
    Ok(store.list_payments(tahun, user_id).await?)
}

pub async fn get_payment(store: &dyn Store, id: Uuid) -> Result<PembayaranIuran, ApiError> {
    store.get_payment(id).await?.ok_or_else(|| not_found("Pembayaran", id))
}

pub async fn create_payment(
    store: &dyn Store,
    claims: &Claims,
    payload: CreatePembayaranRequest,
) -> Result<PembayaranIuran, ApiError> {
    require(is_bendahara_or_admin(claims))?;
    payload.validate()?;

    let mut bulan_dibayar = required(payload.bulan_dibayar, "bulan_dibayar")?;
    bulan_dibayar.sort_unstable();
    bulan_dibayar.dedup();

    let payment = NewPembayaran {
        user_id: required(payload.user_id, "user_id")?,
        periode_tahun: required(payload.periode_tahun, "periode_tahun")?,
        bulan_dibayar,
        jumlah: required(payload.jumlah, "jumlah")?,
        metode_bayar: payload
            .metode_bayar
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PAYMENT_METHOD.to_string()),
        tanggal_bayar: payload
            .tanggal_bayar
            .unwrap_or_else(|| Utc::now().date_naive()),
        recorded_by: claims.user_id,
    };

    let created = store.insert_payment(&payment).await?;
    log::info!(
        "Pembayaran iuran {} untuk user {} tahun {} dicatat oleh {}",
        created.id,
        created.user_id,
        created.periode_tahun,
        claims.email
    );
    Ok(created)
}

/// PUT pada pembayaran: tanpa `action` berarti edit biasa.
pub async fn update_payment(
    store: &dyn Store,
    claims: &Claims,
    id: Uuid,
    action: Option<PaymentAction>,
    patch: PembayaranPatch,
) -> Result<PembayaranIuran, ApiError> {
    match action {
        Some(PaymentAction::RequestDelete) => request_delete(store, claims, id).await,
        Some(PaymentAction::ApproveDelete) => approve_delete(store, claims, id).await,
        None => edit_payment(store, claims, id, patch).await,
    }
}

pub async fn edit_payment(
    store: &dyn Store,
    claims: &Claims,
    id: Uuid,
    mut patch: PembayaranPatch,
) -> Result<PembayaranIuran, ApiError> {
    require(is_bendahara_or_admin(claims))?;
    patch.validate()?;
    if let Some(months) = patch.bulan_dibayar.as_mut() {
        months.sort_unstable();
        months.dedup();
    }

    if let Some(updated) = store.update_active_payment(id, &patch).await? {
        return Ok(updated);
    }

    match store.payment_delete_state(id).await? {
        Some(state) if !state.deleted && !state.status.allows_edit() => Err(ApiError::PaymentLocked),
        _ => Err(not_found("Pembayaran", id)),
    }
}

/// Hanya role bendahara; admin ditolak.
pub async fn request_delete(
    store: &dyn Store,
    claims: &Claims,
    id: Uuid,
) -> Result<PembayaranIuran, ApiError> {
    require(is_bendahara(claims))?;

    if let Some(updated) = store.request_payment_delete(id, claims.user_id).await? {
        log::info!("Pembayaran {}: permintaan hapus oleh {}", id, claims.email);
        return Ok(updated);
    }

    match store.payment_delete_state(id).await? {
        Some(state) if !state.deleted || state.status == DeleteStatus::Approved => {
            Err(state.status.request().err().map_or_else(
                || not_found("Pembayaran", id),
                ApiError::from,
            ))
        }
        _ => Err(not_found("Pembayaran", id)),
    }
}

pub async fn approve_delete(
    store: &dyn Store,
    claims: &Claims,
    id: Uuid,
) -> Result<PembayaranIuran, ApiError> {
    require(is_admin(claims))?;

    if let Some(updated) = store.approve_payment_delete(id, claims.user_id).await? {
        log::info!("Pembayaran {}: penghapusan disetujui oleh {}", id, claims.email);
        return Ok(updated);
    }

    // Baris yang sudah dihapus tidak lagi bisa disetujui: sama dengan tidak ada.
    match store.payment_delete_state(id).await? {
        Some(state) if !state.deleted => Err(state.status.approve().err().map_or_else(
            || not_found("Pembayaran", id),
            ApiError::from,
        )),
        _ => Err(not_found("Pembayaran", id)),
    }
}
