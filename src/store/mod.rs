// src/store/mod.rs
//! Akses data. Setiap mutasi adalah satu statement dengan prasyarat di klausa
//! WHERE; `None`/`false` berarti tidak ada baris yang memenuhi prasyarat.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::activity::{
    Activity, ActivityPatch, ActivityRegistration, ActivityStatus, NewActivity,
};
use crate::models::attendance::{Attendance, AttendanceQuery, NewAttendance};
use crate::models::audit_log::AuditLog;
use crate::models::gallery::{GalleryItem, NewGalleryItem};
use crate::models::iuran::{
    ChecklistSnapshot, ConfigStatus, DeleteState, IuranConfig, IuranConfigPatch, NewIuranConfig,
    NewPembayaran, PembayaranIuran, PembayaranPatch,
};
use crate::models::meeting::{Meeting, MeetingPatch, MeetingType, NewMeeting};
use crate::models::transaction::{
    FinancialSummary, NewTransaction, Transaction, TransactionPatch, TransactionQuery,
};
use crate::models::user::{NewUser, PublicMember, User, UserCredentials, UserPatch};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),

    /// Pelanggaran unique constraint (23505).
    #[error("unique violation: {0}")]
    Conflict(String),

    /// Pelanggaran foreign key (23503).
    #[error("foreign key violation: {0}")]
    MissingReference(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &e {
            match db.code().as_deref() {
                Some("23505") => return StoreError::Conflict(db.message().to_string()),
                Some("23503") => return StoreError::MissingReference(db.message().to_string()),
                _ => {}
            }
        }
        StoreError::Database(e)
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Hanya user aktif yang belum dihapus.
    async fn find_credentials(&self, email: &str) -> StoreResult<Option<UserCredentials>>;
    async fn touch_last_login(&self, id: Uuid) -> StoreResult<()>;
    async fn list_users(&self) -> StoreResult<Vec<User>>;
    async fn get_user(&self, id: Uuid) -> StoreResult<Option<User>>;
    /// `None` jika email sudah terpakai.
    async fn insert_user(&self, user: &NewUser) -> StoreResult<Option<User>>;
    async fn update_user(&self, id: Uuid, patch: &UserPatch) -> StoreResult<Option<User>>;
    async fn soft_delete_user(&self, id: Uuid) -> StoreResult<bool>;
    async fn count_users(&self) -> StoreResult<i64>;
    async fn list_public_members(&self) -> StoreResult<Vec<PublicMember>>;
}

#[async_trait]
pub trait ActivityStore: Send + Sync {
    async fn list_activities(&self, status: Option<ActivityStatus>) -> StoreResult<Vec<Activity>>;
    async fn get_activity(&self, id: Uuid) -> StoreResult<Option<Activity>>;
    async fn find_activity_by_qr(&self, qr_code: &str) -> StoreResult<Option<Uuid>>;
    async fn insert_activity(&self, activity: &NewActivity) -> StoreResult<Activity>;
    async fn update_activity(&self, id: Uuid, patch: &ActivityPatch) -> StoreResult<Option<Activity>>;
    async fn soft_delete_activity(&self, id: Uuid) -> StoreResult<bool>;
    async fn list_registrations(&self, activity_id: Uuid) -> StoreResult<Vec<ActivityRegistration>>;
    /// `None` jika kegiatan tidak ada atau user sudah terdaftar.
    async fn insert_registration(
        &self,
        activity_id: Uuid,
        user_id: Uuid,
        notes: Option<&str>,
    ) -> StoreResult<Option<ActivityRegistration>>;
}

#[async_trait]
pub trait AttendanceStore: Send + Sync {
    async fn list_attendance(&self, filter: &AttendanceQuery) -> StoreResult<Vec<Attendance>>;
    /// Upsert pada (activity_id, user_id); `None` jika kegiatan tidak ada.
    async fn upsert_attendance(&self, attendance: &NewAttendance) -> StoreResult<Option<Attendance>>;
}

#[async_trait]
pub trait MeetingStore: Send + Sync {
    async fn list_meetings(&self, meeting_type: Option<MeetingType>) -> StoreResult<Vec<Meeting>>;
    async fn get_meeting(&self, id: Uuid) -> StoreResult<Option<Meeting>>;
    async fn insert_meeting(&self, meeting: &NewMeeting) -> StoreResult<Meeting>;
    async fn update_meeting(&self, id: Uuid, patch: &MeetingPatch) -> StoreResult<Option<Meeting>>;
    async fn soft_delete_meeting(&self, id: Uuid) -> StoreResult<bool>;
}

#[async_trait]
pub trait TransactionStore: Send + Sync {
    async fn list_transactions(&self, filter: &TransactionQuery) -> StoreResult<Vec<Transaction>>;
    async fn get_transaction(&self, id: Uuid) -> StoreResult<Option<Transaction>>;
    async fn insert_transaction(&self, tx: &NewTransaction) -> StoreResult<Transaction>;
    async fn update_transaction(
        &self,
        id: Uuid,
        patch: &TransactionPatch,
    ) -> StoreResult<Option<Transaction>>;
    async fn soft_delete_transaction(&self, id: Uuid) -> StoreResult<bool>;
    async fn summarize_transactions(&self, category: Option<&str>) -> StoreResult<FinancialSummary>;
}

#[async_trait]
pub trait GalleryStore: Send + Sync {
    async fn list_gallery(&self, activity_id: Option<Uuid>) -> StoreResult<Vec<GalleryItem>>;
    async fn get_gallery_item(&self, id: Uuid) -> StoreResult<Option<GalleryItem>>;
    async fn insert_gallery_item(&self, item: &NewGalleryItem) -> StoreResult<GalleryItem>;
    async fn soft_delete_gallery_item(&self, id: Uuid) -> StoreResult<bool>;
}

#[async_trait]
pub trait IuranStore: Send + Sync {
    async fn list_configs(
        &self,
        tahun: Option<i32>,
        status: Option<ConfigStatus>,
    ) -> StoreResult<Vec<IuranConfig>>;
    async fn get_config(&self, id: Uuid) -> StoreResult<Option<IuranConfig>>;
    /// Insert atau timpa konfigurasi tahun yang sama (termasuk yang sudah dihapus).
    async fn upsert_config(&self, config: &NewIuranConfig) -> StoreResult<IuranConfig>;
    async fn update_config(&self, id: Uuid, patch: &IuranConfigPatch) -> StoreResult<Option<IuranConfig>>;
    async fn soft_delete_config(&self, id: Uuid) -> StoreResult<bool>;

    async fn list_payments(
        &self,
        tahun: Option<i32>,
        user_id: Option<Uuid>,
    ) -> StoreResult<Vec<PembayaranIuran>>;
    async fn get_payment(&self, id: Uuid) -> StoreResult<Option<PembayaranIuran>>;
    async fn insert_payment(&self, payment: &NewPembayaran) -> StoreResult<PembayaranIuran>;
    /// Hanya berhasil selama `delete_status = active`.
    async fn update_active_payment(
        &self,
        id: Uuid,
        patch: &PembayaranPatch,
    ) -> StoreResult<Option<PembayaranIuran>>;
    /// active → requested.
    async fn request_payment_delete(
        &self,
        id: Uuid,
        requested_by: Uuid,
    ) -> StoreResult<Option<PembayaranIuran>>;
    /// requested → approved, sekaligus mengisi `deleted_at`.
    async fn approve_payment_delete(
        &self,
        id: Uuid,
        approved_by: Uuid,
    ) -> StoreResult<Option<PembayaranIuran>>;
    /// Dibaca tanpa filter soft delete, untuk mengklasifikasi update yang gagal.
    async fn payment_delete_state(&self, id: Uuid) -> StoreResult<Option<DeleteState>>;

    /// Anggota aktif, konfigurasi aktif dan pembayaran tahun itu dari satu snapshot.
    async fn checklist_snapshot(&self, tahun: i32) -> StoreResult<ChecklistSnapshot>;
}

#[async_trait]
pub trait AuditLogStore: Send + Sync {
    async fn list_audit_logs(&self, limit: i64) -> StoreResult<Vec<AuditLog>>;
}

pub trait Store:
    UserStore
    + ActivityStore
    + AttendanceStore
    + MeetingStore
    + TransactionStore
    + GalleryStore
    + IuranStore
    + AuditLogStore
{
}

impl<T> Store for T where
    T: UserStore
        + ActivityStore
        + AttendanceStore
        + MeetingStore
        + TransactionStore
        + GalleryStore
        + IuranStore
        + AuditLogStore
{
}
