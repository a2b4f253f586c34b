// src/store/memory.rs
//! Store di memori untuk test. Semua tabel berada di balik satu `Mutex`, jadi
//! setiap mutasi bersyarat dievaluasi secara atomik seperti satu statement SQL.

use std::cmp::Reverse;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::models::activity::{
    Activity, ActivityPatch, ActivityRegistration, ActivityStatus, NewActivity, RegistrationStatus,
};
use crate::models::attendance::{Attendance, AttendanceQuery, NewAttendance};
use crate::models::audit_log::{AuditAction, AuditLog};
use crate::models::gallery::{GalleryItem, NewGalleryItem};
use crate::models::iuran::{
    ChecklistMember, ChecklistPayment, ChecklistSnapshot, ConfigStatus, DeleteState, DeleteStatus,
    IuranConfig, IuranConfigPatch, NewIuranConfig, NewPembayaran, PembayaranIuran, PembayaranPatch,
};
use crate::models::meeting::{Meeting, MeetingPatch, MeetingType, NewMeeting};
use crate::models::transaction::{
    FinancialSummary, NewTransaction, Transaction, TransactionPatch, TransactionQuery,
};
use crate::models::user::{NewUser, PublicMember, User, UserCredentials, UserPatch};
use crate::store::{
    ActivityStore, AttendanceStore, AuditLogStore, GalleryStore, IuranStore, MeetingStore,
    StoreError, StoreResult, TransactionStore, UserStore,
};

struct Stored<T> {
    row: T,
    deleted_at: Option<DateTime<Utc>>,
}

impl<T> Stored<T> {
    fn new(row: T) -> Self {
        Stored { row, deleted_at: None }
    }

    fn live(&self) -> bool {
        self.deleted_at.is_none()
    }
}

struct UserRecord {
    user: User,
    password_hash: String,
}

#[derive(Default)]
struct Tables {
    users: Vec<Stored<UserRecord>>,
    activities: Vec<Stored<Activity>>,
    registrations: Vec<ActivityRegistration>,
    attendance: Vec<Attendance>,
    meetings: Vec<Stored<Meeting>>,
    transactions: Vec<Stored<Transaction>>,
    gallery: Vec<Stored<GalleryItem>>,
    configs: Vec<Stored<IuranConfig>>,
    payments: Vec<PembayaranIuran>,
    audit_logs: Vec<AuditLog>,
}

impl Tables {
    fn user_name(&self, id: Option<Uuid>) -> Option<String> {
        let id = id?;
        self.users
            .iter()
            .find(|u| u.row.user.id == id)
            .map(|u| u.row.user.name.clone())
    }

    fn user(&self, id: Uuid) -> Option<&User> {
        self.users.iter().find(|u| u.row.user.id == id).map(|u| &u.row.user)
    }

    fn live_activity(&self, id: Uuid) -> Option<&Activity> {
        self.activities
            .iter()
            .find(|a| a.live() && a.row.id == id)
            .map(|a| &a.row)
    }

    fn activity_title(&self, id: Option<Uuid>) -> Option<String> {
        let id = id?;
        self.activities
            .iter()
            .find(|a| a.row.id == id)
            .map(|a| a.row.title.clone())
    }

    fn require_user(&self, id: Uuid) -> StoreResult<()> {
        match self.user(id) {
            Some(_) => Ok(()),
            None => Err(StoreError::MissingReference(format!("users.id = {}", id))),
        }
    }

    fn activity_view(&self, activity: &Activity) -> Activity {
        Activity {
            created_by_name: self.user_name(activity.created_by),
            registered_count: self
                .registrations
                .iter()
                .filter(|r| r.activity_id == activity.id)
                .count() as i64,
            attended_count: self
                .attendance
                .iter()
                .filter(|a| a.activity_id == activity.id)
                .count() as i64,
            ..activity.clone()
        }
    }

    fn registration_view(&self, reg: &ActivityRegistration) -> Option<ActivityRegistration> {
        let user = self.user(reg.user_id)?;
        Some(ActivityRegistration {
            user_name: Some(user.name.clone()),
            school: user.school.clone(),
            ..reg.clone()
        })
    }

    fn attendance_view(&self, att: &Attendance) -> Option<Attendance> {
        let user = self.user(att.user_id)?;
        let activity = self.live_activity(att.activity_id)?;
        Some(Attendance {
            user_name: Some(user.name.clone()),
            activity_title: Some(activity.title.clone()),
            ..att.clone()
        })
    }

    fn meeting_view(&self, meeting: &Meeting) -> Meeting {
        Meeting {
            created_by_name: self.user_name(meeting.created_by),
            activity_title: self.activity_title(meeting.activity_id),
            ..meeting.clone()
        }
    }

    fn transaction_view(&self, tx: &Transaction) -> Transaction {
        Transaction {
            created_by_name: self.user_name(tx.created_by),
            ..tx.clone()
        }
    }

    fn gallery_view(&self, item: &GalleryItem) -> GalleryItem {
        GalleryItem {
            activity_title: self.activity_title(item.activity_id),
            ..item.clone()
        }
    }

    fn payment_view(&self, p: &PembayaranIuran) -> PembayaranIuran {
        PembayaranIuran {
            user_name: self.user_name(Some(p.user_id)),
            recorded_by_name: self.user_name(p.recorded_by),
            delete_requested_by_name: self.user_name(p.delete_requested_by),
            delete_approved_by_name: self.user_name(p.delete_approved_by),
            ..p.clone()
        }
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Audit log ditulis oleh trigger di Postgres; di memori diisi langsung.
    pub async fn record_audit(
        &self,
        table_name: &str,
        record_id: &str,
        action: AuditAction,
        user_id: Option<Uuid>,
        new_values: Option<serde_json::Value>,
    ) -> AuditLog {
        let entry = AuditLog {
            id: Uuid::new_v4(),
            table_name: table_name.to_string(),
            record_id: record_id.to_string(),
            action,
            old_values: None,
            new_values,
            user_id,
            created_at: Utc::now(),
            user_name: None,
        };
        self.tables.lock().await.audit_logs.push(entry.clone());
        entry
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_credentials(&self, email: &str) -> StoreResult<Option<UserCredentials>> {
        let t = self.tables.lock().await;
        Ok(t.users
            .iter()
            .find(|u| u.live() && u.row.user.is_active && u.row.user.email == email)
            .map(|u| UserCredentials {
                id: u.row.user.id,
                email: u.row.user.email.clone(),
                role: u.row.user.role,
                password_hash: u.row.password_hash.clone(),
            }))
    }

    async fn touch_last_login(&self, id: Uuid) -> StoreResult<()> {
        let mut t = self.tables.lock().await;
        if let Some(u) = t.users.iter_mut().find(|u| u.row.user.id == id) {
            u.row.user.last_login_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        let t = self.tables.lock().await;
        let mut users: Vec<User> = t
            .users
            .iter()
            .filter(|u| u.live())
            .map(|u| u.row.user.clone())
            .collect();
        users.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(users)
    }

    async fn get_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let t = self.tables.lock().await;
        Ok(t.users
            .iter()
            .find(|u| u.live() && u.row.user.id == id)
            .map(|u| u.row.user.clone()))
    }

    async fn insert_user(&self, user: &NewUser) -> StoreResult<Option<User>> {
        let mut t = self.tables.lock().await;
        if t.users.iter().any(|u| u.row.user.email == user.email) {
            return Ok(None);
        }
        let row = User {
            id: Uuid::new_v4(),
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
            position: user.position.clone(),
            school: user.school.clone(),
            phone: user.phone.clone(),
            is_active: true,
            last_login_at: None,
            created_at: Utc::now(),
        };
        t.users.push(Stored::new(UserRecord {
            user: row.clone(),
            password_hash: user.password_hash.clone(),
        }));
        Ok(Some(row))
    }

    async fn update_user(&self, id: Uuid, patch: &UserPatch) -> StoreResult<Option<User>> {
        let mut t = self.tables.lock().await;
        let Some(stored) = t.users.iter_mut().find(|u| u.live() && u.row.user.id == id) else {
            return Ok(None);
        };
        let user = &mut stored.row.user;
        if let Some(name) = &patch.name {
            user.name = name.clone();
        }
        if let Some(role) = patch.role {
            user.role = role;
        }
        if let Some(position) = &patch.position {
            user.position = Some(position.clone());
        }
        if let Some(school) = &patch.school {
            user.school = Some(school.clone());
        }
        if let Some(phone) = &patch.phone {
            user.phone = Some(phone.clone());
        }
        if let Some(active) = patch.is_active {
            user.is_active = active;
        }
        Ok(Some(user.clone()))
    }

    async fn soft_delete_user(&self, id: Uuid) -> StoreResult<bool> {
        let mut t = self.tables.lock().await;
        match t.users.iter_mut().find(|u| u.live() && u.row.user.id == id) {
            Some(u) => {
                u.deleted_at = Some(Utc::now());
                u.row.user.is_active = false;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn count_users(&self) -> StoreResult<i64> {
        let t = self.tables.lock().await;
        Ok(t.users.iter().filter(|u| u.live()).count() as i64)
    }

    async fn list_public_members(&self) -> StoreResult<Vec<PublicMember>> {
        let t = self.tables.lock().await;
        let mut members: Vec<PublicMember> = t
            .users
            .iter()
            .filter(|u| u.live() && u.row.user.is_active)
            .map(|u| PublicMember {
                id: u.row.user.id,
                name: u.row.user.name.clone(),
                school: u.row.user.school.clone(),
                position: u.row.user.position.clone(),
            })
            .collect();
        members.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(members)
    }
}

#[async_trait]
impl ActivityStore for MemoryStore {
    async fn list_activities(&self, status: Option<ActivityStatus>) -> StoreResult<Vec<Activity>> {
        let t = self.tables.lock().await;
        let mut rows: Vec<Activity> = t
            .activities
            .iter()
            .filter(|a| a.live() && status.is_none_or(|s| a.row.status == s))
            .map(|a| t.activity_view(&a.row))
            .collect();
        rows.sort_by_key(|a| Reverse(a.date));
        Ok(rows)
    }

    async fn get_activity(&self, id: Uuid) -> StoreResult<Option<Activity>> {
        let t = self.tables.lock().await;
        Ok(t.live_activity(id).map(|a| t.activity_view(a)))
    }

    async fn find_activity_by_qr(&self, qr_code: &str) -> StoreResult<Option<Uuid>> {
        let t = self.tables.lock().await;
        Ok(t.activities
            .iter()
            .find(|a| a.live() && a.row.qr_code == qr_code)
            .map(|a| a.row.id))
    }

    async fn insert_activity(&self, activity: &NewActivity) -> StoreResult<Activity> {
        let mut t = self.tables.lock().await;
        let now = Utc::now();
        let row = Activity {
            id: Uuid::new_v4(),
            title: activity.title.clone(),
            description: activity.description.clone(),
            date: activity.date,
            time: activity.time,
            location: activity.location.clone(),
            qr_code: activity.qr_code.clone(),
            status: activity.status,
            max_participants: activity.max_participants,
            registration_deadline: activity.registration_deadline,
            created_by: Some(activity.created_by),
            created_at: now,
            updated_at: now,
            created_by_name: None,
            registered_count: 0,
            attended_count: 0,
        };
        t.activities.push(Stored::new(row.clone()));
        Ok(t.activity_view(&row))
    }

    async fn update_activity(&self, id: Uuid, patch: &ActivityPatch) -> StoreResult<Option<Activity>> {
        let mut t = self.tables.lock().await;
        let Some(stored) = t.activities.iter_mut().find(|a| a.live() && a.row.id == id) else {
            return Ok(None);
        };
        let a = &mut stored.row;
        if let Some(v) = &patch.title {
            a.title = v.clone();
        }
        if let Some(v) = &patch.description {
            a.description = Some(v.clone());
        }
        if let Some(v) = patch.date {
            a.date = v;
        }
        if let Some(v) = patch.time {
            a.time = Some(v);
        }
        if let Some(v) = &patch.location {
            a.location = Some(v.clone());
        }
        if let Some(v) = &patch.qr_code {
            a.qr_code = v.clone();
        }
        if let Some(v) = patch.status {
            a.status = v;
        }
        if let Some(v) = patch.max_participants {
            a.max_participants = Some(v);
        }
        if let Some(v) = patch.registration_deadline {
            a.registration_deadline = Some(v);
        }
        a.updated_at = Utc::now();
        let row = a.clone();
        Ok(Some(t.activity_view(&row)))
    }

    async fn soft_delete_activity(&self, id: Uuid) -> StoreResult<bool> {
        let mut t = self.tables.lock().await;
        Ok(soft_delete(t.activities.iter_mut().find(|a| a.live() && a.row.id == id)))
    }

    async fn list_registrations(&self, activity_id: Uuid) -> StoreResult<Vec<ActivityRegistration>> {
        let t = self.tables.lock().await;
        Ok(t.registrations
            .iter()
            .filter(|r| r.activity_id == activity_id)
            .filter_map(|r| t.registration_view(r))
            .collect())
    }

    async fn insert_registration(
        &self,
        activity_id: Uuid,
        user_id: Uuid,
        notes: Option<&str>,
    ) -> StoreResult<Option<ActivityRegistration>> {
        let mut t = self.tables.lock().await;
        if t.live_activity(activity_id).is_none()
            || t.registrations
                .iter()
                .any(|r| r.activity_id == activity_id && r.user_id == user_id)
        {
            return Ok(None);
        }
        t.require_user(user_id)?;
        let reg = ActivityRegistration {
            id: Uuid::new_v4(),
            activity_id,
            user_id,
            registered_at: Utc::now(),
            status: RegistrationStatus::Registered,
            notes: notes.map(str::to_string),
            user_name: None,
            school: None,
        };
        t.registrations.push(reg.clone());
        Ok(t.registration_view(&reg))
    }
}

#[async_trait]
impl AttendanceStore for MemoryStore {
    async fn list_attendance(&self, filter: &AttendanceQuery) -> StoreResult<Vec<Attendance>> {
        let t = self.tables.lock().await;
        let mut rows: Vec<Attendance> = t
            .attendance
            .iter()
            .filter(|a| filter.activity_id.is_none_or(|id| a.activity_id == id))
            .filter(|a| filter.user_id.is_none_or(|id| a.user_id == id))
            .filter_map(|a| t.attendance_view(a))
            .collect();
        rows.sort_by_key(|a| Reverse(a.attended_at));
        Ok(rows)
    }

    async fn upsert_attendance(&self, attendance: &NewAttendance) -> StoreResult<Option<Attendance>> {
        let mut t = self.tables.lock().await;
        if t.live_activity(attendance.activity_id).is_none() {
            return Ok(None);
        }
        t.require_user(attendance.user_id)?;

        let existing = t
            .attendance
            .iter()
            .position(|a| a.activity_id == attendance.activity_id && a.user_id == attendance.user_id);
        let row = match existing {
            Some(idx) => {
                let a = &mut t.attendance[idx];
                a.attended_at = Utc::now();
                a.check_in_method = attendance.check_in_method;
                if attendance.notes.is_some() {
                    a.notes = attendance.notes.clone();
                }
                a.clone()
            }
            None => {
                let a = Attendance {
                    id: Uuid::new_v4(),
                    activity_id: attendance.activity_id,
                    user_id: attendance.user_id,
                    attended_at: Utc::now(),
                    check_in_method: attendance.check_in_method,
                    notes: attendance.notes.clone(),
                    user_name: None,
                    activity_title: None,
                };
                t.attendance.push(a.clone());
                a
            }
        };
        Ok(t.attendance_view(&row))
    }
}

#[async_trait]
impl MeetingStore for MemoryStore {
    async fn list_meetings(&self, meeting_type: Option<MeetingType>) -> StoreResult<Vec<Meeting>> {
        let t = self.tables.lock().await;
        let mut rows: Vec<Meeting> = t
            .meetings
            .iter()
            .filter(|m| m.live() && meeting_type.is_none_or(|k| m.row.meeting_type == k))
            .map(|m| t.meeting_view(&m.row))
            .collect();
        rows.sort_by_key(|m| Reverse(m.date));
        Ok(rows)
    }

    async fn get_meeting(&self, id: Uuid) -> StoreResult<Option<Meeting>> {
        let t = self.tables.lock().await;
        Ok(t.meetings
            .iter()
            .find(|m| m.live() && m.row.id == id)
            .map(|m| t.meeting_view(&m.row)))
    }

    async fn insert_meeting(&self, meeting: &NewMeeting) -> StoreResult<Meeting> {
        let mut t = self.tables.lock().await;
        if !t.activities.iter().any(|a| a.row.id == meeting.activity_id) {
            return Err(StoreError::MissingReference(format!(
                "activities.id = {}",
                meeting.activity_id
            )));
        }
        let now = Utc::now();
        let row = Meeting {
            id: Uuid::new_v4(),
            title: meeting.title.clone(),
            date: meeting.date,
            start_time: meeting.start_time,
            end_time: meeting.end_time,
            location: meeting.location.clone(),
            agenda: meeting.agenda.clone(),
            notes: meeting.notes.clone(),
            meeting_type: meeting.meeting_type,
            activity_id: Some(meeting.activity_id),
            created_by: Some(meeting.created_by),
            created_at: now,
            updated_at: now,
            created_by_name: None,
            activity_title: None,
        };
        t.meetings.push(Stored::new(row.clone()));
        Ok(t.meeting_view(&row))
    }

    async fn update_meeting(&self, id: Uuid, patch: &MeetingPatch) -> StoreResult<Option<Meeting>> {
        let mut t = self.tables.lock().await;
        let Some(stored) = t.meetings.iter_mut().find(|m| m.live() && m.row.id == id) else {
            return Ok(None);
        };
        let m = &mut stored.row;
        if let Some(v) = &patch.title {
            m.title = v.clone();
        }
        if let Some(v) = patch.date {
            m.date = v;
        }
        if let Some(v) = patch.start_time {
            m.start_time = Some(v);
        }
        if let Some(v) = patch.end_time {
            m.end_time = Some(v);
        }
        if let Some(v) = &patch.location {
            m.location = Some(v.clone());
        }
        if let Some(v) = &patch.agenda {
            m.agenda = Some(v.clone());
        }
        if let Some(v) = &patch.notes {
            m.notes = Some(v.clone());
        }
        if let Some(v) = patch.meeting_type {
            m.meeting_type = v;
        }
        if let Some(v) = patch.activity_id {
            m.activity_id = Some(v);
        }
        m.updated_at = Utc::now();
        let row = m.clone();
        Ok(Some(t.meeting_view(&row)))
    }

    async fn soft_delete_meeting(&self, id: Uuid) -> StoreResult<bool> {
        let mut t = self.tables.lock().await;
        Ok(soft_delete(t.meetings.iter_mut().find(|m| m.live() && m.row.id == id)))
    }
}

#[async_trait]
impl TransactionStore for MemoryStore {
    async fn list_transactions(&self, filter: &TransactionQuery) -> StoreResult<Vec<Transaction>> {
        let t = self.tables.lock().await;
        let mut rows: Vec<Transaction> = t
            .transactions
            .iter()
            .filter(|tx| tx.live())
            .filter(|tx| filter.category.as_ref().is_none_or(|c| &tx.row.category == c))
            .filter(|tx| filter.kind.is_none_or(|k| tx.row.kind == k))
            .map(|tx| t.transaction_view(&tx.row))
            .collect();
        rows.sort_by_key(|tx| Reverse((tx.date, tx.created_at)));
        Ok(rows)
    }

    async fn get_transaction(&self, id: Uuid) -> StoreResult<Option<Transaction>> {
        let t = self.tables.lock().await;
        Ok(t.transactions
            .iter()
            .find(|tx| tx.live() && tx.row.id == id)
            .map(|tx| t.transaction_view(&tx.row)))
    }

    async fn insert_transaction(&self, tx: &NewTransaction) -> StoreResult<Transaction> {
        let mut t = self.tables.lock().await;
        let now = Utc::now();
        let row = Transaction {
            id: Uuid::new_v4(),
            description: tx.description.clone(),
            amount: tx.amount,
            kind: tx.kind,
            category: tx.category.clone(),
            date: tx.date,
            receipt_url: tx.receipt_url.clone(),
            approved_by: None,
            approved_at: None,
            created_by: Some(tx.created_by),
            created_at: now,
            updated_at: now,
            created_by_name: None,
        };
        t.transactions.push(Stored::new(row.clone()));
        Ok(t.transaction_view(&row))
    }

    async fn update_transaction(
        &self,
        id: Uuid,
        patch: &TransactionPatch,
    ) -> StoreResult<Option<Transaction>> {
        let mut t = self.tables.lock().await;
        let Some(stored) = t.transactions.iter_mut().find(|tx| tx.live() && tx.row.id == id) else {
            return Ok(None);
        };
        let tx = &mut stored.row;
        if let Some(v) = &patch.description {
            tx.description = v.clone();
        }
        if let Some(v) = patch.amount {
            tx.amount = v;
        }
        if let Some(v) = patch.kind {
            tx.kind = v;
        }
        if let Some(v) = &patch.category {
            tx.category = v.clone();
        }
        if let Some(v) = patch.date {
            tx.date = v;
        }
        if let Some(v) = &patch.receipt_url {
            tx.receipt_url = Some(v.clone());
        }
        tx.updated_at = Utc::now();
        let row = tx.clone();
        Ok(Some(t.transaction_view(&row)))
    }

    async fn soft_delete_transaction(&self, id: Uuid) -> StoreResult<bool> {
        let mut t = self.tables.lock().await;
        Ok(soft_delete(t.transactions.iter_mut().find(|tx| tx.live() && tx.row.id == id)))
    }

    async fn summarize_transactions(&self, category: Option<&str>) -> StoreResult<FinancialSummary> {
        let t = self.tables.lock().await;
        Ok(FinancialSummary::from_entries(
            t.transactions
                .iter()
                .filter(|tx| tx.live())
                .filter(|tx| category.is_none_or(|c| tx.row.category == c))
                .map(|tx| &tx.row),
        ))
    }
}

#[async_trait]
impl GalleryStore for MemoryStore {
    async fn list_gallery(&self, activity_id: Option<Uuid>) -> StoreResult<Vec<GalleryItem>> {
        let t = self.tables.lock().await;
        let mut rows: Vec<GalleryItem> = t
            .gallery
            .iter()
            .filter(|g| g.live() && activity_id.is_none_or(|id| g.row.activity_id == Some(id)))
            .map(|g| t.gallery_view(&g.row))
            .collect();
        rows.sort_by_key(|g| Reverse(g.uploaded_at));
        Ok(rows)
    }

    async fn get_gallery_item(&self, id: Uuid) -> StoreResult<Option<GalleryItem>> {
        let t = self.tables.lock().await;
        Ok(t.gallery
            .iter()
            .find(|g| g.live() && g.row.id == id)
            .map(|g| t.gallery_view(&g.row)))
    }

    async fn insert_gallery_item(&self, item: &NewGalleryItem) -> StoreResult<GalleryItem> {
        let mut t = self.tables.lock().await;
        let row = GalleryItem {
            id: Uuid::new_v4(),
            title: item.title.clone(),
            description: item.description.clone(),
            file_url: item.file_url.clone(),
            file_type: item.file_type,
            file_size: item.file_size,
            activity_id: item.activity_id,
            uploaded_by: Some(item.uploaded_by),
            is_featured: item.is_featured,
            uploaded_at: Utc::now(),
            activity_title: None,
        };
        t.gallery.push(Stored::new(row.clone()));
        Ok(t.gallery_view(&row))
    }

    async fn soft_delete_gallery_item(&self, id: Uuid) -> StoreResult<bool> {
        let mut t = self.tables.lock().await;
        Ok(soft_delete(t.gallery.iter_mut().find(|g| g.live() && g.row.id == id)))
    }
}

#[async_trait]
impl IuranStore for MemoryStore {
    async fn list_configs(
        &self,
        tahun: Option<i32>,
        status: Option<ConfigStatus>,
    ) -> StoreResult<Vec<IuranConfig>> {
        let t = self.tables.lock().await;
        let mut rows: Vec<IuranConfig> = t
            .configs
            .iter()
            .filter(|c| c.live())
            .filter(|c| tahun.is_none_or(|y| c.row.periode_tahun == y))
            .filter(|c| status.is_none_or(|s| c.row.status == s))
            .map(|c| c.row.clone())
            .collect();
        rows.sort_by_key(|c| Reverse(c.periode_tahun));
        Ok(rows)
    }

    async fn get_config(&self, id: Uuid) -> StoreResult<Option<IuranConfig>> {
        let t = self.tables.lock().await;
        Ok(t.configs
            .iter()
            .find(|c| c.live() && c.row.id == id)
            .map(|c| c.row.clone()))
    }

    async fn upsert_config(&self, config: &NewIuranConfig) -> StoreResult<IuranConfig> {
        let mut t = self.tables.lock().await;
        let now = Utc::now();
        if let Some(c) = t
            .configs
            .iter_mut()
            .find(|c| c.row.periode_tahun == config.periode_tahun)
        {
            c.row.nominal = config.nominal;
            c.row.status = config.status;
            c.row.updated_at = now;
            c.deleted_at = None;
            return Ok(c.row.clone());
        }
        let row = IuranConfig {
            id: Uuid::new_v4(),
            periode_tahun: config.periode_tahun,
            nominal: config.nominal,
            status: config.status,
            created_at: now,
            updated_at: now,
        };
        t.configs.push(Stored::new(row.clone()));
        Ok(row)
    }

    async fn update_config(&self, id: Uuid, patch: &IuranConfigPatch) -> StoreResult<Option<IuranConfig>> {
        let mut t = self.tables.lock().await;
        if let Some(year) = patch.periode_tahun {
            if t.configs.iter().any(|c| c.row.id != id && c.row.periode_tahun == year) {
                return Err(StoreError::Conflict(format!("iuran_config.periode_tahun = {}", year)));
            }
        }
        let Some(stored) = t.configs.iter_mut().find(|c| c.live() && c.row.id == id) else {
            return Ok(None);
        };
        let c = &mut stored.row;
        if let Some(v) = patch.periode_tahun {
            c.periode_tahun = v;
        }
        if let Some(v) = patch.nominal {
            c.nominal = v;
        }
        if let Some(v) = patch.status {
            c.status = v;
        }
        c.updated_at = Utc::now();
        Ok(Some(c.clone()))
    }

    async fn soft_delete_config(&self, id: Uuid) -> StoreResult<bool> {
        let mut t = self.tables.lock().await;
        Ok(soft_delete(t.configs.iter_mut().find(|c| c.live() && c.row.id == id)))
    }

    async fn list_payments(
        &self,
        tahun: Option<i32>,
        user_id: Option<Uuid>,
    ) -> StoreResult<Vec<PembayaranIuran>> {
        let t = self.tables.lock().await;
        let mut rows: Vec<PembayaranIuran> = t
            .payments
            .iter()
            .filter(|p| p.deleted_at.is_none())
            .filter(|p| tahun.is_none_or(|y| p.periode_tahun == y))
            .filter(|p| user_id.is_none_or(|id| p.user_id == id))
            .map(|p| t.payment_view(p))
            .collect();
        rows.sort_by_key(|p| Reverse((p.tanggal_bayar, p.created_at)));
        Ok(rows)
    }

    async fn get_payment(&self, id: Uuid) -> StoreResult<Option<PembayaranIuran>> {
        let t = self.tables.lock().await;
        Ok(t.payments
            .iter()
            .find(|p| p.deleted_at.is_none() && p.id == id)
            .map(|p| t.payment_view(p)))
    }

    async fn insert_payment(&self, payment: &NewPembayaran) -> StoreResult<PembayaranIuran> {
        let mut t = self.tables.lock().await;
        t.require_user(payment.user_id)?;
        let row = PembayaranIuran {
            id: Uuid::new_v4(),
            user_id: payment.user_id,
            periode_tahun: payment.periode_tahun,
            bulan_dibayar: payment.bulan_dibayar.clone(),
            jumlah: payment.jumlah,
            metode_bayar: payment.metode_bayar.clone(),
            tanggal_bayar: payment.tanggal_bayar,
            recorded_by: Some(payment.recorded_by),
            created_at: Utc::now(),
            delete_status: DeleteStatus::Active,
            delete_requested_by: None,
            delete_requested_at: None,
            delete_approved_by: None,
            delete_approved_at: None,
            deleted_at: None,
            user_name: None,
            recorded_by_name: None,
            delete_requested_by_name: None,
            delete_approved_by_name: None,
        };
        t.payments.push(row.clone());
        Ok(t.payment_view(&row))
    }

    async fn update_active_payment(
        &self,
        id: Uuid,
        patch: &PembayaranPatch,
    ) -> StoreResult<Option<PembayaranIuran>> {
        let mut t = self.tables.lock().await;
        if let Some(user_id) = patch.user_id {
            t.require_user(user_id)?;
        }
        let Some(p) = t.payments.iter_mut().find(|p| {
            p.id == id && p.deleted_at.is_none() && p.delete_status == DeleteStatus::Active
        }) else {
            return Ok(None);
        };
        if let Some(v) = patch.user_id {
            p.user_id = v;
        }
        if let Some(v) = patch.periode_tahun {
            p.periode_tahun = v;
        }
        if let Some(v) = &patch.bulan_dibayar {
            p.bulan_dibayar = v.clone();
        }
        if let Some(v) = patch.jumlah {
            p.jumlah = v;
        }
        if let Some(v) = &patch.metode_bayar {
            p.metode_bayar = v.clone();
        }
        if let Some(v) = patch.tanggal_bayar {
            p.tanggal_bayar = v;
        }
        let row = p.clone();
        Ok(Some(t.payment_view(&row)))
    }

    async fn request_payment_delete(
        &self,
        id: Uuid,
        requested_by: Uuid,
    ) -> StoreResult<Option<PembayaranIuran>> {
        let mut t = self.tables.lock().await;
        let Some(p) = t.payments.iter_mut().find(|p| {
            p.id == id && p.deleted_at.is_none() && p.delete_status == DeleteStatus::Active
        }) else {
            return Ok(None);
        };
        p.delete_status = DeleteStatus::Requested;
        p.delete_requested_by = Some(requested_by);
        p.delete_requested_at = Some(Utc::now());
        let row = p.clone();
        Ok(Some(t.payment_view(&row)))
    }

    async fn approve_payment_delete(
        &self,
        id: Uuid,
        approved_by: Uuid,
    ) -> StoreResult<Option<PembayaranIuran>> {
        let mut t = self.tables.lock().await;
        let Some(p) = t.payments.iter_mut().find(|p| {
            p.id == id && p.deleted_at.is_none() && p.delete_status == DeleteStatus::Requested
        }) else {
            return Ok(None);
        };
        let now = Utc::now();
        p.delete_status = DeleteStatus::Approved;
        p.delete_approved_by = Some(approved_by);
        p.delete_approved_at = Some(now);
        p.deleted_at = Some(now);
        let row = p.clone();
        Ok(Some(t.payment_view(&row)))
    }

    async fn payment_delete_state(&self, id: Uuid) -> StoreResult<Option<DeleteState>> {
        let t = self.tables.lock().await;
        Ok(t.payments.iter().find(|p| p.id == id).map(|p| DeleteState {
            status: p.delete_status,
            deleted: p.deleted_at.is_some(),
        }))
    }

    async fn checklist_snapshot(&self, tahun: i32) -> StoreResult<ChecklistSnapshot> {
        let t = self.tables.lock().await;
        let mut members: Vec<ChecklistMember> = t
            .users
            .iter()
            .filter(|u| u.live() && u.row.user.is_active)
            .map(|u| ChecklistMember {
                user_id: u.row.user.id,
                name: u.row.user.name.clone(),
                school: u.row.user.school.clone(),
                role: u.row.user.role,
            })
            .collect();
        members.sort_by(|a, b| a.name.cmp(&b.name));

        let monthly_fee = t
            .configs
            .iter()
            .find(|c| {
                c.live() && c.row.periode_tahun == tahun && c.row.status == ConfigStatus::Aktif
            })
            .map(|c| c.row.nominal);

        let payments = t
            .payments
            .iter()
            .filter(|p| p.deleted_at.is_none() && p.periode_tahun == tahun)
            .map(|p| ChecklistPayment {
                user_id: p.user_id,
                bulan_dibayar: p.bulan_dibayar.clone(),
                jumlah: p.jumlah,
            })
            .collect();

        Ok(ChecklistSnapshot {
            members,
            monthly_fee,
            payments,
        })
    }
}

#[async_trait]
impl AuditLogStore for MemoryStore {
    async fn list_audit_logs(&self, limit: i64) -> StoreResult<Vec<AuditLog>> {
        let t = self.tables.lock().await;
        let mut rows: Vec<AuditLog> = t
            .audit_logs
            .iter()
            .map(|l| AuditLog {
                user_name: t.user_name(l.user_id),
                ..l.clone()
            })
            .collect();
        rows.sort_by_key(|l| Reverse(l.created_at));
        rows.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(rows)
    }
}

fn soft_delete<T>(row: Option<&mut Stored<T>>) -> bool {
    match row {
        Some(r) => {
            r.deleted_at = Some(Utc::now());
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;

    use super::*;
    use crate::models::user::Role;

    async fn seeded() -> (Arc<MemoryStore>, Uuid, Uuid) {
        let store = Arc::new(MemoryStore::new());
        let user = store
            .insert_user(&NewUser {
                email: "ani@kkg.test".into(),
                password_hash: "x".into(),
                name: "Ani".into(),
                role: Role::Anggota,
                position: None,
                school: None,
                phone: None,
            })
            .await
            .unwrap()
            .unwrap();
        let payment = store
            .insert_payment(&NewPembayaran {
                user_id: user.id,
                periode_tahun: 2025,
                bulan_dibayar: vec![1],
                jumlah: 50_000,
                metode_bayar: "tunai".into(),
                tanggal_bayar: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
                recorded_by: user.id,
            })
            .await
            .unwrap();
        (store, user.id, payment.id)
    }

    #[tokio::test]
    async fn concurrent_requests_only_one_wins() {
        let (store, user_id, id) = seeded().await;

        let a = tokio::spawn({
            let store = store.clone();
            async move { store.request_payment_delete(id, user_id).await.unwrap() }
        });
        let b = tokio::spawn({
            let store = store.clone();
            async move { store.request_payment_delete(id, user_id).await.unwrap() }
        });
        let results = [a.await.unwrap(), b.await.unwrap()];

        assert_eq!(results.iter().filter(|r| r.is_some()).count(), 1);
        let state = store.payment_delete_state(id).await.unwrap().unwrap();
        assert_eq!(state.status, DeleteStatus::Requested);
        assert!(!state.deleted);
    }

    #[tokio::test]
    async fn approval_sets_status_and_deleted_at_together() {
        let (store, user_id, id) = seeded().await;

        assert!(store.approve_payment_delete(id, user_id).await.unwrap().is_none());
        store.request_payment_delete(id, user_id).await.unwrap().unwrap();

        let approved = store.approve_payment_delete(id, user_id).await.unwrap().unwrap();
        assert_eq!(approved.delete_status, DeleteStatus::Approved);
        assert_eq!(approved.deleted_at, approved.delete_approved_at);
        assert!(approved.deleted_at.is_some());

        assert!(store.get_payment(id).await.unwrap().is_none());
        assert!(store.list_payments(Some(2025), None).await.unwrap().is_empty());
        assert!(store.update_active_payment(id, &PembayaranPatch::default()).await.unwrap().is_none());
    }
}
