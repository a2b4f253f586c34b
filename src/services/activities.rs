use uuid::Uuid;

use super::not_found;
use crate::auth::{Claims, is_admin, is_sekretaris_or_admin, require};
use crate::error::ApiError;
use crate::models::activity::{
    Activity, ActivityPatch, ActivityRegistration, ActivityStatus, CreateActivityRequest,
    NewActivity, RegisterActivityRequest,
};
use crate::store::Store;
use crate::utils::{generate_qr_code, required, required_text};

pub async fn list_activities(
    store: &dyn Store,
    status: Option<ActivityStatus>,
) -> Result<Vec<Activity>, ApiError> {
    Ok(store.list_activities(status).await?)
}

pub async fn get_activity(store: &dyn Store, id: Uuid) -> Result<Activity, ApiError> {
    store.get_activity(id).await?.ok_or_else(|| not_found("Kegiatan", id))
}

pub async fn create_activity(
    store: &dyn Store,
    claims: &Claims,
    payload: CreateActivityRequest,
) -> Result<Activity, ApiError> {
    require(is_sekretaris_or_admin(claims))?;

    let qr_code = payload
        .qr_code
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .unwrap_or_else(generate_qr_code);

    let activity = NewActivity {
        title: required_text(payload.title, "title")?,
        description: payload.description,
        date: required(payload.date, "date")?,
        time: payload.time,
        location: payload.location,
        qr_code,
        status: payload.status.unwrap_or(ActivityStatus::Draft),
        max_participants: payload.max_participants,
        registration_deadline: payload.registration_deadline,
        created_by: claims.user_id,
    };

    let created = store.insert_activity(&activity).await?;
    log::info!("Kegiatan {} dibuat oleh {}", created.id, claims.email);
    Ok(created)
}

pub async fn update_activity(
    store: &dyn Store,
    claims: &Claims,
    id: Uuid,
    patch: ActivityPatch,
) -> Result<Activity, ApiError> {
    require(is_sekretaris_or_admin(claims))?;
    store
        .update_activity(id, &patch)
        .await?
        .ok_or_else(|| not_found("Kegiatan", id))
}

pub async fn delete_activity(store: &dyn Store, claims: &Claims, id: Uuid) -> Result<(), ApiError> {
    require(is_sekretaris_or_admin(claims))?;
    store.soft_delete_activity(id).await?;
    Ok(())
}

pub async fn list_registrations(
    store: &dyn Store,
    activity_id: Option<Uuid>,
) -> Result<Vec<ActivityRegistration>, ApiError> {
    let activity_id = required(activity_id, "activity_id")?;
    Ok(store.list_registrations(activity_id).await?)
}

/// Anggota mendaftarkan dirinya sendiri; hanya admin yang boleh mendaftarkan orang lain.
pub async fn register(
    store: &dyn Store,
    claims: &Claims,
    payload: RegisterActivityRequest,
) -> Result<ActivityRegistration, ApiError> {
    let user_id = payload.user_id.unwrap_or(claims.user_id);
    if user_id != claims.user_id {
        require(is_admin(claims))?;
    }

    match store
        .insert_registration(payload.activity_id, user_id, payload.notes.as_deref())
        .await?
    {
        Some(reg) => Ok(reg),
        None => match store.get_activity(payload.activity_id).await? {
            None => Err(not_found("Kegiatan", payload.activity_id)),
            Some(_) => Err(ApiError::Duplicate("Sudah terdaftar pada kegiatan ini".into())),
        },
    }
}
