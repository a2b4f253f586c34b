use uuid::Uuid;

use super::not_found;
use crate::auth::{Claims, is_sekretaris_or_admin, require};
use crate::error::ApiError;
use crate::models::meeting::{CreateMeetingRequest, Meeting, MeetingPatch, MeetingType, NewMeeting};
use crate::store::Store;
use crate::utils::{required, required_text};

pub async fn list_meetings(
    store: &dyn Store,
    meeting_type: Option<MeetingType>,
) -> Result<Vec<Meeting>, ApiError> {
    Ok(store.list_meetings(meeting_type).await?)
}

pub async fn get_meeting(store: &dyn Store, id: Uuid) -> Result<Meeting, ApiError> {
    store.get_meeting(id).await?.ok_or_else(|| not_found("Rapat", id))
}

pub async fn create_meeting(
    store: &dyn Store,
    claims: &Claims,
    payload: CreateMeetingRequest,
) -> Result<Meeting, ApiError> {
    require(is_sekretaris_or_admin(claims))?;

    // Notulen selalu terikat pada kegiatan.
    let activity_id = payload
        .activity_id
        .ok_or_else(|| ApiError::Validation("Kegiatan wajib dipilih untuk notulen".into()))?;

    let meeting = NewMeeting {
        title: required_text(payload.title, "title")?,
        date: required(payload.date, "date")?,
        start_time: payload.start_time,
        end_time: payload.end_time,
        location: payload.location,
        agenda: payload.agenda,
        notes: payload.notes,
        meeting_type: payload.meeting_type.unwrap_or(MeetingType::Regular),
        activity_id,
        created_by: claims.user_id,
    };

    Ok(store.insert_meeting(&meeting).await?)
}

pub async fn update_meeting(
    store: &dyn Store,
    claims: &Claims,
    id: Uuid,
    patch: MeetingPatch,
) -> Result<Meeting, ApiError> {
    require(is_sekretaris_or_admin(claims))?;
    store
        .update_meeting(id, &patch)
        .await?
        .ok_or_else(|| not_found("Rapat", id))
}

pub async fn delete_meeting(store: &dyn Store, claims: &Claims, id: Uuid) -> Result<(), ApiError> {
    require(is_sekretaris_or_admin(claims))?;
    store.soft_delete_meeting(id).await?;
    Ok(())
}
