use crate::auth::{Claims, is_admin, require};
use crate::error::ApiError;
use crate::models::attendance::{
    Attendance, AttendanceQuery, CheckInMethod, MarkAttendanceRequest, NewAttendance,
};
use crate::store::Store;

pub async fn list_attendance(
    store: &dyn Store,
    filter: AttendanceQuery,
) -> Result<Vec<Attendance>, ApiError> {
    Ok(store.list_attendance(&filter).await?)
}

pub async fn mark_attendance(
    store: &dyn Store,
    claims: &Claims,
    payload: MarkAttendanceRequest,
) -> Result<Attendance, ApiError> {
    let user_id = payload.user_id.unwrap_or(claims.user_id);
    if user_id != claims.user_id {
        require(is_admin(claims))?;
    }

    let activity_id = match (payload.activity_id, payload.qr_code.as_deref().map(str::trim)) {
        (Some(id), _) => id,
        (None, Some(code)) if !code.is_empty() => store
            .find_activity_by_qr(code)
            .await?
            .ok_or_else(|| ApiError::NotFound("Kode QR tidak dikenali".into()))?,
        _ => {
            return Err(ApiError::Validation(
                "activity_id atau qr_code wajib diisi".into(),
            ));
        }
    };

    let attendance = NewAttendance {
        activity_id,
        user_id,
        check_in_method: payload.check_in_method.unwrap_or(CheckInMethod::QrCode),
        notes: payload.notes,
    };

    store
        .upsert_attendance(&attendance)
        .await?
        .ok_or_else(|| super::not_found("Kegiatan", activity_id))
}
