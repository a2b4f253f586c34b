use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

use crate::models::iuran::DeleteTransitionError;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Duplicate(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Permintaan hapus sudah diajukan")]
    DeleteAlreadyRequested,

    #[error("Pembayaran sudah dihapus")]
    DeleteAlreadyApproved,

    #[error("Permintaan hapus diperlukan sebelum persetujuan")]
    DeleteRequestRequired,

    #[error("Pembayaran sedang dalam proses penghapusan dan tidak dapat diubah")]
    PaymentLocked,

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Terjadi kesalahan pada server")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    message: String,
    kind: &'a str,
}

impl ApiError {
    pub fn forbidden() -> Self {
        ApiError::Forbidden("Akses ditolak".into())
    }

    /// Kode stabil untuk klien, tidak bergantung pada teks pesan.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Unauthorized(_) => "unauthorized",
            ApiError::Forbidden(_) => "forbidden",
            ApiError::Validation(_) => "validation",
            ApiError::Duplicate(_) => "duplicate",
            ApiError::NotFound(_) => "not_found",
            ApiError::DeleteAlreadyRequested => "delete_already_requested",
            ApiError::DeleteAlreadyApproved => "delete_already_approved",
            ApiError::DeleteRequestRequired => "delete_request_required",
            ApiError::PaymentLocked => "payment_locked",
            ApiError::MethodNotAllowed => "method_not_allowed",
            ApiError::Internal(_) => "internal",
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Validation(_)
            | ApiError::Duplicate(_)
            | ApiError::DeleteAlreadyRequested
            | ApiError::DeleteAlreadyApproved
            | ApiError::DeleteRequestRequired
            | ApiError::PaymentLocked => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            message: self.to_string(),
            kind: self.kind(),
        })
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict(detail) => {
                log::warn!("Constraint violation: {}", detail);
                ApiError::Duplicate("Data sudah ada".into())
            }
            StoreError::MissingReference(detail) => {
                log::warn!("Foreign key violation: {}", detail);
                ApiError::Validation("Data yang dirujuk tidak ditemukan".into())
            }
            other => {
                log::error!("Store error: {}", other);
                ApiError::Internal(other.to_string())
            }
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(e: ValidationErrors) -> Self {
        ApiError::Validation(e.to_string())
    }
}

impl From<DeleteTransitionError> for ApiError {
    fn from(e: DeleteTransitionError) -> Self {
        match e {
            DeleteTransitionError::AlreadyRequested => ApiError::DeleteAlreadyRequested,
            DeleteTransitionError::AlreadyApproved => ApiError::DeleteAlreadyApproved,
            DeleteTransitionError::RequestRequired => ApiError::DeleteRequestRequired,
        }
    }
}

impl From<bcrypt::BcryptError> for ApiError {
    fn from(e: bcrypt::BcryptError) -> Self {
        log::error!("bcrypt: {:?}", e);
        ApiError::Internal(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[actix_web::test]
    async fn internal_errors_hide_the_cause() {
        let err = ApiError::Internal("relation \"users\" does not exist".into());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(err.error_response().into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["kind"], "internal");
        assert!(!json["message"].as_str().unwrap().contains("relation"));
    }

    #[test]
    fn workflow_errors_map_to_distinct_kinds() {
        let kinds: Vec<&str> = [
            DeleteTransitionError::AlreadyRequested,
            DeleteTransitionError::AlreadyApproved,
            DeleteTransitionError::RequestRequired,
        ]
        .into_iter()
        .map(|e| ApiError::from(e).kind())
        .collect();
        assert_eq!(
            kinds,
            vec![
                "delete_already_requested",
                "delete_already_approved",
                "delete_request_required"
            ]
        );
    }
}
