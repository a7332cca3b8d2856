//! Domain error → HTTP response mapping
//!
//! Every failure leaves the service as `{ "error": "...", "code": "..." }`
//! with a fixed status per error kind. Internal details (I/O paths, parse
//! errors) are logged, not returned.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use crate::domain::DomainError;
use crate::shared::errors::LockError;

/// Error response body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub error: String,
    /// Machine-readable code, e.g. `CONFLICT`, `LOCK_ERROR`
    #[schema(example = "CONFLICT")]
    pub code: String,
    /// Present on `CONFLICT` responses caused by an overlapping booking
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conflicting_reservation_id: Option<String>,
}

/// Plain confirmation message, e.g. for cancellations
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Handler error type: wraps a domain error and renders it.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self(DomainError::Validation(message.into()))
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self(DomainError::Unauthorized(message.into()))
    }

    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match &self.0 {
            DomainError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            DomainError::InvalidStatus(_) => (StatusCode::BAD_REQUEST, "INVALID_STATUS"),
            DomainError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            DomainError::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            DomainError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            DomainError::Conflict { .. } | DomainError::Duplicate(_) => (StatusCode::CONFLICT, "CONFLICT"),
            DomainError::Lock(LockError::Timeout { .. }) => (StatusCode::SERVICE_UNAVAILABLE, "LOCK_ERROR"),
            DomainError::Lock(LockError::Io { .. }) | DomainError::Storage(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self.0 {
            DomainError::Storage(detail) => {
                error!(error = %detail, "Storage failure");
                "Internal storage error".to_string()
            }
            DomainError::Lock(io @ LockError::Io { .. }) => {
                error!(error = %io, "Lock failure");
                "Internal storage error".to_string()
            }
            DomainError::Lock(_) => "Resource is busy, please retry".to_string(),
            other => other.to_string(),
        };

        let conflicting_reservation_id = match &self.0 {
            DomainError::Conflict { reservation_id, .. } => Some(reservation_id.clone()),
            _ => None,
        };

        let body = ErrorBody {
            error: message,
            code: code.to_string(),
            conflicting_reservation_id,
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_of(err: DomainError) -> (StatusCode, ErrorBody) {
        let response = ApiError(err).into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn conflict_carries_reservation_id() {
        let (status, body) = body_of(DomainError::Conflict {
            reservation_id: "1769940000000".into(),
            start: "10:00".into(),
            end: "11:00".into(),
        })
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body.code, "CONFLICT");
        assert_eq!(body.conflicting_reservation_id.as_deref(), Some("1769940000000"));
        assert!(body.error.contains("10:00"));
    }

    #[tokio::test]
    async fn lock_timeout_is_retryable_503() {
        let (status, body) = body_of(DomainError::Lock(LockError::Timeout {
            resource: "reservations.json".into(),
            waited_ms: 5000,
        }))
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.code, "LOCK_ERROR");
    }

    #[tokio::test]
    async fn lock_io_failure_is_a_500_not_a_retry_hint() {
        let (status, body) = body_of(DomainError::Lock(LockError::Io {
            path: "/srv/data/reservations.json.lock".into(),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        }))
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.code, "STORAGE_ERROR");
        assert!(!body.error.contains("/srv/data"));
    }

    #[tokio::test]
    async fn storage_details_are_not_leaked() {
        let (status, body) = body_of(DomainError::Storage("/srv/data/members.json: EACCES".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.code, "STORAGE_ERROR");
        assert!(!body.error.contains("EACCES"));
    }

    #[test]
    fn status_table() {
        let cases = [
            (DomainError::Validation("x".into()), StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            (DomainError::InvalidStatus("inactive".into()), StatusCode::BAD_REQUEST, "INVALID_STATUS"),
            (DomainError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            (DomainError::Forbidden("x".into()), StatusCode::FORBIDDEN, "FORBIDDEN"),
            (DomainError::not_found("Court", "9"), StatusCode::NOT_FOUND, "NOT_FOUND"),
            (DomainError::Duplicate("email".into()), StatusCode::CONFLICT, "CONFLICT"),
        ];
        for (err, status, code) in cases {
            assert_eq!(ApiError(err).status_and_code(), (status, code));
        }
    }
}
