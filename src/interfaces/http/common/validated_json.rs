//! Validated JSON extractor for Axum
//!
//! `ValidatedJson<T>` works like `axum::Json<T>`, but additionally runs
//! `validator::Validate::validate()` on the deserialized value.
//! Both malformed JSON and validation failures answer 400 with the
//! standard `VALIDATION_ERROR` body.

use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use validator::Validate;

use super::ApiError;

/// JSON body that has passed `validator` checks.
///
/// ```ignore
/// async fn create(ValidatedJson(body): ValidatedJson<CreateReservationRequest>) { .. }
/// ```
pub struct ValidatedJson<T>(pub T);

/// Why a body was refused. Both variants answer 400 `VALIDATION_ERROR`.
pub enum ValidatedJsonRejection {
    Malformed(JsonRejection),
    Invalid(validator::ValidationErrors),
}

/// `field: message` pairs, sorted by field so responses are stable.
fn describe(errors: &validator::ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    let parts: Vec<String> = fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(msg) => msg.to_string(),
                None => format!("{} is invalid ({})", field, e.code),
            })
        })
        .collect();

    if parts.is_empty() {
        "Request body failed validation".to_string()
    } else {
        parts.join("; ")
    }
}

impl IntoResponse for ValidatedJsonRejection {
    fn into_response(self) -> Response {
        let message = match self {
            Self::Malformed(rejection) => format!("Invalid JSON: {}", rejection.body_text()),
            Self::Invalid(errors) => describe(&errors),
        };
        ApiError::validation(message).into_response()
    }
}

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidatedJsonRejection;

    async fn from_request(req: axum::extract::Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(ValidatedJsonRejection::Malformed)?;
        value.validate().map_err(ValidatedJsonRejection::Invalid)?;
        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::routing::post;
    use axum::Router;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::interfaces::http::modules::members::CreateMemberRequest;
    use crate::interfaces::http::modules::reservations::CreateReservationRequest;

    async fn accept_booking(ValidatedJson(body): ValidatedJson<CreateReservationRequest>) -> String {
        body.court_id
    }

    async fn accept_member(ValidatedJson(body): ValidatedJson<CreateMemberRequest>) -> String {
        body.email
    }

    fn app() -> Router {
        Router::new()
            .route("/reservations", post(accept_booking))
            .route("/members", post(accept_member))
    }

    async fn post_raw(uri: &str, body: impl Into<Body>) -> (StatusCode, Vec<u8>) {
        let req = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(body.into())
            .unwrap();
        let resp = app().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    async fn rejected(uri: &str, body: impl Into<Body>) -> String {
        let (status, bytes) = post_raw(uri, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["code"], "VALIDATION_ERROR");
        body["error"].as_str().unwrap().to_string()
    }

    fn booking(court_id: &str) -> Vec<u8> {
        serde_json::to_vec(&json!({
            "courtId": court_id,
            "date": "2026-02-01",
            "timeSlot": {"start": "10:00", "end": "11:00"},
            "guestName": "Ann Lee",
            "guestEmail": "ann@example.com",
            "guestPhone": "555-0100"
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn well_formed_booking_reaches_the_handler() {
        let (status, bytes) = post_raw("/reservations", booking("3")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(bytes, b"3");
    }

    #[tokio::test]
    async fn empty_court_id_is_a_validation_error() {
        let error = rejected("/reservations", booking("")).await;
        assert_eq!(error, "courtId is required");
    }

    #[tokio::test]
    async fn malformed_or_incomplete_json_is_a_validation_error() {
        let error = rejected("/reservations", "{\"courtId\": \"1\",").await;
        assert!(error.starts_with("Invalid JSON"));

        // Missing timeSlot fails deserialization, not validation.
        let no_slot = serde_json::to_vec(&json!({"courtId": "1", "date": "2026-02-01"})).unwrap();
        let error = rejected("/reservations", no_slot).await;
        assert!(error.contains("timeSlot"), "{error}");
    }

    #[tokio::test]
    async fn member_field_errors_are_all_reported_in_field_order() {
        let body = serde_json::to_vec(&json!({
            "firstName": "",
            "lastName": "Park",
            "email": "not-an-address"
        }))
        .unwrap();
        let error = rejected("/members", body).await;
        assert_eq!(error, "email is not valid; firstName is required");
    }
}
