//! Payment HTTP handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::{ListPaymentsParams, RecordPaymentRequest, UpdatePaymentStatusRequest};
use crate::application::PaymentService;
use crate::domain::Payment;
use crate::interfaces::http::common::{ApiError, ErrorBody, ValidatedJson};
use crate::interfaces::http::middleware::AuthenticatedMember;

#[derive(Clone)]
pub struct PaymentAppState {
    pub service: Arc<PaymentService>,
}

#[utoipa::path(
    post,
    path = "/api/v1/payments",
    tag = "Payments",
    security(("bearer_auth" = [])),
    request_body = RecordPaymentRequest,
    responses(
        (status = 201, description = "Payment recorded and mirrored onto the reservation", body = Payment),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 403, description = "Admin only", body = ErrorBody),
        (status = 404, description = "Reservation not found", body = ErrorBody)
    )
)]
pub async fn record_payment(
    State(state): State<PaymentAppState>,
    Extension(caller): Extension<AuthenticatedMember>,
    ValidatedJson(request): ValidatedJson<RecordPaymentRequest>,
) -> Result<(StatusCode, Json<Payment>), ApiError> {
    let payment = state.service.record(&caller.actor(), request.into()).await?;
    Ok((StatusCode::CREATED, Json(payment)))
}

#[utoipa::path(
    put,
    path = "/api/v1/payments/{id}/status",
    tag = "Payments",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Payment ID")),
    request_body = UpdatePaymentStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = Payment),
        (status = 403, description = "Admin only", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody)
    )
)]
pub async fn update_payment_status(
    State(state): State<PaymentAppState>,
    Extension(caller): Extension<AuthenticatedMember>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdatePaymentStatusRequest>,
) -> Result<Json<Payment>, ApiError> {
    Ok(Json(
        state
            .service
            .update_status(&caller.actor(), &id, request.status)
            .await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/payments",
    tag = "Payments",
    security(("bearer_auth" = [])),
    params(ListPaymentsParams),
    responses(
        (status = 200, description = "Payments", body = Vec<Payment>),
        (status = 403, description = "Admin only", body = ErrorBody)
    )
)]
pub async fn list_payments(
    State(state): State<PaymentAppState>,
    Extension(caller): Extension<AuthenticatedMember>,
    Query(params): Query<ListPaymentsParams>,
) -> Result<Json<Vec<Payment>>, ApiError> {
    Ok(Json(
        state
            .service
            .list(&caller.actor(), params.reservation_id.as_deref())
            .await?,
    ))
}
