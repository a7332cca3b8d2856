//! Reservation HTTP handlers
//!
//! Public endpoints: guests book without an account. Every rule lives in
//! `ReservationService`; these handlers only translate shapes.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use super::dto::{CreateReservationRequest, ListReservationsParams, UpdateReservationRequest};
use crate::application::ReservationService;
use crate::domain::Reservation;
use crate::interfaces::http::common::{ApiError, ErrorBody, MessageResponse, ValidatedJson};

/// Application state for reservation handlers.
#[derive(Clone)]
pub struct ReservationAppState {
    pub service: Arc<ReservationService>,
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations",
    tag = "Reservations",
    params(ListReservationsParams),
    responses(
        (status = 200, description = "Matching reservations", body = Vec<Reservation>),
        (status = 400, description = "Invalid filter", body = ErrorBody)
    )
)]
pub async fn list_reservations(
    State(state): State<ReservationAppState>,
    Query(params): Query<ListReservationsParams>,
) -> Result<Json<Vec<Reservation>>, ApiError> {
    let filter = params.into_filter()?;
    Ok(Json(state.service.list(&filter).await))
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations/{id}",
    tag = "Reservations",
    params(("id" = String, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation", body = Reservation),
        (status = 404, description = "Not found", body = ErrorBody)
    )
)]
pub async fn get_reservation(
    State(state): State<ReservationAppState>,
    Path(id): Path<String>,
) -> Result<Json<Reservation>, ApiError> {
    Ok(Json(state.service.get(&id).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/reservations",
    tag = "Reservations",
    request_body = CreateReservationRequest,
    responses(
        (status = 201, description = "Reservation created", body = Reservation),
        (status = 400, description = "Invalid request or inactive member", body = ErrorBody),
        (status = 404, description = "Unknown court or member", body = ErrorBody),
        (status = 409, description = "Slot overlaps an active reservation", body = ErrorBody),
        (status = 503, description = "Storage busy, retry", body = ErrorBody)
    )
)]
pub async fn create_reservation(
    State(state): State<ReservationAppState>,
    ValidatedJson(request): ValidatedJson<CreateReservationRequest>,
) -> Result<(StatusCode, Json<Reservation>), ApiError> {
    let reservation = state.service.create(request.into()).await?;
    Ok((StatusCode::CREATED, Json(reservation)))
}

#[utoipa::path(
    put,
    path = "/api/v1/reservations/{id}",
    tag = "Reservations",
    params(("id" = String, Path, description = "Reservation ID")),
    request_body = UpdateReservationRequest,
    responses(
        (status = 200, description = "Updated reservation", body = Reservation),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody),
        (status = 409, description = "Slot overlaps an active reservation", body = ErrorBody),
        (status = 503, description = "Storage busy, retry", body = ErrorBody)
    )
)]
pub async fn update_reservation(
    State(state): State<ReservationAppState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateReservationRequest>,
) -> Result<Json<Reservation>, ApiError> {
    Ok(Json(state.service.update(&id, request.into()).await?))
}

#[utoipa::path(
    delete,
    path = "/api/v1/reservations/{id}",
    tag = "Reservations",
    params(("id" = String, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation cancelled", body = MessageResponse),
        (status = 404, description = "Not found", body = ErrorBody),
        (status = 503, description = "Storage busy, retry", body = ErrorBody)
    )
)]
pub async fn cancel_reservation(
    State(state): State<ReservationAppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let reservation = state.service.cancel(&id).await?;
    Ok(Json(MessageResponse {
        message: format!("Reservation {} cancelled", reservation.id),
    }))
}
