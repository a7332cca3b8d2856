//! Availability HTTP handler

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::application::{AvailabilityService, DayAvailability};
use crate::domain::reservation::parse_date;
use crate::interfaces::http::common::{ApiError, ErrorBody};

#[derive(Clone)]
pub struct AvailabilityAppState {
    pub service: Arc<AvailabilityService>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AvailabilityParams {
    /// Day to inspect, `YYYY-MM-DD`
    pub date: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/v1/availability",
    tag = "Availability",
    params(AvailabilityParams),
    responses(
        (status = 200, description = "Slot grid per active court", body = DayAvailability),
        (status = 400, description = "Missing or malformed date", body = ErrorBody)
    )
)]
pub async fn get_availability(
    State(state): State<AvailabilityAppState>,
    Query(params): Query<AvailabilityParams>,
) -> Result<Json<DayAvailability>, ApiError> {
    let raw = params
        .date
        .filter(|d| !d.trim().is_empty())
        .ok_or_else(|| ApiError::validation("date query parameter is required"))?;
    let date = parse_date(raw.trim())?;

    Ok(Json(state.service.for_date(date).await))
}
