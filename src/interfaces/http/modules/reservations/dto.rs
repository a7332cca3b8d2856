//! Reservation DTOs

use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::{ReservationChanges, ReservationRequest};
use crate::domain::reservation::parse_date;
use crate::domain::{DomainError, DomainResult, ReservationFilter, ReservationStatus};

/// `{start, end}` as `HH:MM`
#[derive(Debug, Deserialize, ToSchema)]
pub struct TimeSlotInput {
    #[schema(example = "10:00")]
    pub start: String,
    #[schema(example = "11:00")]
    pub end: String,
}

/// Booking request. Exactly one of `memberId` or the full guest contact
/// (`guestName`, `guestEmail`, `guestPhone`) must be given.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationRequest {
    #[validate(length(min = 1, message = "courtId is required"))]
    pub court_id: String,
    #[schema(example = "2025-06-01")]
    #[validate(length(min = 1, message = "date is required"))]
    pub date: String,
    pub time_slot: TimeSlotInput,
    pub member_id: Option<String>,
    #[validate(length(max = 200))]
    pub guest_name: Option<String>,
    pub guest_email: Option<String>,
    pub guest_phone: Option<String>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

impl From<CreateReservationRequest> for ReservationRequest {
    fn from(r: CreateReservationRequest) -> Self {
        Self {
            court_id: r.court_id,
            date: r.date,
            start: r.time_slot.start,
            end: r.time_slot.end,
            member_id: r.member_id,
            guest_name: r.guest_name,
            guest_email: r.guest_email,
            guest_phone: r.guest_phone,
            notes: r.notes,
        }
    }
}

/// Either bound may be moved on its own.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct TimeSlotPatch {
    pub start: Option<String>,
    pub end: Option<String>,
}

/// Partial update; absent fields keep their current value.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReservationRequest {
    pub court_id: Option<String>,
    pub date: Option<String>,
    pub time_slot: Option<TimeSlotPatch>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
    /// `confirmed` or `cancelled`
    pub status: Option<String>,
}

impl From<UpdateReservationRequest> for ReservationChanges {
    fn from(r: UpdateReservationRequest) -> Self {
        let slot = r.time_slot.unwrap_or_default();
        Self {
            court_id: r.court_id,
            date: r.date,
            start: slot.start,
            end: slot.end,
            notes: r.notes,
            status: r.status,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListReservationsParams {
    /// `YYYY-MM-DD`
    pub date: Option<String>,
    pub court_id: Option<String>,
    pub member_id: Option<String>,
    /// `confirmed` or `cancelled`
    pub status: Option<String>,
}

impl ListReservationsParams {
    pub fn into_filter(self) -> DomainResult<ReservationFilter> {
        let date = self
            .date
            .as_deref()
            .filter(|d| !d.is_empty())
            .map(parse_date)
            .transpose()?;
        let status = match self.status.as_deref().filter(|s| !s.is_empty()) {
            Some(raw) => Some(ReservationStatus::parse(raw).ok_or_else(|| {
                DomainError::Validation(format!("Invalid status '{}'", raw))
            })?),
            None => None,
        };
        Ok(ReservationFilter {
            date,
            court_id: self.court_id.filter(|c| !c.is_empty()),
            member_id: self.member_id.filter(|m| !m.is_empty()),
            status,
        })
    }
}
