//! Reservation service: booking rules over the reservation repository
//!
//! Every write runs its validation inside the reservation file lock against a
//! fresh read, so the overlap rule holds across concurrent writers. Member
//! bookings additionally hold the members lock (taken first) so a concurrent
//! deactivation cannot slip between the active check and the write.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use super::availability::{availability_key, AvailabilityCache};
use crate::domain::reservation::{ensure_no_conflict, parse_date};
use crate::domain::{
    ClockTime, DomainError, DomainResult, NewReservation, Occupant, OpeningHours, RepositoryProvider,
    Reservation, ReservationFilter, ReservationPatch, ReservationStatus, ResourceGuard, TimeSlot, Updated,
};
use crate::shared::utils::{retry_with_backoff, RetryConfig};

/// Loose booking input as received from callers.
#[derive(Debug, Clone, Default)]
pub struct ReservationRequest {
    pub court_id: String,
    pub date: String,
    pub start: String,
    pub end: String,
    pub member_id: Option<String>,
    pub guest_name: Option<String>,
    pub guest_email: Option<String>,
    pub guest_phone: Option<String>,
    pub notes: Option<String>,
}

/// Partial update; absent fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct ReservationChanges {
    pub court_id: Option<String>,
    pub date: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub notes: Option<String>,
    pub status: Option<String>,
}

pub struct ReservationService {
    repos: Arc<dyn RepositoryProvider>,
    cache: Arc<AvailabilityCache>,
    hours: OpeningHours,
    penalty_retry: RetryConfig,
}

impl ReservationService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, cache: Arc<AvailabilityCache>, hours: OpeningHours) -> Self {
        Self {
            repos,
            cache,
            hours,
            penalty_retry: RetryConfig::default(),
        }
    }

    // ── Queries ─────────────────────────────────────────────────

    pub async fn list(&self, filter: &ReservationFilter) -> Vec<Reservation> {
        self.repos.reservations().find_all(filter).await
    }

    pub async fn get(&self, id: &str) -> DomainResult<Reservation> {
        self.repos
            .reservations()
            .find_by_id(id)
            .await
            .ok_or_else(|| DomainError::not_found("Reservation", id))
    }

    // ── Commands ────────────────────────────────────────────────

    pub async fn create(&self, request: ReservationRequest) -> DomainResult<Reservation> {
        let draft = self.validate_request(request).await?;
        let _stale = StaleDates::new(&self.cache, [draft.date]);

        // Lock order: members before reservations.
        let mut member_guard = match draft.occupant.member_id() {
            Some(member_id) => {
                let mut guard = self.repos.members().lock().await?;
                if let Err(e) = self.ensure_member_can_book(member_id).await {
                    release(&mut *guard).await;
                    return Err(e);
                }
                Some(guard)
            }
            None => None,
        };

        let result = self.repos.reservations().create(draft, &self.write_check()).await;

        if let Some(guard) = member_guard.as_mut() {
            release(&mut **guard).await;
        }

        let reservation = result.map_err(|e| self.observe_failure(e))?;
        metrics::counter!("reservations_created_total").increment(1);
        info!(
            reservation_id = %reservation.id,
            court_id = %reservation.court_id,
            date = %reservation.date,
            slot = %reservation.time_slot,
            "Reservation created"
        );
        Ok(reservation)
    }

    pub async fn update(&self, id: &str, changes: ReservationChanges) -> DomainResult<Reservation> {
        let patch = self.validate_changes(changes).await?;
        let existing = self.get(id).await?;
        let _stale = StaleDates::new(&self.cache, [Some(existing.date), patch.date].into_iter().flatten());
        let updated = self
            .repos
            .reservations()
            .update(id, patch, &self.write_check())
            .await
            .map_err(|e| self.observe_failure(e))?;

        self.after_update(&updated).await;
        info!(reservation_id = %id, "Reservation updated");
        Ok(updated.after)
    }

    /// Soft-cancel. Cancelling an already-cancelled reservation succeeds and
    /// changes nothing.
    pub async fn cancel(&self, id: &str) -> DomainResult<Reservation> {
        let existing = self.get(id).await?;
        if existing.status == ReservationStatus::Cancelled {
            return Ok(existing);
        }
        let _stale = StaleDates::new(&self.cache, [existing.date]);

        let updated = self
            .repos
            .reservations()
            .update(id, ReservationPatch::cancel(), &self.write_check())
            .await
            .map_err(|e| self.observe_failure(e))?;

        self.after_update(&updated).await;
        info!(reservation_id = %id, "Reservation cancelled");
        Ok(updated.after)
    }

    // ── Internals ───────────────────────────────────────────────

    fn write_check(&self) -> impl Fn(&Reservation, &[Reservation]) -> DomainResult<()> + Send + Sync {
        let hours = self.hours;
        move |candidate: &Reservation, existing: &[Reservation]| {
            TimeSlot::new(candidate.time_slot.start, candidate.time_slot.end)?;
            if candidate.is_active() {
                hours.ensure_contains(&candidate.time_slot)?;
            }
            ensure_no_conflict(candidate, existing)
        }
    }

    async fn validate_request(&self, request: ReservationRequest) -> DomainResult<NewReservation> {
        let court_id = required("courtId", &request.court_id)?;
        let date = parse_date(required("date", &request.date)?)?;
        let time_slot = TimeSlot::parse(
            required("timeSlot.start", &request.start)?,
            required("timeSlot.end", &request.end)?,
        )?;
        self.hours.ensure_contains(&time_slot)?;

        let occupant = Occupant::resolve(
            request.member_id,
            request.guest_name,
            request.guest_email,
            request.guest_phone,
        )?;
        self.ensure_court_bookable(court_id).await?;

        Ok(NewReservation {
            court_id: court_id.to_string(),
            date,
            time_slot,
            occupant,
            notes: request.notes.unwrap_or_default(),
        })
    }

    async fn validate_changes(&self, changes: ReservationChanges) -> DomainResult<ReservationPatch> {
        if let Some(court_id) = &changes.court_id {
            self.ensure_court_bookable(court_id).await?;
        }
        let status = changes
            .status
            .as_deref()
            .map(|s| {
                ReservationStatus::parse(s)
                    .ok_or_else(|| DomainError::Validation(format!("Unknown reservation status '{}'", s)))
            })
            .transpose()?;

        Ok(ReservationPatch {
            court_id: changes.court_id,
            date: changes.date.as_deref().map(parse_date).transpose()?,
            start: changes.start.as_deref().map(ClockTime::parse).transpose()?,
            end: changes.end.as_deref().map(ClockTime::parse).transpose()?,
            notes: changes.notes,
            status,
            payment: None,
        })
    }

    async fn ensure_court_bookable(&self, court_id: &str) -> DomainResult<()> {
        match self.repos.courts().find_by_id(court_id).await {
            Some(court) if court.is_active => Ok(()),
            _ => Err(DomainError::not_found("Court", court_id)),
        }
    }

    async fn ensure_member_can_book(&self, member_id: &str) -> DomainResult<()> {
        let member = self
            .repos
            .members()
            .find_by_id(member_id)
            .await
            .ok_or_else(|| DomainError::not_found("Member", member_id))?;
        if !member.is_active {
            return Err(DomainError::InvalidStatus(format!(
                "Member {} is inactive and cannot make reservations",
                member.member_number
            )));
        }
        Ok(())
    }

    async fn after_update(&self, updated: &Updated<Reservation>) {
        self.invalidate_dates(&[updated.before.date, updated.after.date]);

        let newly_cancelled = updated.before.status == ReservationStatus::Confirmed
            && updated.after.status == ReservationStatus::Cancelled;
        if !newly_cancelled {
            return;
        }
        metrics::counter!("reservations_cancelled_total").increment(1);
        if let Some(member_id) = updated.after.member_id() {
            self.record_penalty(member_id).await;
        }
    }

    /// Best effort: the cancellation stands even if this fails.
    async fn record_penalty(&self, member_id: &str) {
        let result = retry_with_backoff(
            self.penalty_retry.clone(),
            || self.repos.members().record_penalty(member_id),
            DomainError::is_transient,
            "record_penalty",
        )
        .await;
        if let Err(e) = result {
            warn!(member_id, error = %e, "Failed to record cancellation penalty");
        }
    }

    fn invalidate_dates(&self, dates: &[NaiveDate]) {
        for date in dates {
            self.cache.invalidate(&availability_key(*date));
        }
    }

    fn observe_failure(&self, e: DomainError) -> DomainError {
        match &e {
            DomainError::Conflict { reservation_id, .. } => {
                metrics::counter!("reservation_conflicts_total").increment(1);
                info!(conflicting_reservation_id = %reservation_id, "Reservation rejected: overlap");
            }
            DomainError::Lock(lock) => warn!(error = %lock, "Reservation write could not acquire lock"),
            _ => {}
        }
        e
    }
}

/// Invalidates availability for its dates when dropped, so a committed write
/// is reflected even if the calling request is cancelled mid-operation.
struct StaleDates<'a> {
    cache: &'a AvailabilityCache,
    dates: Vec<NaiveDate>,
}

impl<'a> StaleDates<'a> {
    fn new(cache: &'a AvailabilityCache, dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        Self {
            cache,
            dates: dates.into_iter().collect(),
        }
    }
}

impl Drop for StaleDates<'_> {
    fn drop(&mut self) {
        for date in &self.dates {
            self.cache.invalidate(&availability_key(*date));
        }
    }
}

fn required<'a>(field: &str, value: &'a str) -> DomainResult<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(DomainError::Validation(format!("{} is required", field)));
    }
    Ok(value)
}

async fn release(guard: &mut dyn ResourceGuard) {
    if let Err(e) = guard.release().await {
        warn!(error = %e, "Failed to release lock");
    }
}
