//! JSON-file implementation of ReservationRepository

use std::path::Path;

use async_trait::async_trait;
use chrono::Utc;
use log::debug;

use crate::domain::reservation::{
    NewReservation, Reservation, ReservationFilter, ReservationPatch, ReservationRepository, ReservationStatus,
    WriteCheck,
};
use crate::domain::{DomainError, DomainResult, Updated};
use crate::infrastructure::storage::{JsonFileStore, LockOptions};

pub const RESERVATIONS_FILE: &str = "reservations.json";

pub struct JsonReservationRepository {
    store: JsonFileStore<Reservation>,
}

impl JsonReservationRepository {
    pub fn new(data_dir: &Path, options: LockOptions) -> Self {
        Self {
            store: JsonFileStore::new(data_dir.join(RESERVATIONS_FILE), options),
        }
    }
}

/// Millisecond timestamp, bumped past the largest stored id so ids stay
/// unique and creation-ordered even within the same millisecond.
fn next_id(existing: &[Reservation]) -> String {
    let now = Utc::now().timestamp_millis().max(0) as u64;
    let max_existing = existing.iter().filter_map(|r| r.id.parse::<u64>().ok()).max();
    match max_existing {
        Some(max) if max >= now => (max + 1).to_string(),
        _ => now.to_string(),
    }
}

#[async_trait]
impl ReservationRepository for JsonReservationRepository {
    async fn find_all(&self, filter: &ReservationFilter) -> Vec<Reservation> {
        self.store
            .read_all()
            .await
            .into_iter()
            .filter(|r| filter.matches(r))
            .collect()
    }

    async fn find_by_id(&self, id: &str) -> Option<Reservation> {
        self.store.read_all().await.into_iter().find(|r| r.id == id)
    }

    async fn create(&self, draft: NewReservation, check: WriteCheck<'_>) -> DomainResult<Reservation> {
        self.store
            .mutate(|records: &mut Vec<Reservation>| {
                let now = Utc::now();
                let reservation = Reservation {
                    id: next_id(records),
                    court_id: draft.court_id,
                    date: draft.date,
                    time_slot: draft.time_slot,
                    occupant: draft.occupant,
                    status: ReservationStatus::Confirmed,
                    payment_id: None,
                    payment_status: None,
                    payment_amount: None,
                    notes: draft.notes,
                    created_at: now,
                    last_modified: now,
                };
                check(&reservation, records)?;
                debug!(
                    "Creating reservation {} on court {} {} {}",
                    reservation.id, reservation.court_id, reservation.date, reservation.time_slot
                );
                records.push(reservation.clone());
                Ok(reservation)
            })
            .await
    }

    async fn update(
        &self,
        id: &str,
        patch: ReservationPatch,
        check: WriteCheck<'_>,
    ) -> DomainResult<Updated<Reservation>> {
        self.store
            .mutate(|records: &mut Vec<Reservation>| {
                let index = records
                    .iter()
                    .position(|r| r.id == id)
                    .ok_or_else(|| DomainError::not_found("Reservation", id))?;

                let before = records[index].clone();
                let mut after = before.clone();
                patch.apply(&mut after);
                after.id = before.id.clone();
                after.last_modified = Utc::now();

                check(&after, records)?;
                debug!("Updating reservation {} ({} -> {})", id, before.status, after.status);
                records[index] = after.clone();
                Ok(Updated { before, after })
            })
            .await
    }
}
