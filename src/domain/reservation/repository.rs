//! Reservation repository interface

use async_trait::async_trait;

use super::model::{NewReservation, Reservation, ReservationFilter, ReservationPatch};
use crate::domain::{DomainResult, Updated};

/// Validation run inside the write lock against the freshly read list.
///
/// Receives the record about to be written and every stored reservation
/// (including the old version of the record on update).
pub type WriteCheck<'a> = &'a (dyn Fn(&Reservation, &[Reservation]) -> DomainResult<()> + Send + Sync);

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// All reservations matching `filter`. Read failures yield an empty list.
    async fn find_all(&self, filter: &ReservationFilter) -> Vec<Reservation>;

    /// Find reservation by ID. Read failures yield `None`.
    async fn find_by_id(&self, id: &str) -> Option<Reservation>;

    /// Assign id and timestamps, run `check`, append and persist.
    async fn create(&self, draft: NewReservation, check: WriteCheck<'_>) -> DomainResult<Reservation>;

    /// Merge `patch` into the stored record, run `check`, persist.
    async fn update(
        &self,
        id: &str,
        patch: ReservationPatch,
        check: WriteCheck<'_>,
    ) -> DomainResult<Updated<Reservation>>;
}
