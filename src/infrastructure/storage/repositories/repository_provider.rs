//! JSON-file implementation of RepositoryProvider

use std::path::{Path, PathBuf};

use crate::domain::court::CourtRepository;
use crate::domain::journal::JournalRepository;
use crate::domain::member::MemberRepository;
use crate::domain::payment::PaymentRepository;
use crate::domain::repositories::RepositoryProvider;
use crate::domain::reservation::ReservationRepository;
use crate::infrastructure::storage::LockOptions;

use super::court_repository::JsonCourtRepository;
use super::journal_repository::JsonJournalRepository;
use super::member_repository::JsonMemberRepository;
use super::payment_repository::JsonPaymentRepository;
use super::reservation_repository::JsonReservationRepository;

/// Unified repository provider backed by one JSON file per entity.
///
/// ```ignore
/// let repos = JsonRepositoryProvider::new("data", LockOptions::default());
/// let court = repos.courts().find_by_id("1").await;
/// let member = repos.members().find_by_email("ann@example.com").await;
/// ```
pub struct JsonRepositoryProvider {
    data_dir: PathBuf,
    reservations: JsonReservationRepository,
    members: JsonMemberRepository,
    courts: JsonCourtRepository,
    payments: JsonPaymentRepository,
    journal: JsonJournalRepository,
}

impl JsonRepositoryProvider {
    pub fn new(data_dir: impl Into<PathBuf>, options: LockOptions) -> Self {
        let data_dir = data_dir.into();
        Self {
            reservations: JsonReservationRepository::new(&data_dir, options.clone()),
            members: JsonMemberRepository::new(&data_dir, options.clone()),
            courts: JsonCourtRepository::new(&data_dir, options.clone()),
            payments: JsonPaymentRepository::new(&data_dir, options.clone()),
            journal: JsonJournalRepository::new(&data_dir, options),
            data_dir,
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

impl RepositoryProvider for JsonRepositoryProvider {
    fn reservations(&self) -> &dyn ReservationRepository {
        &self.reservations
    }

    fn members(&self) -> &dyn MemberRepository {
        &self.members
    }

    fn courts(&self) -> &dyn CourtRepository {
        &self.courts
    }

    fn payments(&self) -> &dyn PaymentRepository {
        &self.payments
    }

    fn journal(&self) -> &dyn JournalRepository {
        &self.journal
    }
}
