//! Repository traits for the domain layer
//!
//! Contains:
//! - `RepositoryProvider`: unified access to all per-aggregate repositories
//! - `ResourceGuard`: a held write lock on one logical resource
//! - `DomainResult`: standard result type for domain operations

use async_trait::async_trait;

use super::court::CourtRepository;
use super::journal::JournalRepository;
use super::member::MemberRepository;
use super::payment::PaymentRepository;
use super::reservation::ReservationRepository;
use crate::shared::errors::DomainError;

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Result of an update: the stored record before and after the change.
#[derive(Debug, Clone)]
pub struct Updated<T> {
    pub before: T,
    pub after: T,
}

/// Exclusive write access to one logical resource, held until released.
///
/// `release` is idempotent. Dropping an unreleased guard also releases it.
#[async_trait]
pub trait ResourceGuard: Send {
    async fn release(&mut self) -> DomainResult<()>;
}

// ── RepositoryProvider ──────────────────────────────────────────

/// Provides access to all domain repositories.
///
/// Consumers request only the repository they need:
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let court = repos.courts().find_by_id("1").await;
///     let booked = repos.reservations().find_all(&ReservationFilter::default()).await;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn reservations(&self) -> &dyn ReservationRepository;
    fn members(&self) -> &dyn MemberRepository;
    fn courts(&self) -> &dyn CourtRepository;
    fn payments(&self) -> &dyn PaymentRepository;
    fn journal(&self) -> &dyn JournalRepository;
}
