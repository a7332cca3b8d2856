//! Domain layer: entities, invariants and repository interfaces.

pub mod court;
pub mod journal;
pub mod member;
pub mod payment;
pub mod repositories;
pub mod reservation;

pub use court::{Court, CourtRepository, OpeningHours};
pub use journal::{JournalEntry, JournalRepository, NewJournalEntry};
pub use member::{Member, MemberPatch, MemberRepository, MemberRole, NewMember};
pub use payment::{NewPayment, Payment, PaymentRepository, PaymentStatus};
pub use repositories::{DomainResult, RepositoryProvider, ResourceGuard, Updated};
pub use reservation::{
    ClockTime, NewReservation, Occupant, Reservation, ReservationFilter, ReservationPatch,
    ReservationRepository, ReservationStatus, TimeSlot,
};

pub use crate::shared::errors::DomainError;
