//! Application layer: use-case orchestration over the domain repositories.
//!
//! HTTP handlers are thin wrappers that delegate to these services.

pub mod access;
pub mod booking;
pub mod membership;
pub mod payments;

pub use access::Actor;
pub use booking::{
    AvailabilityCache, AvailabilityService, DayAvailability, ReservationChanges, ReservationRequest,
    ReservationService,
};
pub use membership::{JournalService, MemberService};
pub use payments::{PaymentRecord, PaymentService};
