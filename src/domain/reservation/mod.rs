//! Reservation aggregate
//!
//! Contains the Reservation entity, time slot types, overlap detection and
//! the repository interface.

pub mod conflict;
pub mod model;
pub mod repository;
pub mod time_slot;

pub use conflict::{ensure_no_conflict, find_conflict};
pub use model::{
    is_plausible_email, NewReservation, Occupant, PaymentInfo, Reservation, ReservationFilter, ReservationPatch,
    ReservationStatus,
};
pub use repository::{ReservationRepository, WriteCheck};
pub use time_slot::{parse_date, ClockTime, TimeSlot};
