//! Court booking: reservations and availability

pub mod availability;
pub mod reservation;

pub use availability::{
    availability_key, AvailabilityCache, AvailabilityService, CourtAvailability, DayAvailability,
    SlotAvailability,
};
pub use reservation::{ReservationChanges, ReservationRequest, ReservationService};
