pub mod availability;
pub mod courts;
pub mod health;
pub mod journal;
pub mod members;
pub mod metrics;
pub mod payments;
pub mod request_id;
pub mod reservations;
