//! # Court Booking
//!
//! Reservation service for a tennis club: members and guests book courts by
//! the slot, staff manage members, coaching notes and payment records.
//!
//! ## Architecture
//!
//! - **domain**: Entities, booking invariants and repository traits
//! - **application**: Use cases (booking, availability, membership, payments)
//! - **infrastructure**: JSON file storage with advisory locks, TTL cache, JWT
//! - **interfaces**: REST API with Swagger documentation
//! - **shared**: Errors, retry helper, shutdown coordination

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};

// Re-export storage types for easy access
pub use infrastructure::{JsonRepositoryProvider, LockOptions};

// Re-export API router
pub use interfaces::{create_api_router, ApiServices};
