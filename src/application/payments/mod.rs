//! Payments reported by the external provider

pub mod service;

pub use service::{PaymentRecord, PaymentService};
