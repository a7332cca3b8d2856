//! Payment aggregate

pub mod model;
pub mod repository;

pub use model::{NewPayment, Payment, PaymentStatus};
pub use repository::PaymentRepository;
