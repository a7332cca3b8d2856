//! Payments module: provider-reported payment records

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
