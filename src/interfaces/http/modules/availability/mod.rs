//! Availability module: per-court slot grid for one date

pub mod handlers;

pub use handlers::*;
