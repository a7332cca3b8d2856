//! Health module: liveness and data directory check

pub mod handlers;

pub use handlers::*;
