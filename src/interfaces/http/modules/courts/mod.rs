//! Courts module

pub mod handlers;

pub use handlers::*;
