//! Shared HTTP building blocks: error rendering and request extraction

pub mod error;
pub mod validated_json;

pub use error::{ApiError, ErrorBody, MessageResponse};
pub use validated_json::ValidatedJson;
