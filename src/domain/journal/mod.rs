//! Coaching journal aggregate

pub mod model;
pub mod repository;

pub use model::{JournalEntry, NewJournalEntry};
pub use repository::JournalRepository;
