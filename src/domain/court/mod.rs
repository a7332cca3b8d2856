//! Court aggregate

pub mod hours;
pub mod model;
pub mod repository;

pub use hours::OpeningHours;
pub use model::Court;
pub use repository::CourtRepository;
