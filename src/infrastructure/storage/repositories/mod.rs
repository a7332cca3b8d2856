//! JSON-file repository implementations
//!
//! Per-aggregate repositories + unified RepositoryProvider.

pub mod court_repository;
pub mod journal_repository;
pub mod member_repository;
pub mod payment_repository;
pub mod repository_provider;
pub mod reservation_repository;

pub use repository_provider::JsonRepositoryProvider;
