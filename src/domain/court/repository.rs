//! Court repository interface

use async_trait::async_trait;

use super::model::Court;
use crate::domain::DomainResult;

#[async_trait]
pub trait CourtRepository: Send + Sync {
    /// All courts, in file order. Read failures yield an empty list.
    async fn find_all(&self) -> Vec<Court>;

    async fn find_by_id(&self, id: &str) -> Option<Court>;

    /// Write `courts` only if no court file exists yet. Returns whether it wrote.
    async fn seed(&self, courts: Vec<Court>) -> DomainResult<bool>;
}
