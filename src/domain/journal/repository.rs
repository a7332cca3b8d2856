//! Journal repository interface

use async_trait::async_trait;

use super::model::{JournalEntry, NewJournalEntry};
use crate::domain::DomainResult;

#[async_trait]
pub trait JournalRepository: Send + Sync {
    /// Entries about `member_id`, newest date first.
    async fn find_for_member(&self, member_id: &str) -> Vec<JournalEntry>;

    async fn create(&self, draft: NewJournalEntry) -> DomainResult<JournalEntry>;
}
