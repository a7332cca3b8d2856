//! Member repository interface

use async_trait::async_trait;

use super::model::{Member, MemberPatch, NewMember};
use crate::domain::{DomainResult, ResourceGuard, Updated};

#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// All members. Read failures yield an empty list.
    async fn find_all(&self) -> Vec<Member>;

    async fn find_by_id(&self, id: &str) -> Option<Member>;

    async fn find_by_email(&self, email: &str) -> Option<Member>;

    /// Create a member. Fails with `Duplicate` if the email is taken
    /// (case-insensitive). The member number is the next in sequence.
    async fn create(&self, draft: NewMember) -> DomainResult<Member>;

    async fn update(&self, id: &str, patch: MemberPatch) -> DomainResult<Updated<Member>>;

    /// Increment `penaltyCancellations` by one.
    async fn record_penalty(&self, id: &str) -> DomainResult<Member>;

    /// Hold the members write lock without mutating.
    ///
    /// Used to keep member status stable while a dependent write runs on
    /// another file. Always taken before any other file's lock.
    async fn lock(&self) -> DomainResult<Box<dyn ResourceGuard>>;
}
