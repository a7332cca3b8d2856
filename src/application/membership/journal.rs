//! Coaching journal service

use std::sync::Arc;

use tracing::info;

use crate::application::access::Actor;
use crate::domain::{
    DomainError, DomainResult, JournalEntry, MemberRole, NewJournalEntry, RepositoryProvider,
};

pub struct JournalService {
    repos: Arc<dyn RepositoryProvider>,
}

impl JournalService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// Coaches and admins write entries about an existing member.
    /// `draft.author_id` is always replaced by the caller's id.
    pub async fn add_entry(&self, actor: &Actor, mut draft: NewJournalEntry) -> DomainResult<JournalEntry> {
        actor.require_any(&[MemberRole::Coach, MemberRole::Admin])?;
        if draft.title.trim().is_empty() {
            return Err(DomainError::Validation("title is required".into()));
        }
        if self.repos.members().find_by_id(&draft.member_id).await.is_none() {
            return Err(DomainError::not_found("Member", &draft.member_id));
        }
        draft.author_id = actor.member_id.clone();

        let entry = self.repos.journal().create(draft).await?;
        info!(entry_id = %entry.id, member_id = %entry.member_id, "Journal entry added");
        Ok(entry)
    }

    pub async fn entries_for(&self, actor: &Actor, member_id: &str) -> DomainResult<Vec<JournalEntry>> {
        actor.require_self_or(member_id, &[MemberRole::Coach, MemberRole::Admin])?;
        Ok(self.repos.journal().find_for_member(member_id).await)
    }
}
