//! JSON-file implementation of MemberRepository

use std::path::Path;

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info};
use uuid::Uuid;

use crate::domain::member::{
    format_member_number, parse_member_number, Member, MemberPatch, MemberRepository, NewMember,
};
use crate::domain::{DomainError, DomainResult, ResourceGuard, Updated};
use crate::infrastructure::storage::{JsonFileStore, LockOptions};

pub const MEMBERS_FILE: &str = "members.json";

pub struct JsonMemberRepository {
    store: JsonFileStore<Member>,
}

impl JsonMemberRepository {
    pub fn new(data_dir: &Path, options: LockOptions) -> Self {
        Self {
            store: JsonFileStore::new(data_dir.join(MEMBERS_FILE), options),
        }
    }
}

fn ensure_email_free(records: &[Member], email: &str, except_id: Option<&str>) -> DomainResult<()> {
    let taken = records
        .iter()
        .any(|m| m.has_email(email) && Some(m.id.as_str()) != except_id);
    if taken {
        return Err(DomainError::Duplicate(format!(
            "A member with email '{}' already exists",
            email.trim()
        )));
    }
    Ok(())
}

fn next_member_number(records: &[Member]) -> String {
    let max = records
        .iter()
        .filter_map(|m| parse_member_number(&m.member_number))
        .max()
        .unwrap_or(0);
    format_member_number(max + 1)
}

#[async_trait]
impl MemberRepository for JsonMemberRepository {
    async fn find_all(&self) -> Vec<Member> {
        self.store.read_all().await
    }

    async fn find_by_id(&self, id: &str) -> Option<Member> {
        self.store.read_all().await.into_iter().find(|m| m.id == id)
    }

    async fn find_by_email(&self, email: &str) -> Option<Member> {
        self.store.read_all().await.into_iter().find(|m| m.has_email(email))
    }

    async fn create(&self, draft: NewMember) -> DomainResult<Member> {
        self.store
            .mutate(|records: &mut Vec<Member>| {
                ensure_email_free(records, &draft.email, None)?;

                let now = Utc::now();
                let member = Member {
                    id: Uuid::new_v4().to_string(),
                    member_number: next_member_number(records),
                    first_name: draft.first_name,
                    last_name: draft.last_name,
                    email: draft.email.trim().to_string(),
                    phone: draft.phone,
                    role: draft.role,
                    is_active: true,
                    penalty_cancellations: 0,
                    created_at: now,
                    last_modified: now,
                };
                info!("Registering member {} ({})", member.member_number, member.id);
                records.push(member.clone());
                Ok(member)
            })
            .await
    }

    async fn update(&self, id: &str, patch: MemberPatch) -> DomainResult<Updated<Member>> {
        self.store
            .mutate(|records: &mut Vec<Member>| {
                if let Some(email) = &patch.email {
                    ensure_email_free(records, email, Some(id))?;
                }
                let member = records
                    .iter_mut()
                    .find(|m| m.id == id)
                    .ok_or_else(|| DomainError::not_found("Member", id))?;

                let before = member.clone();
                patch.apply(member);
                member.last_modified = Utc::now();
                debug!("Updated member {}", id);
                Ok(Updated {
                    before,
                    after: member.clone(),
                })
            })
            .await
    }

    async fn record_penalty(&self, id: &str) -> DomainResult<Member> {
        self.store
            .mutate(|records: &mut Vec<Member>| {
                let member = records
                    .iter_mut()
                    .find(|m| m.id == id)
                    .ok_or_else(|| DomainError::not_found("Member", id))?;
                member.penalty_cancellations += 1;
                member.last_modified = Utc::now();
                debug!(
                    "Member {} penalty cancellations now {}",
                    id, member.penalty_cancellations
                );
                Ok(member.clone())
            })
            .await
    }

    async fn lock(&self) -> DomainResult<Box<dyn ResourceGuard>> {
        let guard = self.store.lock().await?;
        Ok(Box::new(guard))
    }
}
