//! Member management service

use std::sync::Arc;

use tracing::info;

use crate::application::access::Actor;
use crate::domain::reservation::is_plausible_email;
use crate::domain::{DomainError, DomainResult, Member, MemberPatch, MemberRole, NewMember, RepositoryProvider};

pub struct MemberService {
    repos: Arc<dyn RepositoryProvider>,
}

impl MemberService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn register(&self, actor: &Actor, draft: NewMember) -> DomainResult<Member> {
        actor.require_admin()?;
        if draft.first_name.trim().is_empty() || draft.last_name.trim().is_empty() {
            return Err(DomainError::Validation("firstName and lastName are required".into()));
        }
        ensure_email(&draft.email)?;

        let member = self.repos.members().create(draft).await?;
        info!(member_id = %member.id, member_number = %member.member_number, "Member registered");
        Ok(member)
    }

    pub async fn list(&self, actor: &Actor) -> DomainResult<Vec<Member>> {
        actor.require_admin()?;
        Ok(self.repos.members().find_all().await)
    }

    pub async fn get(&self, actor: &Actor, id: &str) -> DomainResult<Member> {
        actor.require_self_or(id, &[MemberRole::Admin])?;
        self.repos
            .members()
            .find_by_id(id)
            .await
            .ok_or_else(|| DomainError::not_found("Member", id))
    }

    pub async fn update(&self, actor: &Actor, id: &str, patch: MemberPatch) -> DomainResult<Member> {
        actor.require_admin()?;
        if let Some(email) = &patch.email {
            ensure_email(email)?;
        }
        let updated = self.repos.members().update(id, patch).await?;
        if updated.before.is_active != updated.after.is_active {
            info!(member_id = %id, is_active = updated.after.is_active, "Member status changed");
        }
        Ok(updated.after)
    }
}

fn ensure_email(email: &str) -> DomainResult<()> {
    if is_plausible_email(email.trim()) {
        Ok(())
    } else {
        Err(DomainError::Validation(format!("Invalid email '{}'", email)))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::infrastructure::{JsonRepositoryProvider, LockOptions};

    fn service(dir: &std::path::Path) -> MemberService {
        MemberService::new(Arc::new(JsonRepositoryProvider::new(
            dir,
            LockOptions {
                timeout: Duration::from_secs(2),
                retry_interval: Duration::from_millis(5),
                stale_after: None,
            },
        )))
    }

    fn draft(email: &str) -> NewMember {
        NewMember {
            first_name: "Ann".into(),
            last_name: "Lee".into(),
            email: email.into(),
            phone: String::new(),
            role: MemberRole::Player,
        }
    }

    #[tokio::test]
    async fn only_admins_register_members() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(dir.path());
        let admin = Actor::new("admin", MemberRole::Admin);
        let coach = Actor::new("coach", MemberRole::Coach);

        assert!(matches!(
            svc.register(&coach, draft("a@example.com")).await,
            Err(DomainError::Forbidden(_))
        ));
        let m = svc.register(&admin, draft("a@example.com")).await.unwrap();
        assert_eq!(m.member_number, "M00001");
        assert!(matches!(
            svc.register(&admin, draft("A@EXAMPLE.COM")).await,
            Err(DomainError::Duplicate(_))
        ));
        assert!(matches!(
            svc.register(&admin, draft("not-an-email")).await,
            Err(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn members_can_read_themselves_only() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(dir.path());
        let admin = Actor::new("admin", MemberRole::Admin);
        let a = svc.register(&admin, draft("a@example.com")).await.unwrap();
        let b = svc.register(&admin, draft("b@example.com")).await.unwrap();

        let me = Actor::new(a.id.clone(), MemberRole::Player);
        assert_eq!(svc.get(&me, &a.id).await.unwrap().email, "a@example.com");
        assert!(matches!(svc.get(&me, &b.id).await, Err(DomainError::Forbidden(_))));
        assert!(matches!(svc.list(&me).await, Err(DomainError::Forbidden(_))));
        assert_eq!(svc.list(&admin).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn admin_deactivates_member() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(dir.path());
        let admin = Actor::new("admin", MemberRole::Admin);
        let a = svc.register(&admin, draft("a@example.com")).await.unwrap();

        let patch = MemberPatch {
            is_active: Some(false),
            ..MemberPatch::default()
        };
        let updated = svc.update(&admin, &a.id, patch).await.unwrap();
        assert!(!updated.is_active);
    }
}
