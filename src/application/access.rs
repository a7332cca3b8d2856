//! Caller identity and role checks shared by the application services

use crate::domain::{DomainError, DomainResult, MemberRole};

/// A verified caller: the member id and role carried by their token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub member_id: String,
    pub role: MemberRole,
}

impl Actor {
    pub fn new(member_id: impl Into<String>, role: MemberRole) -> Self {
        Self {
            member_id: member_id.into(),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == MemberRole::Admin
    }

    pub fn require_any(&self, roles: &[MemberRole]) -> DomainResult<()> {
        if roles.contains(&self.role) {
            Ok(())
        } else {
            Err(DomainError::Forbidden(format!(
                "Role '{}' may not perform this action",
                self.role
            )))
        }
    }

    pub fn require_admin(&self) -> DomainResult<()> {
        self.require_any(&[MemberRole::Admin])
    }

    /// The member themself, or one of `roles`.
    pub fn require_self_or(&self, member_id: &str, roles: &[MemberRole]) -> DomainResult<()> {
        if self.member_id == member_id {
            return Ok(());
        }
        self.require_any(roles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_checks() {
        let coach = Actor::new("c-1", MemberRole::Coach);
        assert!(coach.require_admin().is_err());
        assert!(coach.require_any(&[MemberRole::Coach, MemberRole::Admin]).is_ok());
        assert!(coach.require_self_or("c-1", &[]).is_ok());
        assert!(matches!(
            coach.require_self_or("m-2", &[MemberRole::Admin]),
            Err(DomainError::Forbidden(_))
        ));
        assert!(Actor::new("a", MemberRole::Admin).is_admin());
    }
}
