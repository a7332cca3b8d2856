//! Member DTOs

use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::{DomainError, DomainResult, MemberPatch, MemberRole, NewMember};

fn parse_role(raw: &str) -> DomainResult<MemberRole> {
    MemberRole::parse(raw).ok_or_else(|| {
        DomainError::Validation(format!(
            "Invalid role '{}', expected player, coach or admin",
            raw
        ))
    })
}

/// Create member request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMemberRequest {
    #[validate(length(min = 1, max = 100, message = "firstName is required"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "lastName is required"))]
    pub last_name: String,
    #[validate(email(message = "email is not valid"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(max = 40))]
    pub phone: String,
    /// Defaults to `player`
    pub role: Option<String>,
}

impl CreateMemberRequest {
    pub fn into_draft(self) -> DomainResult<NewMember> {
        let role = match self.role.as_deref() {
            Some(raw) => parse_role(raw)?,
            None => MemberRole::default(),
        };
        Ok(NewMember {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            role,
        })
    }
}

/// Update member request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMemberRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    #[validate(email(message = "email is not valid"))]
    pub email: Option<String>,
    #[validate(length(max = 40))]
    pub phone: Option<String>,
    pub role: Option<String>,
    pub is_active: Option<bool>,
}

impl UpdateMemberRequest {
    pub fn into_patch(self) -> DomainResult<MemberPatch> {
        Ok(MemberPatch {
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            role: self.role.as_deref().map(parse_role).transpose()?,
            is_active: self.is_active,
        })
    }
}
