//! Member domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Member role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    #[default]
    Player,
    Coach,
    Parent,
    Admin,
}

impl MemberRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Player => "player",
            Self::Coach => "coach",
            Self::Parent => "parent",
            Self::Admin => "admin",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "player" => Some(Self::Player),
            "coach" => Some(Self::Coach),
            "parent" => Some(Self::Parent),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }
}

impl std::fmt::Display for MemberRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Club member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: String,
    /// Sequential, formatted as `M00001`
    pub member_number: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub role: MemberRole,
    /// Inactive members cannot make new bookings.
    pub is_active: bool,
    #[serde(default)]
    pub penalty_cancellations: u32,
    pub created_at: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
}

impl Member {
    pub fn has_email(&self, email: &str) -> bool {
        self.email.eq_ignore_ascii_case(email.trim())
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

pub const MEMBER_NUMBER_PREFIX: &str = "M";

/// Format the n-th member number.
pub fn format_member_number(n: u32) -> String {
    format!("{}{:05}", MEMBER_NUMBER_PREFIX, n)
}

/// Numeric part of a member number, if it is well formed.
pub fn parse_member_number(raw: &str) -> Option<u32> {
    raw.strip_prefix(MEMBER_NUMBER_PREFIX)?.parse().ok()
}

/// Member creation input; the repository assigns id, number and timestamps.
#[derive(Debug, Clone)]
pub struct NewMember {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub role: MemberRole,
}

/// Partial member update
#[derive(Debug, Clone, Default)]
pub struct MemberPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Option<MemberRole>,
    pub is_active: Option<bool>,
}

impl MemberPatch {
    pub fn apply(&self, target: &mut Member) {
        if let Some(v) = &self.first_name {
            target.first_name = v.clone();
        }
        if let Some(v) = &self.last_name {
            target.last_name = v.clone();
        }
        if let Some(v) = &self.email {
            target.email = v.trim().to_string();
        }
        if let Some(v) = &self.phone {
            target.phone = v.clone();
        }
        if let Some(v) = self.role {
            target.role = v;
        }
        if let Some(v) = self.is_active {
            target.is_active = v;
        }
    }
}
