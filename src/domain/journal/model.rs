//! Coaching journal entry

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub id: String,
    /// The member the entry is about
    pub member_id: String,
    /// The coach or admin who wrote it
    pub author_id: String,
    pub date: NaiveDate,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewJournalEntry {
    pub member_id: String,
    pub author_id: String,
    pub date: NaiveDate,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
}
