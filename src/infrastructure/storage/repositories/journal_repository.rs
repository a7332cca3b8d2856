//! JSON-file implementation of JournalRepository

use std::path::Path;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::journal::{JournalEntry, JournalRepository, NewJournalEntry};
use crate::domain::DomainResult;
use crate::infrastructure::storage::{JsonFileStore, LockOptions};

pub const JOURNAL_FILE: &str = "journal.json";

pub struct JsonJournalRepository {
    store: JsonFileStore<JournalEntry>,
}

impl JsonJournalRepository {
    pub fn new(data_dir: &Path, options: LockOptions) -> Self {
        Self {
            store: JsonFileStore::new(data_dir.join(JOURNAL_FILE), options),
        }
    }
}

#[async_trait]
impl JournalRepository for JsonJournalRepository {
    async fn find_for_member(&self, member_id: &str) -> Vec<JournalEntry> {
        let mut entries: Vec<JournalEntry> = self
            .store
            .read_all()
            .await
            .into_iter()
            .filter(|e| e.member_id == member_id)
            .collect();
        entries.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
        entries
    }

    async fn create(&self, draft: NewJournalEntry) -> DomainResult<JournalEntry> {
        self.store
            .mutate(|records: &mut Vec<JournalEntry>| {
                let now = Utc::now();
                let entry = JournalEntry {
                    id: Uuid::new_v4().to_string(),
                    member_id: draft.member_id,
                    author_id: draft.author_id,
                    date: draft.date,
                    title: draft.title,
                    content: draft.content,
                    tags: draft.tags,
                    created_at: now,
                    last_modified: now,
                };
                records.push(entry.clone());
                Ok(entry)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn entry(member: &str, day: u32, title: &str) -> NewJournalEntry {
        NewJournalEntry {
            member_id: member.into(),
            author_id: "coach-1".into(),
            date: NaiveDate::from_ymd_opt(2026, 4, day).unwrap(),
            title: title.into(),
            content: "Worked on the backhand".into(),
            tags: vec!["technique".into()],
        }
    }

    #[tokio::test]
    async fn lists_member_entries_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonJournalRepository::new(dir.path(), LockOptions::default());
        repo.create(entry("m-1", 2, "older")).await.unwrap();
        repo.create(entry("m-1", 9, "newer")).await.unwrap();
        repo.create(entry("m-2", 5, "someone else")).await.unwrap();

        let titles: Vec<_> = repo
            .find_for_member("m-1")
            .await
            .into_iter()
            .map(|e| e.title)
            .collect();
        assert_eq!(titles, vec!["newer", "older"]);
    }
}
