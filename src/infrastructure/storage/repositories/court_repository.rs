//! JSON-file implementation of CourtRepository

use std::path::Path;

use async_trait::async_trait;
use log::info;

use crate::domain::court::{Court, CourtRepository};
use crate::domain::DomainResult;
use crate::infrastructure::storage::{JsonFileStore, LockOptions};

pub const COURTS_FILE: &str = "courts.json";

pub struct JsonCourtRepository {
    store: JsonFileStore<Court>,
}

impl JsonCourtRepository {
    pub fn new(data_dir: &Path, options: LockOptions) -> Self {
        Self {
            store: JsonFileStore::new(data_dir.join(COURTS_FILE), options),
        }
    }
}

#[async_trait]
impl CourtRepository for JsonCourtRepository {
    async fn find_all(&self) -> Vec<Court> {
        self.store.read_all().await
    }

    async fn find_by_id(&self, id: &str) -> Option<Court> {
        self.store.read_all().await.into_iter().find(|c| c.id == id)
    }

    async fn seed(&self, courts: Vec<Court>) -> DomainResult<bool> {
        let written = self.store.write_if_absent(&courts).await?;
        if written {
            info!("Seeded {} courts into {}", courts.len(), self.store.path().display());
        }
        Ok(written)
    }
}
