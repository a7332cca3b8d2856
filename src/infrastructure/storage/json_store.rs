//! One JSON array per file, guarded by a [`FileLock`] for every mutation.

use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use log::{debug, error, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::file_lock::{FileLock, LockGuard, LockOptions};
use crate::shared::errors::StorageError;

pub struct JsonFileStore<T> {
    path: PathBuf,
    lock: FileLock,
    _records: PhantomData<fn() -> T>,
}

impl<T> JsonFileStore<T>
where
    T: Serialize + DeserializeOwned + Send,
{
    pub fn new(path: impl Into<PathBuf>, options: LockOptions) -> Self {
        let path = path.into();
        let lock = FileLock::new(&path, options);
        Self {
            path,
            lock,
            _records: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_lock(&self) -> &FileLock {
        &self.lock
    }

    pub async fn exists(&self) -> bool {
        tokio::fs::try_exists(&self.path).await.unwrap_or(false)
    }

    /// Read every record, degrading any failure to an empty list.
    ///
    /// Unlocked: relies on writes being replaced atomically by rename.
    pub async fn read_all(&self) -> Vec<T> {
        match self.read_strict().await {
            Ok(records) => records,
            Err(e) => {
                error!("Failed to read {}: {}", self.path.display(), e);
                Vec::new()
            }
        }
    }

    /// Read every record. A missing or blank file is an empty list; anything
    /// unparsable is an error so that a mutation never overwrites it.
    pub async fn read_strict(&self) -> Result<Vec<T>, StorageError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&raw).map_err(|e| StorageError::Corrupt {
            path: self.path.clone(),
            reason: e.to_string(),
        })
    }

    /// Hold this file's lock without reading or writing.
    pub async fn lock(&self) -> Result<LockGuard, StorageError> {
        self.ensure_parent_dir().await?;
        Ok(self.lock.acquire().await?)
    }

    /// Locked read-modify-write.
    ///
    /// Acquires the lock, re-reads the file, hands the records to `f` and
    /// writes them back if `f` succeeds. An `Err` from `f` leaves the file
    /// untouched. The lock is released on every path.
    pub async fn mutate<R, E, F>(&self, f: F) -> Result<R, E>
    where
        F: FnOnce(&mut Vec<T>) -> Result<R, E>,
        E: From<StorageError>,
    {
        let mut guard = self.lock().await?;

        let result: Result<R, E> = async {
            let mut records = self.read_strict().await?;
            let out = f(&mut records)?;
            self.write_all(&records).await?;
            Ok(out)
        }
        .await;

        if let Err(e) = guard.release().await {
            warn!("Failed to release lock {}: {}", guard.path().display(), e);
        }
        result
    }

    /// Replace the file contents. Callers must hold the lock.
    ///
    /// Writes `<file>.tmp` then renames it over the target so readers never
    /// observe a partial file.
    async fn write_all(&self, records: &[T]) -> Result<(), StorageError> {
        self.ensure_parent_dir().await?;
        let body = serde_json::to_vec_pretty(records)?;

        let mut tmp = self.path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, &body).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        debug!("Wrote {} records to {}", records.len(), self.path.display());
        Ok(())
    }

    /// Write `records` only if the file does not exist yet.
    pub async fn write_if_absent(&self, records: &[T]) -> Result<bool, StorageError> {
        let mut guard = self.lock().await?;
        let result = if self.exists().await {
            Ok(false)
        } else {
            self.write_all(records).await.map(|_| true)
        };
        if let Err(e) = guard.release().await {
            warn!("Failed to release lock {}: {}", guard.path().display(), e);
        }
        result
    }

    async fn ensure_parent_dir(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Item {
        id: u32,
        name: String,
    }

    fn store(dir: &Path) -> JsonFileStore<Item> {
        JsonFileStore::new(
            dir.join("items.json"),
            LockOptions {
                timeout: Duration::from_millis(100),
                retry_interval: Duration::from_millis(5),
                stale_after: None,
            },
        )
    }

    #[tokio::test]
    async fn missing_and_blank_files_read_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        assert!(store.read_all().await.is_empty());

        std::fs::write(store.path(), "  \n").unwrap();
        assert!(store.read_strict().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn corrupt_file_reads_empty_but_blocks_mutation() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        std::fs::write(store.path(), "{not json").unwrap();

        assert!(store.read_all().await.is_empty());

        let result: Result<(), StorageError> = store
            .mutate(|items| {
                items.push(Item {
                    id: 1,
                    name: "x".into(),
                });
                Ok(())
            })
            .await;
        assert!(matches!(result, Err(StorageError::Corrupt { .. })));
        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), "{not json");
        assert!(!store.file_lock().is_locked().await);
    }

    #[tokio::test]
    async fn mutate_persists_and_releases_lock() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());

        let count: Result<usize, StorageError> = store
            .mutate(|items| {
                items.push(Item {
                    id: 1,
                    name: "first".into(),
                });
                Ok(items.len())
            })
            .await;
        assert_eq!(count.unwrap(), 1);
        assert!(!store.file_lock().is_locked().await);
        assert!(!dir.path().join("items.json.tmp").exists());

        let items = store.read_all().await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "first");
    }

    #[tokio::test]
    async fn failed_mutation_does_not_write() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());

        #[derive(Debug)]
        enum TestError {
            Rejected,
            Storage,
        }
        impl From<StorageError> for TestError {
            fn from(_: StorageError) -> Self {
                TestError::Storage
            }
        }

        let result: Result<(), TestError> = store
            .mutate(|items| {
                items.push(Item {
                    id: 9,
                    name: "never".into(),
                });
                Err(TestError::Rejected)
            })
            .await;
        assert!(matches!(result, Err(TestError::Rejected)));
        assert!(!store.exists().await);
        assert!(!store.file_lock().is_locked().await);
    }

    #[tokio::test]
    async fn mutation_fails_with_lock_error_when_held() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        let _held = store.lock().await.unwrap();

        let result: Result<(), StorageError> = store.mutate(|_| Ok(())).await;
        assert!(matches!(result, Err(StorageError::Lock(_))));
    }

    #[tokio::test]
    async fn write_if_absent_only_seeds_once() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        let seed = vec![Item {
            id: 1,
            name: "seed".into(),
        }];

        assert!(store.write_if_absent(&seed).await.unwrap());
        assert!(!store.write_if_absent(&[]).await.unwrap());
        assert_eq!(store.read_all().await, seed);
    }

    #[tokio::test]
    async fn creates_missing_data_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir.path().join("nested"));
        let result: Result<(), StorageError> = store
            .mutate(|items| {
                items.push(Item {
                    id: 1,
                    name: "a".into(),
                });
                Ok(())
            })
            .await;
        result.unwrap();
        assert_eq!(store.read_all().await.len(), 1);
    }
}
