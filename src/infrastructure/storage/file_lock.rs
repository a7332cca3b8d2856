//! Advisory lock over one data file.
//!
//! The lock is a marker file `<file>.lock` created with create-new semantics,
//! so exactly one process wins the creation race. The marker records the
//! owning pid and acquisition time for diagnostics and stale-lock recovery.
//! Every participant must go through [`FileLock::acquire`]; nothing stops an
//! uncooperative writer.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

use crate::domain::{DomainResult, ResourceGuard};
use crate::shared::errors::LockError;

/// Acquisition tuning.
#[derive(Debug, Clone)]
pub struct LockOptions {
    /// Give up with `LockError::Timeout` after waiting this long.
    pub timeout: Duration,
    /// Sleep between attempts while the marker exists.
    pub retry_interval: Duration,
    /// Markers older than this are considered abandoned. `None` disables recovery.
    pub stale_after: Option<Duration>,
}

impl Default for LockOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            retry_interval: Duration::from_millis(50),
            stale_after: Some(Duration::from_secs(60)),
        }
    }
}

/// Contents of a lock marker.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockMetadata {
    pub pid: u32,
    pub acquired_at: DateTime<Utc>,
}

impl LockMetadata {
    fn current() -> Self {
        Self {
            pid: std::process::id(),
            acquired_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FileLock {
    lock_path: PathBuf,
    resource: String,
    options: LockOptions,
}

impl FileLock {
    /// Lock guarding `target`; the marker lives at `<target>.lock`.
    pub fn new(target: &Path, options: LockOptions) -> Self {
        let mut lock_path = target.as_os_str().to_owned();
        lock_path.push(".lock");
        let resource = target
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| target.display().to_string());
        Self {
            lock_path: PathBuf::from(lock_path),
            resource,
            options,
        }
    }

    pub fn lock_path(&self) -> &Path {
        &self.lock_path
    }

    pub fn options(&self) -> &LockOptions {
        &self.options
    }

    /// Spin-wait (with sleep) until the marker can be created or the timeout
    /// elapses. No fairness: waiters race on every attempt.
    ///
    /// Any I/O error other than "already exists" fails immediately.
    pub async fn acquire(&self) -> Result<LockGuard, LockError> {
        let started = Instant::now();

        loop {
            match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&self.lock_path)
                .await
            {
                Ok(mut file) => {
                    let meta = serde_json::to_vec(&LockMetadata::current()).unwrap_or_default();
                    if let Err(source) = file.write_all(&meta).await {
                        let _ = tokio::fs::remove_file(&self.lock_path).await;
                        return Err(self.io_error(source));
                    }
                    debug!(
                        "Acquired lock {} after {}ms",
                        self.lock_path.display(),
                        started.elapsed().as_millis()
                    );
                    return Ok(LockGuard::new(self.lock_path.clone()));
                }
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                    if self.break_if_stale().await {
                        continue;
                    }

                    let waited = started.elapsed();
                    if waited >= self.options.timeout {
                        metrics::counter!("file_lock_timeouts_total", "resource" => self.resource.clone())
                            .increment(1);
                        warn!(
                            "Timed out waiting for lock {} ({}ms)",
                            self.lock_path.display(),
                            waited.as_millis()
                        );
                        return Err(LockError::Timeout {
                            resource: self.resource.clone(),
                            waited_ms: waited.as_millis() as u64,
                        });
                    }

                    let remaining = self.options.timeout - waited;
                    tokio::time::sleep(self.options.retry_interval.min(remaining)).await;
                }
                Err(source) => return Err(self.io_error(source)),
            }
        }
    }

    /// Non-blocking existence check of the marker. Diagnostic only: the
    /// answer may be stale by the time the caller looks at it.
    pub async fn is_locked(&self) -> bool {
        tokio::fs::try_exists(&self.lock_path).await.unwrap_or(false)
    }

    /// Metadata of the current holder, if a readable marker exists.
    pub async fn holder(&self) -> Option<LockMetadata> {
        let raw = tokio::fs::read(&self.lock_path).await.ok()?;
        serde_json::from_slice(&raw).ok()
    }

    /// Remove the marker if it is older than `stale_after`.
    ///
    /// Breaking is itself serialized through a second create-new marker,
    /// `<file>.lock.breaking`, and staleness is re-checked while holding it.
    /// A fresh marker is therefore never removed by a breaker that judged an
    /// earlier, stale one. A breaking marker left by a crash is cleared once
    /// it is older than `stale_after`.
    async fn break_if_stale(&self) -> bool {
        let Some(stale_after) = self.options.stale_after else {
            return false;
        };
        if !self.marker_older_than(&self.lock_path, stale_after).await {
            return false;
        }

        let breaker_path = self.breaker_path();
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&breaker_path)
            .await
        {
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                if file_older_than(&breaker_path, stale_after).await {
                    warn!("Clearing abandoned lock breaker {}", breaker_path.display());
                    let _ = tokio::fs::remove_file(&breaker_path).await;
                }
                return false;
            }
            Err(e) => {
                debug!("Cannot create lock breaker {}: {}", breaker_path.display(), e);
                return false;
            }
        }
        let mut breaker = LockGuard::new(breaker_path);

        let broken = if self.marker_older_than(&self.lock_path, stale_after).await {
            let holder = self.holder().await;
            match tokio::fs::remove_file(&self.lock_path).await {
                Ok(()) => {
                    warn!(
                        "Removed stale lock {} (holder: {:?})",
                        self.lock_path.display(),
                        holder
                    );
                    true
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => true,
                Err(e) => {
                    warn!("Cannot remove stale lock {}: {}", self.lock_path.display(), e);
                    false
                }
            }
        } else {
            false
        };

        let _ = breaker.release().await;
        broken
    }

    fn breaker_path(&self) -> PathBuf {
        let mut path = self.lock_path.as_os_str().to_owned();
        path.push(".breaking");
        PathBuf::from(path)
    }

    async fn marker_older_than(&self, path: &Path, limit: Duration) -> bool {
        let Ok(raw) = tokio::fs::read(path).await else {
            return false;
        };
        match serde_json::from_slice::<LockMetadata>(&raw) {
            Ok(meta) => (Utc::now() - meta.acquired_at)
                .to_std()
                .map(|age| age >= limit)
                .unwrap_or(false),
            // A marker whose metadata is not written yet belongs to a live
            // writer unless the file itself is old.
            Err(_) => file_older_than(path, limit).await,
        }
    }

    fn io_error(&self, source: std::io::Error) -> LockError {
        LockError::Io {
            path: self.lock_path.clone(),
            source,
        }
    }
}

async fn file_older_than(path: &Path, limit: Duration) -> bool {
    tokio::fs::metadata(path)
        .await
        .and_then(|m| m.modified())
        .ok()
        .and_then(|mtime| SystemTime::now().duration_since(mtime).ok())
        .map(|age| age >= limit)
        .unwrap_or(false)
}

/// Proof of holding a [`FileLock`]. Releasing removes the marker.
#[derive(Debug)]
pub struct LockGuard {
    path: PathBuf,
    released: bool,
}

impl LockGuard {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            released: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the marker. Idempotent; a marker that is already gone counts
    /// as released.
    pub async fn release(&mut self) -> Result<(), LockError> {
        if self.released {
            return Ok(());
        }
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(source) => {
                return Err(LockError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        }
        self.released = true;
        Ok(())
    }
}

impl Drop for LockGuard {
    /// Fallback for guards lost on an error or cancellation path. Blocking,
    /// but a single unlink of a small file.
    fn drop(&mut self) {
        if self.released {
            return;
        }
        warn!("Lock {} dropped without release; removing marker", self.path.display());
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("Failed to remove dropped lock {}: {}", self.path.display(), e);
            }
        }
    }
}

#[async_trait]
impl ResourceGuard for LockGuard {
    async fn release(&mut self) -> DomainResult<()> {
        LockGuard::release(self).await.map_err(Into::into)
    }
}
