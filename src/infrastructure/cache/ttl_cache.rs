//! Key/value cache with per-entry expiry and pattern invalidation.
//!
//! The cache has no authority over data: any entry may be dropped at any time
//! and rebuilt from the repositories. Invalidation after writes is the
//! caller's job.
//!
//! Every invalidation bumps a cache-wide generation. A reader that computes a
//! value from storage records the generation first and stores the result with
//! [`TtlCache::set_if_generation`], so a write that lands mid-computation is
//! never masked by the reader's older result.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use regex::Regex;
use tracing::{debug, info};

use crate::shared::shutdown::ShutdownSignal;

struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

pub struct TtlCache<V> {
    entries: DashMap<String, CacheEntry<V>>,
    default_ttl: Duration,
    generation: AtomicU64,
}

impl<V> TtlCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            default_ttl,
            generation: AtomicU64::new(0),
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Live value for `key`. An expired entry is evicted and reported absent.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        if let Some(entry) = self.entries.get(key) {
            if !entry.is_expired(now) {
                return Some(entry.value.clone());
            }
        }
        // The read guard must be dropped before removing.
        self.entries.remove_if(key, |_, entry| entry.is_expired(now));
        None
    }

    /// Store `value`, replacing any existing entry. `ttl` of `None` uses the default.
    pub fn set(&self, key: impl Into<String>, value: V, ttl: Option<Duration>) {
        let expires_at = Instant::now() + ttl.unwrap_or(self.default_ttl);
        self.entries.insert(key.into(), CacheEntry { value, expires_at });
    }

    /// Current invalidation generation.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Store `value` only if no invalidation happened since `generation` was
    /// read. Returns whether the value was kept.
    pub fn set_if_generation(
        &self,
        key: impl Into<String>,
        value: V,
        ttl: Option<Duration>,
        generation: u64,
    ) -> bool {
        if self.generation() != generation {
            return false;
        }
        let key = key.into();
        self.set(key.clone(), value, ttl);
        // An invalidation may have run between the check and the insert.
        if self.generation() != generation {
            self.entries.remove(&key);
            return false;
        }
        true
    }

    /// Remove every key containing `pattern`. Returns how many were removed.
    pub fn invalidate(&self, pattern: &str) -> usize {
        self.remove_where(|key| key.contains(pattern))
    }

    /// Remove every key matching `pattern`.
    pub fn invalidate_matching(&self, pattern: &Regex) -> usize {
        self.remove_where(|key| pattern.is_match(key))
    }

    pub fn clear(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.entries.clear();
    }

    /// Drop every expired entry. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        before.saturating_sub(self.entries.len())
    }

    /// Entry count, including entries that expired but were not yet evicted.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn remove_where(&self, matches: impl Fn(&str) -> bool) -> usize {
        // Bump before removing so a concurrent `set_if_generation` either
        // sees the new generation or has its entry removed here.
        self.generation.fetch_add(1, Ordering::SeqCst);
        let before = self.entries.len();
        self.entries.retain(|key, _| !matches(key));
        let removed = before.saturating_sub(self.entries.len());
        if removed > 0 {
            debug!(removed, "Invalidated cache entries");
        }
        removed
    }

    /// Start the background sweep that bounds memory held by keys that are
    /// set but never read again. Stops when `shutdown` fires.
    pub fn spawn_sweeper(
        self: Arc<Self>,
        every: Duration,
        shutdown: ShutdownSignal,
    ) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            info!(interval_secs = every.as_secs(), "🧹 Cache sweeper started");

            let mut interval = tokio::time::interval(every);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        let purged = self.purge_expired();
                        if purged > 0 {
                            debug!(purged, remaining = self.len(), "Swept expired cache entries");
                        }
                    }
                    _ = shutdown.notified().wait() => {
                        info!("🧹 Cache sweeper shutting down");
                        break;
                    }
                }
            }
        })
    }
}
