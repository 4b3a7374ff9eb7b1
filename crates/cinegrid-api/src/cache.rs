//! Key-value cache with per-entry expiry.
//!
//! The Detail Fetcher owns a [`TtlCache`] and never invalidates entries
//! explicitly; they disappear on expiry. [`MemoryCache`] is the in-process
//! implementation, backed by `DashMap` and evicting lazily on read plus
//! periodically via [`spawn_sweeper`].

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tokio::task::JoinHandle;

/// Key-value store with a time-to-live per entry.
#[allow(clippy::module_name_repetitions)]
pub trait TtlCache<V>: Send + Sync {
    /// Returns a clone of the value if present and not yet expired.
    fn get(&self, key: &str) -> Option<V>;

    /// Stores a value that expires after `ttl`. Replaces any existing entry.
    fn set(&self, key: &str, value: V, ttl: Duration);
}

/// A cached value and the instant it stops being served.
#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    expires_at: Instant,
}

/// In-memory TTL cache backed by `DashMap`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct MemoryCache<V> {
    entries: Arc<DashMap<String, Entry<V>>>,
}

impl<V> Clone for MemoryCache<V> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<V> Default for MemoryCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> MemoryCache<V> {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
        }
    }

    /// Number of stored entries, expired or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes every entry whose expiry is at or before `now`.
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&self, now: Instant) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.expires_at > now);
        let removed = before.saturating_sub(self.entries.len());
        if removed > 0 {
            tracing::debug!(removed, "Purged expired cache entries");
        }
        removed
    }
}

impl<V> TtlCache<V> for MemoryCache<V>
where
    V: Clone + Send + Sync,
{
    fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        let hit = self.entries.get(key).and_then(|entry| {
            (entry.expires_at > now).then(|| entry.value.clone())
        });
        if hit.is_none() {
            self.entries.remove_if(key, |_, entry| entry.expires_at <= now);
        }
        hit
    }

    fn set(&self, key: &str, value: V, ttl: Duration) {
        let now = Instant::now();
        let expires_at = now.checked_add(ttl).unwrap_or(now);
        self.entries
            .insert(String::from(key), Entry { value, expires_at });
    }
}

/// Shortest period [`spawn_sweeper`] will tick at.
pub const MIN_SWEEP_INTERVAL: Duration = Duration::from_secs(1);

/// Spawns a task that purges expired entries every `interval`.
///
/// A zero `interval` is raised to [`MIN_SWEEP_INTERVAL`]. The first sweep
/// runs immediately and the task runs until the returned handle is aborted.
pub fn spawn_sweeper<V>(cache: MemoryCache<V>, interval: Duration) -> JoinHandle<()>
where
    V: Send + Sync + 'static,
{
    let period = if interval.is_zero() {
        tracing::warn!(
            min_secs = MIN_SWEEP_INTERVAL.as_secs(),
            "Zero cache sweep interval; using the minimum"
        );
        MIN_SWEEP_INTERVAL
    } else {
        interval
    };
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            cache.purge_expired(Instant::now());
        }
    })
}
