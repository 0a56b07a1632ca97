//! In-memory response cache for remote resources.
//!
//! Entries are keyed by resource URL and hold typed values. An entry is only
//! visible for the fresh window after it was stored; older entries read as
//! misses and are purged once they pass the stale window. Every lookup bumps
//! either the hit or the miss counter so callers can report cache
//! performance after a run.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use dashmap::DashMap;
use parking_lot::Mutex;

/// How long a stored value is served from the cache.
pub const FRESH_TTL: Duration = Duration::from_secs(10 * 60);

/// Age after which an entry is dropped from memory entirely.
pub const STALE_TTL: Duration = Duration::from_secs(15 * 60);

#[derive(Debug)]
struct CachedEntry<V> {
    value: V,
    stored_at: Instant,
}

/// Snapshot of the hit/miss counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hits: {}\nMiss: {}", self.hits, self.misses)
    }
}

/// Typed key/value cache with expiry and hit/miss accounting.
///
/// Safe to share between concurrent fetchers: the entry map sits behind a
/// mutex and the counters are atomics.
pub struct ResponseCache<V> {
    entries: Mutex<HashMap<String, CachedEntry<V>>>,
    /// Per-key locks used to collapse concurrent fetches of the same key.
    inflight: DashMap<String, Arc<tokio::sync::Mutex<()>>>,
    fresh_ttl: Duration,
    stale_ttl: Duration,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<V> Default for ResponseCache<V> {
    fn default() -> Self {
        Self::with_ttl(FRESH_TTL, STALE_TTL)
    }
}

impl<V> ResponseCache<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cache with custom windows. `stale_ttl` is raised to
    /// `fresh_ttl` if it is shorter.
    pub fn with_ttl(fresh_ttl: Duration, stale_ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            inflight: DashMap::new(),
            fresh_ttl,
            stale_ttl: stale_ttl.max(fresh_ttl),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits(),
            misses: self.misses(),
        }
    }

    /// Number of entries currently held, expired or not.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn add(&self, key: impl Into<String>, value: V) {
        self.add_at(key.into(), value, Instant::now());
    }

    fn add_at(&self, key: String, value: V, now: Instant) {
        let mut entries = self.entries.lock();
        let stale_ttl = self.stale_ttl;
        entries.retain(|_, entry| now.saturating_duration_since(entry.stored_at) < stale_ttl);
        entries.insert(
            key,
            CachedEntry {
                value,
                stored_at: now,
            },
        );
    }
}

impl<V: Clone> ResponseCache<V> {
    pub fn get(&self, key: &str) -> Option<V> {
        self.get_at(key, Instant::now())
    }

    fn get_at(&self, key: &str, now: Instant) -> Option<V> {
        let mut entries = self.entries.lock();
        if let Some(entry) = entries.get(key) {
            if now.saturating_duration_since(entry.stored_at) < self.fresh_ttl {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Some(entry.value.clone());
            }
            entries.remove(key);
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    /// Return the cached value for `key`, or run `fetch` and store its result.
    ///
    /// Concurrent callers for the same key wait for the first one, so the
    /// resource is fetched at most once while its entry is fresh. Errors are
    /// returned as-is and nothing is stored.
    pub async fn get_or_try_insert_with<F, Fut, E>(&self, key: &str, fetch: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let lock = self.inflight.entry(key.to_string()).or_default().clone();
        let result = self.fetch_locked(key, fetch, &lock).await;

        // The map holds the last reference once every waiter is done
        drop(lock);
        self.inflight
            .remove_if(key, |_, lock| Arc::strong_count(lock) == 1);

        result
    }

    async fn fetch_locked<F, Fut, E>(
        &self,
        key: &str,
        fetch: F,
        lock: &tokio::sync::Mutex<()>,
    ) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let _guard = lock.lock().await;

        if let Some(value) = self.get(key) {
            return Ok(value);
        }

        let value = fetch().await?;
        self.add(key, value.clone());
        Ok(value)
    }
}
