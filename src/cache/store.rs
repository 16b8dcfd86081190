//! Cache Store Module
//!
//! Time-bounded digest memoization behind a single short-held lock.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::cache::{CacheEntry, CacheStats};

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<String, CacheEntry>,
    stats: CacheStats,
}

// == Digest Cache ==
/// Key to digest store with one fixed TTL.
///
/// Expiry is passive: `get` treats a stale entry as absent but leaves it in
/// place. It is replaced by the next `add` for the same key, or dropped by
/// [`DigestCache::purge_expired`] when a sweep is configured.
#[derive(Debug)]
pub struct DigestCache {
    inner: Mutex<Inner>,
    ttl: Duration,
}

impl DigestCache {
    // == Constructor ==
    /// Creates an empty cache. `ttl` is fixed for the cache's lifetime.
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            ttl,
        }
    }

    // == Add ==
    /// Inserts or overwrites the entry for `key`, resetting its clock.
    pub fn add(&self, key: impl Into<String>, value: impl Into<String>) {
        let entry = CacheEntry::new(value.into());
        let mut inner = self.inner.lock();
        inner.entries.insert(key.into(), entry);
    }

    // == Get ==
    /// Returns the cached value if present and not older than the TTL.
    pub fn get(&self, key: &str) -> Option<String> {
        let now = Instant::now();
        let mut inner = self.inner.lock();

        let value = inner
            .entries
            .get(key)
            .filter(|entry| !entry.is_expired_at(now, self.ttl))
            .map(|entry| entry.value.clone());

        match value {
            Some(_) => inner.stats.record_hit(),
            None => inner.stats.record_miss(),
        }
        value
    }

    // == Purge Expired ==
    /// Removes every expired entry and returns how many were dropped.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let ttl = self.ttl;
        let mut inner = self.inner.lock();

        let before = inner.entries.len();
        inner.entries.retain(|_, entry| !entry.is_expired_at(now, ttl));
        before - inner.entries.len()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().entries.is_empty()
    }

    // == Stats ==
    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock();
        let mut stats = inner.stats.clone();
        stats.set_total_entries(inner.entries.len());
        stats
    }
}

impl Default for DigestCache {
    fn default() -> Self {
        Self::new(crate::cache::DEFAULT_TTL)
    }
}
