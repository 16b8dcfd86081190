//! Cache Entry Module
//!
//! Defines a single memoized digest and its creation time.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// A memoized digest. Never handed out of the cache; reads clone `value`.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Hex digest text
    pub value: String,
    /// When the entry was written
    pub created_at: Instant,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry stamped with the current time.
    pub fn new(value: String) -> Self {
        Self {
            value,
            created_at: Instant::now(),
        }
    }

    // == Is Expired ==
    /// Checks whether the entry is stale under `ttl` as of `now`.
    ///
    /// Boundary condition: an entry is expired only once its age is strictly
    /// greater than `ttl`. At exactly `ttl` it is still served.
    pub fn is_expired_at(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.created_at) > ttl
    }
}
