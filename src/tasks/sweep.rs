//! Expired-entry sweep
//!
//! Background task that periodically drops expired cache entries. Optional:
//! the cache is correct without it, this only bounds memory held by keys that
//! are never requested again.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::DigestCache;

/// Spawns a task that calls [`DigestCache::purge_expired`] every `interval`.
///
/// Returns the task's `JoinHandle`; abort it during shutdown.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(DigestCache::new(Duration::from_secs(300)));
/// let sweep_handle = spawn_sweep_task(cache.clone(), Duration::from_secs(60));
/// // Later, during shutdown:
/// sweep_handle.abort();
/// ```
pub fn spawn_sweep_task(cache: Arc<DigestCache>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Starting cache sweep task with interval of {:?}", interval);

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.purge_expired();

            if removed > 0 {
                info!("Cache sweep: removed {} expired entries", removed);
            } else {
                debug!("Cache sweep: no expired entries found");
            }
            log_cache_stats(&cache);
        }
    })
}

/// Logs the cache's hit/miss counters and current size at info level.
pub fn log_cache_stats(cache: &DigestCache) {
    let stats = cache.stats();
    info!(
        "Cache stats: hits={}, misses={}, hit_rate={:.2}, entries={}",
        stats.hits,
        stats.misses,
        stats.hit_rate(),
        stats.total_entries
    );
}
