//! Cache Module
//!
//! Provides in-memory digest memoization with passive TTL expiration.

use std::time::Duration;

mod entry;
mod key;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use key::{CacheKey, KEY_DELIMITER};
pub use stats::CacheStats;
pub use store::DigestCache;

// == Public Constants ==
/// TTL used when none is configured
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);
