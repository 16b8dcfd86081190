//! Cache key derivation.

use std::fmt;

/// Separator between algorithm and payload. Appears in neither wire
/// identifiers nor the standard base64 alphabet.
pub const KEY_DELIMITER: char = ':';

/// Memoization key: `<algorithm>:<encoded payload>`.
///
/// Built from the still-encoded payload text, so two requests collide only
/// when their identifiers and encoded payloads match exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(algorithm: &str, payload: &str) -> Self {
        let mut key = String::with_capacity(algorithm.len() + payload.len() + 1);
        key.push_str(algorithm);
        key.push(KEY_DELIMITER);
        key.push_str(payload);
        Self(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
