//! Request DTOs
//!
//! Defines the structure of inbound bus message bodies.

use serde::Deserialize;

use crate::cache::CacheKey;
use crate::error::{Result, WorkerError};

/// Digest request read from the bus.
///
/// `hash_type` stays a plain string so an unknown identifier is reported by
/// the dispatcher as unsupported rather than as a malformed envelope.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct DigestRequest {
    /// Algorithm identifier, e.g. `SHA-256`
    pub hash_type: String,
    /// Payload as standard base64 text
    pub data: String,
}

impl DigestRequest {
    /// Parses a message body.
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        serde_json::from_slice(body).map_err(|e| WorkerError::MalformedEnvelope(e.to_string()))
    }

    pub fn cache_key(&self) -> CacheKey {
        CacheKey::new(&self.hash_type, &self.data)
    }
}
