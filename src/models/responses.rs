//! Response DTOs
//!
//! Defines outbound bus replies and the ingress HTTP bodies.

use bytes::Bytes;
use serde::Serialize;
use uuid::Uuid;

use crate::error::{Result, WorkerError};

/// Reply sent back to the requester.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DigestResponse {
    /// Fresh correlation id, unrelated to any request field
    pub request_id: String,
    /// Echo of the request's identifier
    pub hash_type: String,
    /// Lowercase hex digest
    pub hashed_data: String,
}

impl DigestResponse {
    /// Creates a response with a newly generated request id.
    pub fn new(hash_type: impl Into<String>, hashed_data: impl Into<String>) -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
            hash_type: hash_type.into(),
            hashed_data: hashed_data.into(),
        }
    }

    /// Encodes the reply as a JSON message body.
    pub fn to_bytes(&self) -> Result<Bytes> {
        serde_json::to_vec(self)
            .map(Bytes::from)
            .map_err(|e| WorkerError::SerializationFailure(e.to_string()))
    }
}

/// Body returned by the ingress after a successful publish.
#[derive(Debug, Clone, Serialize)]
pub struct PublishResponse {
    pub message: String,
}

impl PublishResponse {
    pub fn published() -> Self {
        Self {
            message: "Data received and published successfully".to_string(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
