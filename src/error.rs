//! Error types for the digest worker
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Worker Error Enum ==
/// Unified error type for the worker and its ingress.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkerError {
    /// Payload is not valid standard base64
    #[error("Invalid encoding: {0}")]
    InvalidEncoding(String),

    /// Algorithm identifier is not in the supported set
    #[error("Unsupported hash type: {0}")]
    UnsupportedAlgorithm(String),

    /// Inbound message body could not be parsed
    #[error("Malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// Outbound message could not be encoded
    #[error("Serialization failure: {0}")]
    SerializationFailure(String),

    /// Connect, subscribe or publish error from the bus
    #[error("Transport failure: {0}")]
    TransportFailure(String),
}

impl WorkerError {
    /// Status code used when the error surfaces through the HTTP ingress.
    pub fn status_code(&self) -> StatusCode {
        match self {
            WorkerError::MalformedEnvelope(_) => StatusCode::BAD_REQUEST,
            WorkerError::TransportFailure(_) => StatusCode::SERVICE_UNAVAILABLE,
            WorkerError::InvalidEncoding(_)
            | WorkerError::UnsupportedAlgorithm(_)
            | WorkerError::SerializationFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for WorkerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the worker.
pub type Result<T> = std::result::Result<T, WorkerError>;
