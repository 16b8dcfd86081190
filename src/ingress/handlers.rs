//! Ingress Handlers
//!
//! HTTP request handlers for the companion ingress.

use std::sync::Arc;

use axum::{body::Bytes, extract::State, Json};
use serde_json::Value;
use tracing::debug;

use crate::bus::MessageBus;
use crate::error::{Result, WorkerError};
use crate::models::{HealthResponse, PublishResponse};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct IngressState {
    /// Bus the ingress publishes to
    pub bus: Arc<dyn MessageBus>,
    /// Subject inbound bodies are published on
    pub subject: Arc<str>,
}

impl IngressState {
    pub fn new(bus: Arc<dyn MessageBus>, subject: impl Into<Arc<str>>) -> Self {
        Self {
            bus,
            subject: subject.into(),
        }
    }
}

/// Handler for POST /v1/api
///
/// Accepts any JSON object and publishes it unchanged on the configured
/// subject. The body is not checked against the digest request shape.
pub async fn publish_handler(
    State(state): State<IngressState>,
    body: Bytes,
) -> Result<Json<PublishResponse>> {
    let value: Value = serde_json::from_slice(&body)
        .map_err(|e| WorkerError::MalformedEnvelope(e.to_string()))?;

    if !value.is_object() {
        return Err(WorkerError::MalformedEnvelope(
            "request body must be a JSON object".to_string(),
        ));
    }

    let payload =
        serde_json::to_vec(&value).map_err(|e| WorkerError::SerializationFailure(e.to_string()))?;

    state.bus.publish(&state.subject, payload.into()).await?;
    debug!("Published message to {}: {}", state.subject, value);

    Ok(Json(PublishResponse::published()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::MemoryBus;
    use futures::StreamExt;

    #[tokio::test]
    async fn test_publish_handler_forwards_body() {
        let bus = MemoryBus::new();
        let mut sub = bus.subscribe("hello.world").await.unwrap();
        let state = IngressState::new(Arc::new(bus), "hello.world");

        let body = Bytes::from_static(br#"{"name":"Ada","age":36}"#);
        let result = publish_handler(State(state), body).await;
        assert!(result.is_ok());

        let message = sub.next().await.unwrap();
        let json: Value = serde_json::from_slice(&message.payload).unwrap();
        assert_eq!(json["name"], "Ada");
        assert_eq!(json["age"], 36);
    }

    #[tokio::test]
    async fn test_publish_handler_rejects_non_object() {
        let state = IngressState::new(Arc::new(MemoryBus::new()), "hello.world");

        let result = publish_handler(State(state.clone()), Bytes::from_static(b"[1,2]")).await;
        assert!(matches!(result, Err(WorkerError::MalformedEnvelope(_))));

        let result = publish_handler(State(state), Bytes::from_static(b"nope")).await;
        assert!(matches!(result, Err(WorkerError::MalformedEnvelope(_))));
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }
}
