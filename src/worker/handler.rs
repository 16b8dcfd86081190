//! Per-message handling.
//!
//! decode -> cache lookup -> (hit: reply) | (miss: digest -> cache add -> reply)
//!
//! Every failure is logged and the message dropped; the requester relies on
//! its own timeout.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::bus::{InboundMessage, MessageBus};
use crate::cache::DigestCache;
use crate::digest::DigestDispatcher;
use crate::error::{Result, WorkerError};
use crate::models::{DigestRequest, DigestResponse};

/// Whether a reply was served from the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    Hit,
    Computed,
}

/// Shared state every handler task works against.
#[derive(Clone)]
pub struct RequestHandler {
    bus: Arc<dyn MessageBus>,
    cache: Arc<DigestCache>,
    dispatcher: Arc<dyn DigestDispatcher>,
}

impl RequestHandler {
    pub fn new(
        bus: Arc<dyn MessageBus>,
        cache: Arc<DigestCache>,
        dispatcher: Arc<dyn DigestDispatcher>,
    ) -> Self {
        Self {
            bus,
            cache,
            dispatcher,
        }
    }

    /// Resolves a message body to a reply, consulting the cache first.
    ///
    /// The cache lock is released before the dispatcher runs, so concurrent
    /// misses on the same key may each compute. Both end up writing the same
    /// digest.
    pub fn process(&self, body: &[u8]) -> Result<(DigestResponse, Lookup)> {
        let request = DigestRequest::from_slice(body)?;
        debug!("Received request: {:?}", request);

        let key = request.cache_key();
        if let Some(hashed) = self.cache.get(key.as_str()) {
            debug!("Cache hit for key: {}", key);
            return Ok((
                DigestResponse::new(request.hash_type, hashed),
                Lookup::Hit,
            ));
        }

        let hashed = self.dispatcher.digest(&request.hash_type, &request.data)?;
        self.cache.add(key.as_str(), hashed.clone());
        debug!("Added to cache: {}", key);

        Ok((
            DigestResponse::new(request.hash_type, hashed),
            Lookup::Computed,
        ))
    }

    /// Handles one delivered message end to end.
    pub async fn handle(&self, message: InboundMessage) {
        let (response, lookup) = match self.process(&message.payload) {
            Ok(result) => result,
            Err(e) => {
                warn!("Dropping message on '{}': {}", message.subject, e);
                return;
            }
        };

        if let Err(e) = self.respond(&message, &response).await {
            warn!("Reply {} not sent: {}", response.request_id, e);
            return;
        }

        debug!(
            request_id = %response.request_id,
            cached = lookup == Lookup::Hit,
            "Sent response: {:?}",
            response
        );
    }

    async fn respond(&self, message: &InboundMessage, response: &DigestResponse) -> Result<()> {
        let reply = message.reply.as_deref().ok_or_else(|| {
            WorkerError::TransportFailure(format!(
                "message on '{}' has no reply subject",
                message.subject
            ))
        })?;

        let body = response.to_bytes()?;
        self.bus.publish(reply, body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::MemoryBus;
    use crate::digest::StandardDispatcher;
    use bytes::Bytes;
    use futures::StreamExt;
    use std::time::Duration;

    const HELLO_SHA256: &str = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";

    fn handler_with(bus: Arc<dyn MessageBus>) -> RequestHandler {
        RequestHandler::new(
            bus,
            Arc::new(DigestCache::new(Duration::from_secs(300))),
            Arc::new(StandardDispatcher),
        )
    }

    #[test]
    fn test_process_miss_then_hit() {
        let handler = handler_with(Arc::new(MemoryBus::new()));
        let body = br#"{"hash_type":"SHA-256","data":"aGVsbG8="}"#;

        let (first, lookup) = handler.process(body).unwrap();
        assert_eq!(lookup, Lookup::Computed);
        assert_eq!(first.hashed_data, HELLO_SHA256);

        let (second, lookup) = handler.process(body).unwrap();
        assert_eq!(lookup, Lookup::Hit);
        assert_eq!(second.hashed_data, HELLO_SHA256);
        assert_ne!(first.request_id, second.request_id);
    }

    #[test]
    fn test_process_errors_are_typed() {
        let handler = handler_with(Arc::new(MemoryBus::new()));

        assert!(matches!(
            handler.process(b"{"),
            Err(WorkerError::MalformedEnvelope(_))
        ));
        assert!(matches!(
            handler.process(br#"{"hash_type":"ROT13","data":"YWJj"}"#),
            Err(WorkerError::UnsupportedAlgorithm(_))
        ));
        assert!(matches!(
            handler.process(br#"{"hash_type":"MD5","data":"***"}"#),
            Err(WorkerError::InvalidEncoding(_))
        ));
    }

    #[test]
    fn test_failed_requests_are_not_cached() {
        let handler = handler_with(Arc::new(MemoryBus::new()));
        let _ = handler.process(br#"{"hash_type":"ROT13","data":"YWJj"}"#);
        assert!(handler.cache.is_empty());
    }

    #[tokio::test]
    async fn test_handle_publishes_to_reply_subject() {
        let bus = MemoryBus::new();
        let mut inbox = bus.subscribe("inbox.test").await.unwrap();
        let handler = handler_with(Arc::new(bus));

        handler
            .handle(InboundMessage {
                subject: "hash_requests".to_string(),
                reply: Some("inbox.test".to_string()),
                payload: Bytes::from_static(br#"{"hash_type":"SHA-256","data":"aGVsbG8="}"#),
            })
            .await;

        let reply = inbox.next().await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&reply.payload).unwrap();
        assert_eq!(json["hash_type"], "SHA-256");
        assert_eq!(json["hashed_data"], HELLO_SHA256);
    }

    #[tokio::test]
    async fn test_handle_without_reply_subject_still_caches() {
        let handler = handler_with(Arc::new(MemoryBus::new()));

        handler
            .handle(InboundMessage {
                subject: "hash_requests".to_string(),
                reply: None,
                payload: Bytes::from_static(br#"{"hash_type":"MD5","data":"YWJj"}"#),
            })
            .await;

        assert_eq!(handler.cache.len(), 1);
    }
}
