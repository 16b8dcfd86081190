//! Worker Module
//!
//! Subscribes to the request subject as a member of a queue group and runs
//! every delivered message on its own task.

mod handler;

use std::sync::Arc;

use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::bus::MessageBus;
use crate::cache::DigestCache;
use crate::config::Config;
use crate::digest::{DigestDispatcher, StandardDispatcher};
use crate::error::Result;

pub use handler::{Lookup, RequestHandler};

/// A digest worker bound to one subject and queue group.
pub struct Worker {
    handler: RequestHandler,
    bus: Arc<dyn MessageBus>,
    subject: String,
    queue_group: String,
}

impl Worker {
    /// Creates a worker using the standard dispatcher.
    pub fn new(
        bus: Arc<dyn MessageBus>,
        cache: Arc<DigestCache>,
        subject: impl Into<String>,
        queue_group: impl Into<String>,
    ) -> Self {
        Self::with_dispatcher(bus, cache, Arc::new(StandardDispatcher), subject, queue_group)
    }

    pub fn with_dispatcher(
        bus: Arc<dyn MessageBus>,
        cache: Arc<DigestCache>,
        dispatcher: Arc<dyn DigestDispatcher>,
        subject: impl Into<String>,
        queue_group: impl Into<String>,
    ) -> Self {
        Self {
            handler: RequestHandler::new(Arc::clone(&bus), cache, dispatcher),
            bus,
            subject: subject.into(),
            queue_group: queue_group.into(),
        }
    }

    /// Creates a worker from the subject and queue group in `config`.
    pub fn from_config(bus: Arc<dyn MessageBus>, cache: Arc<DigestCache>, config: &Config) -> Self {
        Self::new(bus, cache, &config.request_subject, &config.queue_group)
    }

    /// Subscribes, then spawns the receive loop.
    ///
    /// The subscription is live once this returns. The loop ends when the
    /// subscription stream closes; abort the handle to stop it earlier.
    pub async fn start(self) -> Result<JoinHandle<()>> {
        let mut messages = self
            .bus
            .queue_subscribe(&self.subject, &self.queue_group)
            .await?;

        info!(
            "Listening for hash requests on '{}' (queue group '{}')",
            self.subject, self.queue_group
        );

        let handler = self.handler;
        let subject = self.subject;

        Ok(tokio::spawn(async move {
            while let Some(message) = messages.next().await {
                let handler = handler.clone();
                tokio::spawn(async move {
                    handler.handle(message).await;
                });
            }
            warn!("Subscription to '{}' closed", subject);
        }))
    }
}
