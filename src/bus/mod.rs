//! Bus Module
//!
//! Transport seam between the worker and the message bus.
//!
//! # Implementations
//! - [`NatsBus`]: NATS via async-nats
//! - [`MemoryBus`]: in-process loopback with the same queue-group semantics

mod memory;
mod nats;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;

use crate::error::Result;

pub use memory::MemoryBus;
pub use nats::NatsBus;

// == Inbound Message ==
/// Transport-neutral view of a delivered message.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub subject: String,
    /// Where a reply should be published, if the sender expects one
    pub reply: Option<String>,
    pub payload: Bytes,
}

/// Stream of messages delivered to one subscriber.
pub type MessageStream = BoxStream<'static, InboundMessage>;

// == Message Bus Trait ==
#[async_trait]
pub trait MessageBus: Send + Sync {
    /// Joins `queue_group` on `subject`. Each message is delivered to exactly
    /// one member of the group.
    async fn queue_subscribe(&self, subject: &str, queue_group: &str) -> Result<MessageStream>;

    /// Receives every message on `subject`.
    async fn subscribe(&self, subject: &str) -> Result<MessageStream>;

    async fn publish(&self, subject: &str, payload: Bytes) -> Result<()>;

    async fn publish_with_reply(&self, subject: &str, reply: &str, payload: Bytes) -> Result<()>;
}
