//! NATS transport backed by async-nats.

use async_nats::{Client, ConnectOptions};
use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use tracing::info;

use crate::bus::{InboundMessage, MessageBus, MessageStream};
use crate::error::{Result, WorkerError};

/// A connected NATS client.
#[derive(Clone, Debug)]
pub struct NatsBus {
    client: Client,
}

impl NatsBus {
    /// Connects to `url`, authenticating only when credentials are given.
    pub async fn connect(url: &str, credentials: Option<(&str, &str)>) -> Result<Self> {
        let mut options = ConnectOptions::new();
        if let Some((user, password)) = credentials {
            options = options.user_and_password(user.to_string(), password.to_string());
        }

        let client = options
            .connect(url)
            .await
            .map_err(|e| WorkerError::TransportFailure(e.to_string()))?;

        info!("Connected to NATS at {}", url);
        Ok(Self { client })
    }

    /// Flushes pending publishes.
    pub async fn flush(&self) -> Result<()> {
        self.client
            .flush()
            .await
            .map_err(|e| WorkerError::TransportFailure(e.to_string()))
    }
}

fn into_inbound(message: async_nats::Message) -> InboundMessage {
    InboundMessage {
        subject: message.subject.to_string(),
        reply: message.reply.map(|reply| reply.to_string()),
        payload: message.payload,
    }
}

#[async_trait]
impl MessageBus for NatsBus {
    async fn queue_subscribe(&self, subject: &str, queue_group: &str) -> Result<MessageStream> {
        let subscriber = self
            .client
            .queue_subscribe(subject.to_string(), queue_group.to_string())
            .await
            .map_err(|e| WorkerError::TransportFailure(e.to_string()))?;

        Ok(subscriber.map(into_inbound).boxed())
    }

    async fn subscribe(&self, subject: &str) -> Result<MessageStream> {
        let subscriber = self
            .client
            .subscribe(subject.to_string())
            .await
            .map_err(|e| WorkerError::TransportFailure(e.to_string()))?;

        Ok(subscriber.map(into_inbound).boxed())
    }

    async fn publish(&self, subject: &str, payload: Bytes) -> Result<()> {
        self.client
            .publish(subject.to_string(), payload)
            .await
            .map_err(|e| WorkerError::TransportFailure(e.to_string()))
    }

    async fn publish_with_reply(&self, subject: &str, reply: &str, payload: Bytes) -> Result<()> {
        self.client
            .publish_with_reply(subject.to_string(), reply.to_string(), payload)
            .await
            .map_err(|e| WorkerError::TransportFailure(e.to_string()))
    }
}
