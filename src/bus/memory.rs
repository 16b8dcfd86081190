//! In-process loopback bus.
//!
//! Mirrors the delivery rules the worker relies on: plain subscribers each get
//! a copy, and a queue group hands each message to exactly one live member,
//! round-robin.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures::channel::mpsc::{self, UnboundedSender};
use futures::StreamExt;
use parking_lot::Mutex;
use uuid::Uuid;

use crate::bus::{InboundMessage, MessageBus, MessageStream};
use crate::error::{Result, WorkerError};

#[derive(Debug, Default)]
struct Group {
    members: Vec<UnboundedSender<InboundMessage>>,
    next: usize,
}

impl Group {
    /// Hands `message` to the next live member. Returns false once the group
    /// has no live members left.
    fn deliver(&mut self, mut message: InboundMessage) -> bool {
        loop {
            self.members.retain(|member| !member.is_closed());
            if self.members.is_empty() {
                return false;
            }
            let index = self.next % self.members.len();
            self.next = index + 1;
            match self.members[index].unbounded_send(message) {
                Ok(()) => return true,
                // Closed after the liveness check; try the next member
                Err(e) => message = e.into_inner(),
            }
        }
    }
}

#[derive(Debug, Default)]
struct Subscriptions {
    /// subject -> queue group name -> members
    groups: HashMap<String, HashMap<String, Group>>,
}

/// Loopback [`MessageBus`] for tests and single-process runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryBus {
    subscriptions: Arc<Mutex<Subscriptions>>,
}

impl MemoryBus {
    pub fn new() -> Self {
        Self::default()
    }

    fn join(&self, subject: &str, group: String) -> MessageStream {
        let (tx, rx) = mpsc::unbounded();
        let mut subscriptions = self.subscriptions.lock();
        subscriptions
            .groups
            .entry(subject.to_string())
            .or_default()
            .entry(group)
            .or_default()
            .members
            .push(tx);
        rx.boxed()
    }

    fn route(&self, subject: &str, reply: Option<&str>, payload: Bytes) {
        let message = InboundMessage {
            subject: subject.to_string(),
            reply: reply.map(str::to_string),
            payload,
        };

        let mut subscriptions = self.subscriptions.lock();
        if let Some(groups) = subscriptions.groups.get_mut(subject) {
            groups.retain(|_, group| group.deliver(message.clone()));
        }
    }

    /// Publishes `payload` with a fresh reply inbox and waits up to `wait` for
    /// the first reply. `Ok(None)` means nothing answered in time.
    pub async fn request(
        &self,
        subject: &str,
        payload: impl Into<Bytes>,
        wait: Duration,
    ) -> Result<Option<Bytes>> {
        let inbox = format!("_INBOX.{}", Uuid::new_v4().simple());
        let mut replies = self.subscribe(&inbox).await?;
        let published = self.publish_with_reply(subject, &inbox, payload.into()).await;

        let reply = match published {
            Ok(()) => tokio::time::timeout(wait, replies.next())
                .await
                .ok()
                .flatten()
                .map(|message| message.payload),
            Err(e) => {
                self.subscriptions.lock().groups.remove(&inbox);
                return Err(e);
            }
        };

        self.subscriptions.lock().groups.remove(&inbox);
        Ok(reply)
    }
}

#[async_trait]
impl MessageBus for MemoryBus {
    async fn queue_subscribe(&self, subject: &str, queue_group: &str) -> Result<MessageStream> {
        if queue_group.is_empty() {
            return Err(WorkerError::TransportFailure(
                "queue group name must not be empty".to_string(),
            ));
        }
        Ok(self.join(subject, queue_group.to_string()))
    }

    async fn subscribe(&self, subject: &str) -> Result<MessageStream> {
        // A plain subscriber is a group of one
        Ok(self.join(subject, format!("_sub.{}", Uuid::new_v4().simple())))
    }

    async fn publish(&self, subject: &str, payload: Bytes) -> Result<()> {
        self.route(subject, None, payload);
        Ok(())
    }

    async fn publish_with_reply(&self, subject: &str, reply: &str, payload: Bytes) -> Result<()> {
        self.route(subject, Some(reply), payload);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_plain_subscribers_each_receive() {
        let bus = MemoryBus::new();
        let mut a = bus.subscribe("events").await.unwrap();
        let mut b = bus.subscribe("events").await.unwrap();

        bus.publish("events", Bytes::from_static(b"hi")).await.unwrap();

        assert_eq!(a.next().await.unwrap().payload, Bytes::from_static(b"hi"));
        assert_eq!(b.next().await.unwrap().payload, Bytes::from_static(b"hi"));
    }

    #[tokio::test]
    async fn test_queue_group_delivers_once() {
        let bus = MemoryBus::new();
        let mut a = bus.queue_subscribe("work", "workers").await.unwrap();
        let mut b = bus.queue_subscribe("work", "workers").await.unwrap();

        for i in 0..4u8 {
            bus.publish("work", Bytes::from(vec![i])).await.unwrap();
        }

        let mut seen = Vec::new();
        for _ in 0..2 {
            seen.push(a.next().await.unwrap().payload[0]);
            seen.push(b.next().await.unwrap().payload[0]);
        }
        seen.sort();
        assert_eq!(seen, vec![0, 1, 2, 3]);

        // Nothing left over on either member
        let leftover = tokio::time::timeout(Duration::from_millis(20), a.next()).await;
        assert!(leftover.is_err());
    }

    #[tokio::test]
    async fn test_dropped_member_is_skipped() {
        let bus = MemoryBus::new();
        let a = bus.queue_subscribe("work", "workers").await.unwrap();
        let mut b = bus.queue_subscribe("work", "workers").await.unwrap();
        drop(a);

        bus.publish("work", Bytes::from_static(b"x")).await.unwrap();
        assert_eq!(b.next().await.unwrap().payload, Bytes::from_static(b"x"));
    }

    #[test]
    fn test_group_survives_member_closing_mid_delivery() {
        let (live_tx, mut live_rx) = mpsc::unbounded();
        let (closed_tx, closed_rx) = mpsc::unbounded();
        let mut group = Group {
            members: vec![closed_tx, live_tx],
            next: 0,
        };
        drop(closed_rx);

        let message = InboundMessage {
            subject: "work".to_string(),
            reply: None,
            payload: Bytes::from_static(b"x"),
        };
        assert!(group.deliver(message));
        assert_eq!(group.members.len(), 1);
        assert!(live_rx.try_next().unwrap().is_some());
    }

    #[tokio::test]
    async fn test_live_member_kept_after_peer_drops() {
        let bus = MemoryBus::new();
        let a = bus.queue_subscribe("work", "workers").await.unwrap();
        let mut b = bus.queue_subscribe("work", "workers").await.unwrap();

        bus.publish("work", Bytes::from_static(b"1")).await.unwrap();
        drop(a);
        bus.publish("work", Bytes::from_static(b"2")).await.unwrap();
        bus.publish("work", Bytes::from_static(b"3")).await.unwrap();

        let mut seen = Vec::new();
        while let Ok(Some(message)) =
            tokio::time::timeout(Duration::from_millis(20), b.next()).await
        {
            seen.push(message.payload);
        }
        assert!(seen.contains(&Bytes::from_static(b"2")));
        assert!(seen.contains(&Bytes::from_static(b"3")));
    }

    #[tokio::test]
    async fn test_request_removes_its_inbox() {
        let bus = MemoryBus::new();
        bus.request("nobody", Bytes::from_static(b"?"), Duration::from_millis(10))
            .await
            .unwrap();
        assert!(bus.subscriptions.lock().groups.is_empty());
    }

    #[tokio::test]
    async fn test_reply_subject_is_carried() {
        let bus = MemoryBus::new();
        let mut sub = bus.subscribe("svc").await.unwrap();

        bus.publish_with_reply("svc", "inbox.1", Bytes::from_static(b"q"))
            .await
            .unwrap();

        let message = sub.next().await.unwrap();
        assert_eq!(message.subject, "svc");
        assert_eq!(message.reply.as_deref(), Some("inbox.1"));
    }

    #[tokio::test]
    async fn test_request_times_out_without_responder() {
        let bus = MemoryBus::new();
        let reply = bus
            .request("nobody", Bytes::from_static(b"?"), Duration::from_millis(20))
            .await
            .unwrap();
        assert!(reply.is_none());
    }

    #[tokio::test]
    async fn test_empty_queue_group_rejected() {
        let bus = MemoryBus::new();
        assert!(matches!(
            bus.queue_subscribe("work", "").await,
            Err(WorkerError::TransportFailure(_))
        ));
    }
}
