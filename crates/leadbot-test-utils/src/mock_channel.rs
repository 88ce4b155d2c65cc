// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock channel adapter for deterministic testing.
//!
//! `MockChannel` implements `ChannelAdapter` with injectable inbound messages
//! and captured outbound messages for assertion in tests.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};

use leadbot_core::{
    AdapterType, ChannelAdapter, HealthStatus, InboundMessage, LeadbotError, MessageId,
    OutboundMessage, PluginAdapter,
};

/// A mock messaging channel for testing.
///
/// Provides two queues:
/// - **inbound**: Messages injected via `inject_message()` are returned by `receive()`
/// - **sent**: Messages passed to `send()` are captured and retrievable via `sent_messages()`
pub struct MockChannel {
    inbound: Arc<Mutex<VecDeque<InboundMessage>>>,
    sent: Arc<Mutex<Vec<OutboundMessage>>>,
    notify: Arc<Notify>,
    closed: AtomicBool,
}

impl MockChannel {
    /// Create a new mock channel with empty queues.
    pub fn new() -> Self {
        Self {
            inbound: Arc::new(Mutex::new(VecDeque::new())),
            sent: Arc::new(Mutex::new(Vec::new())),
            notify: Arc::new(Notify::new()),
            closed: AtomicBool::new(false),
        }
    }

    /// Inject an inbound message into the receive queue.
    pub async fn inject_message(&self, msg: InboundMessage) {
        self.inbound.lock().await.push_back(msg);
        self.notify.notify_one();
    }

    /// Make `receive()` fail with a closed-channel error once the queue drains.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.notify.notify_one();
    }

    /// Get all messages that were sent through `send()`.
    pub async fn sent_messages(&self) -> Vec<OutboundMessage> {
        self.sent.lock().await.clone()
    }

    /// Get the count of sent messages.
    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }

    /// Clear all sent messages.
    pub async fn clear_sent(&self) {
        self.sent.lock().await.clear();
    }
}

impl Default for MockChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockChannel {
    fn name(&self) -> &str {
        "mock-channel"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, LeadbotError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), LeadbotError> {
        self.close();
        Ok(())
    }
}

#[async_trait]
impl ChannelAdapter for MockChannel {
    async fn connect(&mut self) -> Result<(), LeadbotError> {
        Ok(())
    }

    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, LeadbotError> {
        let id = format!("mock-msg-{}", uuid::Uuid::new_v4());
        self.sent.lock().await.push(msg);
        Ok(MessageId(id))
    }

    async fn receive(&self) -> Result<InboundMessage, LeadbotError> {
        loop {
            {
                let mut queue = self.inbound.lock().await;
                if let Some(msg) = queue.pop_front() {
                    return Ok(msg);
                }
            }
            if self.closed.load(Ordering::SeqCst) {
                return Err(LeadbotError::Channel {
                    message: "mock channel closed".to_string(),
                    source: None,
                });
            }
            self.notify.notified().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leadbot_core::{InboundContent, Reply};

    #[tokio::test]
    async fn receive_returns_injected_messages_in_order() {
        let channel = MockChannel::new();
        channel.inject_message(InboundMessage::text("c", "first")).await;
        channel.inject_message(InboundMessage::text("c", "second")).await;

        let a = channel.receive().await.unwrap();
        let b = channel.receive().await.unwrap();
        assert_eq!(a.content, InboundContent::Text("first".into()));
        assert_eq!(b.content, InboundContent::Text("second".into()));
    }

    #[tokio::test]
    async fn receive_waits_for_injection() {
        let channel = Arc::new(MockChannel::new());
        let channel_clone = channel.clone();

        tokio::spawn(async move {
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
            channel_clone
                .inject_message(InboundMessage::text("c", "delayed"))
                .await;
        });

        let received = tokio::time::timeout(tokio::time::Duration::from_secs(2), channel.receive())
            .await
            .expect("receive timed out")
            .unwrap();
        assert_eq!(received.content, InboundContent::Text("delayed".into()));
    }

    #[tokio::test]
    async fn send_captures_and_clear_resets() {
        let channel = MockChannel::new();
        let msg = OutboundMessage {
            conversation_id: "c".into(),
            reply: Reply::text("hola"),
        };
        let id = channel.send(msg.clone()).await.unwrap();
        assert!(id.0.starts_with("mock-msg-"));
        channel.send(msg).await.unwrap();
        assert_eq!(channel.sent_count().await, 2);
        assert_eq!(channel.sent_messages().await[0].reply, Reply::text("hola"));

        channel.clear_sent().await;
        assert_eq!(channel.sent_count().await, 0);
    }

    #[tokio::test]
    async fn closed_channel_reports_closed() {
        let channel = MockChannel::new();
        channel.close();
        let err = channel.receive().await.unwrap_err();
        assert!(err.to_string().contains("closed"));
    }
}
