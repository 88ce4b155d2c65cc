// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Channel adapter trait for chat platform integrations.

use async_trait::async_trait;

use crate::error::LeadbotError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{InboundMessage, MessageId, OutboundMessage};

/// Adapter for bidirectional messaging channel integrations.
///
/// The channel delivers one [`InboundMessage`] per user turn and accepts any
/// number of [`OutboundMessage`]s in reply.
#[async_trait]
pub trait ChannelAdapter: PluginAdapter {
    /// Establishes a connection to the messaging platform.
    async fn connect(&mut self) -> Result<(), LeadbotError>;

    /// Sends a reply through the channel.
    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, LeadbotError>;

    /// Receives the next inbound message from the channel.
    async fn receive(&self) -> Result<InboundMessage, LeadbotError>;
}
