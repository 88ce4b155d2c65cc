// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits: identifiers, inbound and outbound
//! messages, and reasoning-service requests.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Stable key addressing one user's chat with the bot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationId(pub String);

impl ConversationId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ConversationId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ConversationId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Unique identifier for a delivered message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter behind a trait object.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Channel,
    Provider,
    Storage,
    ImageSearch,
}

// --- Inbound ---

/// Display attributes of the sender, as reported by the transport.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SenderInfo {
    pub display_name: Option<String>,
    pub username: Option<String>,
}

/// Payload of an inbound event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundContent {
    /// Plain text typed by the user.
    Text(String),
    /// A structured callback action identifier (button press).
    Action(String),
}

/// One user turn received from a channel adapter.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub id: String,
    pub conversation_id: ConversationId,
    pub sender: SenderInfo,
    pub content: InboundContent,
    pub received_at: DateTime<Utc>,
}

impl InboundMessage {
    /// Builds a plain-text inbound message with no sender attributes.
    pub fn text(conversation_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(conversation_id, InboundContent::Text(text.into()))
    }

    /// Builds a structured-action inbound message with no sender attributes.
    pub fn action(conversation_id: impl Into<String>, action: impl Into<String>) -> Self {
        Self::new(conversation_id, InboundContent::Action(action.into()))
    }

    fn new(conversation_id: impl Into<String>, content: InboundContent) -> Self {
        Self {
            id: String::new(),
            conversation_id: ConversationId(conversation_id.into()),
            sender: SenderInfo::default(),
            content,
            received_at: Utc::now(),
        }
    }
}

// --- Outbound ---

/// Callback identifier carried by the "start request" affordance.
pub const START_REQUEST_ACTION: &str = "start_request";

/// An inline action offered alongside a text reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affordance {
    /// Offers to start the service request flow.
    StartRequest,
}

impl Affordance {
    /// The structured action identifier the transport sends back when pressed.
    pub fn action_id(&self) -> &'static str {
        match self {
            Affordance::StartRequest => START_REQUEST_ACTION,
        }
    }

    /// Button label shown to the user.
    pub fn label(&self) -> &'static str {
        match self {
            Affordance::StartRequest => "📅 Solicitar servicio",
        }
    }
}

/// One response unit produced by the dialogue engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text {
        text: String,
        affordance: Option<Affordance>,
    },
    Image {
        url: String,
        caption: Option<String>,
    },
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Reply::Text {
            text: text.into(),
            affordance: None,
        }
    }

    pub fn text_with(text: impl Into<String>, affordance: Affordance) -> Self {
        Reply::Text {
            text: text.into(),
            affordance: Some(affordance),
        }
    }

    /// Returns the text body for text replies, or the caption for images.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Reply::Text { text, .. } => Some(text),
            Reply::Image { caption, .. } => caption.as_deref(),
        }
    }

    pub fn affordance(&self) -> Option<Affordance> {
        match self {
            Reply::Text { affordance, .. } => *affordance,
            Reply::Image { .. } => None,
        }
    }
}

/// A reply addressed to a conversation, ready for a channel adapter.
#[derive(Debug, Clone)]
pub struct OutboundMessage {
    pub conversation_id: ConversationId,
    pub reply: Reply,
}

// --- Reasoning service ---

/// A single-turn request to the external reasoning service.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// System instructions.
    pub system: String,
    /// The user text.
    pub user: String,
    /// Upper bound on generated tokens.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
}

/// Free-text response from the reasoning service.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    pub text: String,
    pub model: String,
}
