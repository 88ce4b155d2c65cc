// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain entities: bot persona, service catalog, leads, and dialogue sessions.

use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Conversational tone configured for the bot.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Amigable,
    Formal,
    Divertido,
    Profesional,
    Elegante,
}

impl Tone {
    /// Parses a stored tone, falling back to the default for unknown values.
    pub fn parse_or_default(value: &str) -> Self {
        Tone::from_str(value.trim()).unwrap_or_default()
    }

    /// Style directive injected into the reasoning-service system prompt.
    pub fn directive(&self) -> &'static str {
        match self {
            Tone::Amigable => "Sé cálido, cercano y friendly.",
            Tone::Formal => "Sé profesional y formal.",
            Tone::Divertido => "Sé divertido y con humor.",
            Tone::Profesional => "Sé experto y directo.",
            Tone::Elegante => "Sé refinado y sofisticado.",
        }
    }
}

/// Singleton bot configuration, owned by the admin collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotPersona {
    pub name: String,
    pub tone: Tone,
    pub topic: String,
    pub greeting: String,
    pub use_emojis: bool,
}

impl Default for BotPersona {
    fn default() -> Self {
        Self {
            name: "Grooming Bot".to_string(),
            tone: Tone::Amigable,
            topic: "estética canina".to_string(),
            greeting: "¡Hola! ¿En qué puedo ayudarte?".to_string(),
            use_emojis: true,
        }
    }
}

/// A named offering from the service catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub id: i64,
    pub name: String,
}

/// A persisted, validated service request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    pub id: i64,
    pub conversation_id: String,
    pub name: String,
    pub phone: String,
    pub service_id: i64,
    pub service_name: String,
    pub appointment_date: NaiveDate,
    pub created_at: String,
}

/// The fields of a lead before insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLead {
    pub conversation_id: String,
    pub name: String,
    pub phone: String,
    pub service_id: i64,
    /// Catalog name at booking time, kept so the lead survives catalog edits.
    pub service_name: String,
    pub appointment_date: NaiveDate,
}

/// Result of an insert-if-absent on the lead tuple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted(Lead),
    /// A lead with the same (name, phone, service, date) already exists.
    Duplicate,
}

/// A message received while the office was closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AfterHoursContact {
    pub conversation_id: String,
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub message: String,
}

/// Position of a conversation in the capture flow.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum DialogueState {
    /// Not in the capture flow.
    #[default]
    None,
    CollectingName,
    CollectingPhone,
    CollectingService,
    CollectingDate,
}

impl DialogueState {
    /// The scratch field collected in this state, for log context.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            DialogueState::None => None,
            DialogueState::CollectingName => Some("name"),
            DialogueState::CollectingPhone => Some("phone"),
            DialogueState::CollectingService => Some("service"),
            DialogueState::CollectingDate => Some("date"),
        }
    }
}

/// Per-conversation dialogue state plus the scratch fields collected so far.
///
/// `version` is the stored revision the session was loaded at; stores use it
/// for conditional writes and bump it on every successful save.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DialogueSession {
    pub state: DialogueState,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub service: Option<Service>,
    pub version: i64,
}

impl DialogueSession {
    /// Returns true while the conversation is inside the capture flow.
    pub fn is_active(&self) -> bool {
        self.state != DialogueState::None
    }

    /// Enters the capture flow from the beginning, discarding any scratch.
    pub fn begin(&mut self) {
        self.clear_scratch();
        self.state = DialogueState::CollectingName;
    }

    /// Returns to `None` and discards all scratch fields.
    pub fn reset(&mut self) {
        self.clear_scratch();
        self.state = DialogueState::None;
    }

    fn clear_scratch(&mut self) {
        self.name = None;
        self.phone = None;
        self.service = None;
    }
}
