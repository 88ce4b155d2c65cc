// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage traits: backend lifecycle, dialogue sessions, leads, and the
//! admin-owned persona and service catalog.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::LeadbotError;
use crate::model::{
    AfterHoursContact, BotPersona, DialogueSession, InsertOutcome, Lead, NewLead, Service,
};
use crate::traits::adapter::PluginAdapter;
use crate::types::ConversationId;

/// Adapter for storage and persistence backends.
#[async_trait]
pub trait StorageAdapter: PluginAdapter {
    /// Initializes the storage backend (migrations, connection, etc.).
    async fn initialize(&self) -> Result<(), LeadbotError>;

    /// Closes the storage backend, flushing pending writes.
    async fn close(&self) -> Result<(), LeadbotError>;
}

/// Keyed access to per-conversation dialogue sessions.
///
/// Sessions for different conversations are fully independent.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Loads the session for a conversation.
    ///
    /// A missing key yields a fresh `None`-state session at version 0; this
    /// never fails because the key is absent.
    async fn load(&self, conversation_id: &ConversationId) -> Result<DialogueSession, LeadbotError>;

    /// Persists the session if the stored version still equals `session.version`.
    ///
    /// Returns the new version on success, or [`LeadbotError::SessionConflict`]
    /// if another writer saved first.
    async fn save(
        &self,
        conversation_id: &ConversationId,
        session: &DialogueSession,
    ) -> Result<i64, LeadbotError>;
}

/// Persisted leads and after-hours contacts.
#[async_trait]
pub trait LeadStore: Send + Sync {
    /// Most recent lead registered with this (canonical) phone, if any.
    async fn find_lead_by_phone(&self, phone: &str) -> Result<Option<Lead>, LeadbotError>;

    /// Whether a lead with exactly this tuple exists.
    async fn booking_exists(
        &self,
        name: &str,
        phone: &str,
        service_id: i64,
        date: NaiveDate,
    ) -> Result<bool, LeadbotError>;

    /// Atomically inserts the lead unless the tuple is already taken.
    async fn insert_lead_if_absent(&self, lead: &NewLead) -> Result<InsertOutcome, LeadbotError>;

    /// All leads, newest first.
    async fn list_leads(&self) -> Result<Vec<Lead>, LeadbotError>;

    /// Deletes a lead by id. Returns false if it did not exist.
    async fn delete_lead(&self, id: i64) -> Result<bool, LeadbotError>;

    /// Records a message received outside office hours.
    async fn record_after_hours_contact(
        &self,
        contact: &AfterHoursContact,
    ) -> Result<(), LeadbotError>;
}

/// Read access to the admin-owned persona and service catalog.
#[async_trait]
pub trait CatalogReader: Send + Sync {
    /// Current persona; defaults if none was ever saved.
    async fn persona(&self) -> Result<BotPersona, LeadbotError>;

    /// Current catalog, ordered by name.
    async fn services(&self) -> Result<Vec<Service>, LeadbotError>;
}

/// Write access to the persona and catalog. Used by the admin CLI only.
#[async_trait]
pub trait CatalogAdmin: CatalogReader {
    /// Inserts the default persona if none exists. Returns true if it inserted.
    async fn ensure_persona(&self) -> Result<bool, LeadbotError>;

    /// Replaces the persona in place.
    async fn save_persona(&self, persona: &BotPersona) -> Result<(), LeadbotError>;

    /// Adds a service; names are unique.
    async fn add_service(&self, name: &str) -> Result<Service, LeadbotError>;

    /// Removes a service by name. Returns false if it did not exist.
    async fn remove_service(&self, name: &str) -> Result<bool, LeadbotError>;
}
