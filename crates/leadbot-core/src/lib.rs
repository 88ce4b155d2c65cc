// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Leadbot assistant.
//!
//! This crate provides the trait definitions, error type, and domain types
//! shared by the dialogue engine and every adapter. External collaborators
//! (chat transport, reasoning service, image search, storage) are reached
//! only through the traits defined here.

pub mod error;
pub mod model;
pub mod traits;
pub mod types;

pub use error::LeadbotError;
pub use model::{
    AfterHoursContact, BotPersona, DialogueSession, DialogueState, InsertOutcome, Lead, NewLead,
    Service, Tone,
};
pub use types::{
    AdapterType, Affordance, CompletionRequest, CompletionResponse, ConversationId,
    HealthStatus, InboundContent, InboundMessage, MessageId, OutboundMessage, Reply, SenderInfo,
    START_REQUEST_ACTION,
};

pub use traits::{
    CatalogAdmin, CatalogReader, ChannelAdapter, CompletionProvider, ImageSearch, LeadStore,
    PluginAdapter, SessionStore, StorageAdapter,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leadbot_error_has_all_variants() {
        let _config = LeadbotError::Config("test".into());
        let _storage = LeadbotError::Storage {
            source: Box::new(std::io::Error::other("test")),
        };
        let _channel = LeadbotError::Channel {
            message: "test".into(),
            source: None,
        };
        let _conflict = LeadbotError::SessionConflict {
            conversation_id: "42".into(),
        };
        let _internal = LeadbotError::Internal("test".into());
    }

    #[test]
    fn external_errors_are_classified() {
        let provider = LeadbotError::Provider {
            message: "down".into(),
            source: None,
        };
        let timeout = LeadbotError::Timeout {
            duration: std::time::Duration::from_secs(5),
        };
        let storage = LeadbotError::Storage {
            source: "locked".into(),
        };
        assert!(provider.is_external());
        assert!(timeout.is_external());
        assert!(!storage.is_external());
    }

    #[test]
    fn adapter_type_round_trips_through_strings() {
        use std::str::FromStr;

        for variant in [
            AdapterType::Channel,
            AdapterType::Provider,
            AdapterType::Storage,
            AdapterType::ImageSearch,
        ] {
            let parsed = AdapterType::from_str(&variant.to_string()).expect("should parse back");
            assert_eq!(variant, parsed);
        }
    }

    #[test]
    fn start_request_affordance_uses_shared_action_id() {
        assert_eq!(Affordance::StartRequest.action_id(), START_REQUEST_ACTION);
        let reply = Reply::text_with("hola", Affordance::StartRequest);
        assert_eq!(reply.as_text(), Some("hola"));
        assert_eq!(reply.affordance(), Some(Affordance::StartRequest));
    }

    #[test]
    fn inbound_helpers_fill_conversation_id() {
        let msg = InboundMessage::text("chat-1", "hola");
        assert_eq!(msg.conversation_id.as_str(), "chat-1");
        assert_eq!(msg.content, InboundContent::Text("hola".into()));

        let action = InboundMessage::action("chat-1", START_REQUEST_ACTION);
        assert_eq!(
            action.content,
            InboundContent::Action(START_REQUEST_ACTION.into())
        );
    }

    #[test]
    fn all_traits_are_object_safe() {
        fn _channel(_: &dyn ChannelAdapter) {}
        fn _provider(_: &dyn CompletionProvider) {}
        fn _image(_: &dyn ImageSearch) {}
        fn _storage(_: &dyn StorageAdapter) {}
        fn _sessions(_: &dyn SessionStore) {}
        fn _leads(_: &dyn LeadStore) {}
        fn _catalog(_: &dyn CatalogReader) {}
        fn _admin(_: &dyn CatalogAdmin) {}
    }
}
