// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Leadbot assistant.

use thiserror::Error;

/// The primary error type used across all Leadbot adapter traits and core operations.
///
/// Business-rule failures in the capture flow are not represented here; they are
/// ordinary values handled by the dialogue layer. This type covers the system side:
/// storage, transport, and the external services.
#[derive(Debug, Error)]
pub enum LeadbotError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Channel adapter errors (connection failure, message format, rate limiting).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Reasoning service errors (API failure, malformed response).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Image search service errors.
    #[error("image search error: {message}")]
    ImageSearch {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// A conditional session write lost a race against another writer.
    #[error("session for conversation {conversation_id} was modified concurrently")]
    SessionConflict { conversation_id: String },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl LeadbotError {
    /// Returns true for failures of the reasoning or image services, including timeouts.
    ///
    /// These are always recovered locally with fallback text.
    pub fn is_external(&self) -> bool {
        matches!(
            self,
            LeadbotError::Provider { .. }
                | LeadbotError::ImageSearch { .. }
                | LeadbotError::Timeout { .. }
        )
    }
}
