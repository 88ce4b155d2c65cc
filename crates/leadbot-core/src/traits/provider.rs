// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider adapter trait for the external reasoning service.

use async_trait::async_trait;

use crate::error::LeadbotError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{CompletionRequest, CompletionResponse};

/// Adapter for a language-model completion service.
///
/// Callers treat every error as recoverable; implementations should not
/// retry indefinitely since callers already bound each call with a timeout.
#[async_trait]
pub trait CompletionProvider: PluginAdapter {
    /// Sends a single-turn completion request and returns the full response.
    async fn complete(&self, request: CompletionRequest)
        -> Result<CompletionResponse, LeadbotError>;
}
