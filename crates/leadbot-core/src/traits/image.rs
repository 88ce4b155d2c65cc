// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Image search adapter trait.

use async_trait::async_trait;

use crate::error::LeadbotError;
use crate::traits::adapter::PluginAdapter;

/// Adapter that resolves a search phrase to a single image locator.
#[async_trait]
pub trait ImageSearch: PluginAdapter {
    /// Returns the URL of the best match, or `None` when nothing was found.
    async fn search(&self, phrase: &str) -> Result<Option<String>, LeadbotError>;
}
