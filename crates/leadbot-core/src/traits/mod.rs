// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions.
//!
//! Adapters extend the [`PluginAdapter`] base trait and use `#[async_trait]`
//! for dynamic dispatch. Store traits are plain `Send + Sync` so one backend
//! can implement several of them.

pub mod adapter;
pub mod channel;
pub mod image;
pub mod provider;
pub mod storage;

pub use adapter::PluginAdapter;
pub use channel::ChannelAdapter;
pub use image::ImageSearch;
pub use provider::CompletionProvider;
pub use storage::{CatalogAdmin, CatalogReader, LeadStore, SessionStore, StorageAdapter};
