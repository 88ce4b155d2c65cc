// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Leadbot integration tests.
//!
//! Provides mock adapters and test harness infrastructure for fast,
//! deterministic, CI-runnable tests without external services.
//!
//! # Components
//!
//! - [`MemoryStore`] - In-memory session, lead and catalog store
//! - [`MockProvider`] - Mock reasoning service with pre-configured responses
//! - [`MockImageSearch`] - Mock image search with a fixed result
//! - [`MockChannel`] - Mock messaging channel with message injection and capture
//! - [`TestHarness`] - Orchestrator over a temp SQLite database

pub mod harness;
pub mod memory_store;
pub mod mock_channel;
pub mod mock_images;
pub mod mock_provider;

pub use harness::TestHarness;
pub use memory_store::MemoryStore;
pub use mock_channel::MockChannel;
pub use mock_images::MockImageSearch;
pub use mock_provider::MockProvider;
