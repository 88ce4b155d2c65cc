// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles an orchestrator over a temp SQLite database with
//! mock reasoning, image search and channel adapters, and a fixed clock.

use std::sync::Arc;

use chrono::NaiveDate;
use leadbot_agent::{AgentLoop, Collaborators, FixedClock, Orchestrator};
use leadbot_config::model::{LeadbotConfig, StorageConfig};
use leadbot_core::{
    CatalogAdmin, ConversationId, DialogueSession, InboundMessage, LeadbotError, Reply,
    SessionStore, StorageAdapter,
};
use leadbot_storage::SqliteStorage;

use crate::mock_channel::MockChannel;
use crate::mock_images::MockImageSearch;
use crate::mock_provider::MockProvider;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    responses: Vec<String>,
    services: Vec<String>,
    image_result: Option<String>,
    today: NaiveDate,
    config: LeadbotConfig,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            responses: Vec::new(),
            services: Vec::new(),
            image_result: None,
            today: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap_or_default(),
            config: LeadbotConfig::default(),
        }
    }

    /// Set mock provider responses.
    pub fn with_mock_responses(mut self, responses: Vec<String>) -> Self {
        self.responses = responses;
        self
    }

    /// Seed the catalog.
    pub fn with_services(mut self, names: &[&str]) -> Self {
        self.services = names.iter().map(|n| (*n).to_string()).collect();
        self
    }

    /// Make the image search answer with `url`.
    pub fn with_image_result(mut self, url: &str) -> Self {
        self.image_result = Some(url.to_string());
        self
    }

    /// Freeze the clock at noon on `today`.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn with_config(mut self, config: LeadbotConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the test harness, creating all required subsystems.
    pub async fn build(self) -> Result<TestHarness, LeadbotError> {
        let temp_dir =
            tempfile::TempDir::new().map_err(|e| LeadbotError::Storage { source: e.into() })?;
        let db_path = temp_dir.path().join("test.db");

        let storage = SqliteStorage::new(StorageConfig {
            database_path: db_path.to_string_lossy().to_string(),
            wal_mode: true,
        });
        storage.initialize().await?;
        storage.ensure_persona().await?;
        for name in &self.services {
            storage.add_service(name).await?;
        }
        let storage = Arc::new(storage);

        let mock_provider = Arc::new(MockProvider::with_responses(self.responses));
        let mock_images = Arc::new(match &self.image_result {
            Some(url) => MockImageSearch::with_result(url),
            None => MockImageSearch::new(),
        });
        let mock_channel = Arc::new(MockChannel::new());

        let deps = Collaborators {
            sessions: storage.clone(),
            leads: storage.clone(),
            catalog: storage.clone(),
            provider: mock_provider.clone(),
            images: Some(mock_images.clone()),
            clock: Arc::new(FixedClock::on(self.today)),
        };
        let orchestrator = Arc::new(Orchestrator::new(deps, &self.config));

        Ok(TestHarness {
            mock_provider,
            mock_images,
            mock_channel,
            storage,
            orchestrator,
            config: self.config,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete test environment with mock adapters and temp storage.
pub struct TestHarness {
    /// The mock reasoning service.
    pub mock_provider: Arc<MockProvider>,
    /// The mock image search.
    pub mock_images: Arc<MockImageSearch>,
    /// The mock channel adapter, used by [`TestHarness::agent_loop`].
    pub mock_channel: Arc<MockChannel>,
    /// SQLite storage (temp DB, cleaned up on drop).
    pub storage: Arc<SqliteStorage>,
    pub orchestrator: Arc<Orchestrator>,
    pub config: LeadbotConfig,
    /// Temp directory kept alive for cleanup on drop.
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Run one text turn for `conversation_id`.
    pub async fn send_message(&self, conversation_id: &str, text: &str) -> Vec<Reply> {
        self.orchestrator
            .handle(&InboundMessage::text(conversation_id, text))
            .await
    }

    /// Run one structured-action turn for `conversation_id`.
    pub async fn send_action(&self, conversation_id: &str, action: &str) -> Vec<Reply> {
        self.orchestrator
            .handle(&InboundMessage::action(conversation_id, action))
            .await
    }

    /// The stored session for `conversation_id`.
    pub async fn session(&self, conversation_id: &str) -> Result<DialogueSession, LeadbotError> {
        self.storage
            .load(&ConversationId::from(conversation_id))
            .await
    }

    /// An agent loop wired to the mock channel.
    pub fn agent_loop(&self) -> AgentLoop {
        AgentLoop::new(
            self.mock_channel.clone(),
            self.orchestrator.clone(),
            &self.config.agent,
        )
    }
}
