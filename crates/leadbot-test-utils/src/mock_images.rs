// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock image search adapter.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use leadbot_core::{AdapterType, HealthStatus, ImageSearch, LeadbotError, PluginAdapter};

/// Returns the same result for every phrase and records the queries.
pub struct MockImageSearch {
    result: Option<String>,
    fail: bool,
    queries: Arc<Mutex<Vec<String>>>,
}

impl MockImageSearch {
    /// Finds nothing.
    pub fn new() -> Self {
        Self {
            result: None,
            fail: false,
            queries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Always answers with `url`.
    pub fn with_result(url: &str) -> Self {
        Self {
            result: Some(url.to_string()),
            ..Self::new()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    /// Phrases searched so far, in order.
    pub async fn queries(&self) -> Vec<String> {
        self.queries.lock().await.clone()
    }
}

impl Default for MockImageSearch {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockImageSearch {
    fn name(&self) -> &str {
        "mock-images"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::ImageSearch
    }

    async fn health_check(&self) -> Result<HealthStatus, LeadbotError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), LeadbotError> {
        Ok(())
    }
}

#[async_trait]
impl ImageSearch for MockImageSearch {
    async fn search(&self, phrase: &str) -> Result<Option<String>, LeadbotError> {
        self.queries.lock().await.push(phrase.to_string());
        if self.fail {
            return Err(LeadbotError::ImageSearch {
                message: "mock image search unavailable".to_string(),
                source: None,
            });
        }
        Ok(self.result.clone())
    }
}
