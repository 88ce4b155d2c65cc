// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock reasoning service for deterministic testing.
//!
//! `MockProvider` implements `CompletionProvider` with pre-configured
//! responses and records every request for assertions.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use leadbot_core::{
    AdapterType, CompletionProvider, CompletionRequest, CompletionResponse, HealthStatus,
    LeadbotError, PluginAdapter,
};

/// A mock provider that returns pre-configured responses.
///
/// Responses are popped from a FIFO queue. When the queue is empty,
/// a default "mock response" text is returned.
pub struct MockProvider {
    responses: Arc<Mutex<VecDeque<String>>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
    fail: bool,
}

impl MockProvider {
    /// Create a new mock provider with an empty response queue.
    pub fn new() -> Self {
        Self::with_responses(Vec::new())
    }

    /// Create a mock provider pre-loaded with the given responses.
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::from(responses))),
            requests: Arc::new(Mutex::new(Vec::new())),
            fail: false,
        }
    }

    /// A provider whose every call fails, as an unreachable service would.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    /// Add a response to the end of the queue.
    pub async fn add_response(&self, text: String) {
        self.responses.lock().await.push_back(text);
    }

    /// All requests received so far, in order.
    pub async fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().await.clone()
    }

    pub async fn request_count(&self) -> usize {
        self.requests.lock().await.len()
    }

    /// Pop the next response, or return the default.
    async fn next_response(&self) -> String {
        self.responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| "mock response".to_string())
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockProvider {
    fn name(&self) -> &str {
        "mock-provider"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, LeadbotError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), LeadbotError> {
        Ok(())
    }
}

#[async_trait]
impl CompletionProvider for MockProvider {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, LeadbotError> {
        self.requests.lock().await.push(request);
        if self.fail {
            return Err(LeadbotError::Provider {
                message: "mock provider unavailable".to_string(),
                source: None,
            });
        }
        Ok(CompletionResponse {
            text: self.next_response().await,
            model: "mock-model".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(user: &str) -> CompletionRequest {
        CompletionRequest {
            system: "system".to_string(),
            user: user.to_string(),
            max_tokens: 10,
            temperature: 0.0,
        }
    }

    #[tokio::test]
    async fn responses_are_returned_in_order_then_default() {
        let provider = MockProvider::with_responses(vec!["first".into(), "second".into()]);
        assert_eq!(provider.complete(request("a")).await.unwrap().text, "first");
        assert_eq!(provider.complete(request("b")).await.unwrap().text, "second");
        assert_eq!(
            provider.complete(request("c")).await.unwrap().text,
            "mock response"
        );
        assert_eq!(provider.request_count().await, 3);
        assert_eq!(provider.requests().await[1].user, "b");
    }

    #[tokio::test]
    async fn add_response_appends() {
        let provider = MockProvider::new();
        provider.add_response("later".into()).await;
        assert_eq!(provider.complete(request("a")).await.unwrap().text, "later");
    }

    #[tokio::test]
    async fn failing_provider_records_and_errors() {
        let provider = MockProvider::failing();
        let err = provider.complete(request("a")).await.unwrap_err();
        assert!(err.is_external());
        assert_eq!(provider.request_count().await, 1);
    }
}
