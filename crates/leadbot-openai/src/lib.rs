// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI-compatible reasoning service adapter for Leadbot.
//!
//! This crate implements [`CompletionProvider`] over the Chat Completions
//! API. Every request is a single system + user exchange; no history is kept.

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use leadbot_config::model::OpenAiConfig;
use leadbot_core::{
    AdapterType, CompletionProvider, CompletionRequest, CompletionResponse, HealthStatus,
    LeadbotError, PluginAdapter,
};
use tracing::{debug, info};

use crate::client::OpenAiClient;
use crate::types::{ChatMessage, ChatRequest};

/// Chat Completions provider implementing [`CompletionProvider`].
///
/// API key resolution order: config -> `OPENAI_API_KEY` env var -> error.
pub struct OpenAiProvider {
    client: OpenAiClient,
    model: String,
}

impl OpenAiProvider {
    pub fn new(config: &OpenAiConfig) -> Result<Self, LeadbotError> {
        let api_key = resolve_api_key(&config.api_key)?;
        let client = OpenAiClient::new(
            &api_key,
            &config.base_url,
            Duration::from_secs(config.timeout_secs),
        )?;

        info!(model = %config.model, base_url = %config.base_url, "OpenAI provider initialized");

        Ok(Self {
            client,
            model: config.model.clone(),
        })
    }

    fn to_chat_request(&self, request: CompletionRequest) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(request.system),
                ChatMessage::user(request.user),
            ],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        }
    }
}

#[async_trait]
impl PluginAdapter for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
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
        debug!("OpenAI provider shutting down");
        Ok(())
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, LeadbotError> {
        let chat = self.to_chat_request(request);
        let response = self.client.chat(&chat).await?;

        let text = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| LeadbotError::Provider {
                message: "completion returned no choices".into(),
                source: None,
            })?;

        let model = if response.model.is_empty() {
            self.model.clone()
        } else {
            response.model
        };
        Ok(CompletionResponse { text, model })
    }
}

/// Resolves the API key from config or environment.
fn resolve_api_key(config_key: &Option<String>) -> Result<String, LeadbotError> {
    if let Some(key) = config_key
        && !key.is_empty()
    {
        return Ok(key.clone());
    }

    std::env::var("OPENAI_API_KEY").map_err(|_| {
        LeadbotError::Config(
            "OpenAI API key not found. Set openai.api_key in config or OPENAI_API_KEY environment variable.".into(),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider_for(server: &MockServer) -> OpenAiProvider {
        let config = OpenAiConfig {
            api_key: Some("sk-test".into()),
            base_url: server.uri(),
            ..OpenAiConfig::default()
        };
        OpenAiProvider::new(&config).unwrap()
    }

    fn request() -> CompletionRequest {
        CompletionRequest {
            system: "Eres un asistente.".into(),
            user: "¿Qué servicios tienen?".into(),
            max_tokens: 300,
            temperature: 0.3,
        }
    }

    #[test]
    fn resolve_api_key_from_config() {
        assert_eq!(resolve_api_key(&Some("sk-abc".into())).unwrap(), "sk-abc");
    }

    #[test]
    fn resolve_api_key_none_falls_back_to_env() {
        let result = resolve_api_key(&None);
        if let Err(e) = result {
            assert!(e.to_string().contains("API key not found"), "got: {e}");
        }
    }

    #[test]
    fn request_uses_configured_model_and_two_messages() {
        let config = OpenAiConfig {
            api_key: Some("sk-test".into()),
            model: "gpt-4o-mini".into(),
            ..OpenAiConfig::default()
        };
        let provider = OpenAiProvider::new(&config).unwrap();
        let chat = provider.to_chat_request(request());
        assert_eq!(chat.model, "gpt-4o-mini");
        assert_eq!(chat.messages.len(), 2);
        assert_eq!(chat.messages[0].role, "system");
        assert_eq!(chat.messages[1], ChatMessage::user("¿Qué servicios tienen?"));
    }

    #[tokio::test]
    async fn complete_returns_first_choice_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(serde_json::json!({"temperature": 0.3})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "model": "gpt-3.5-turbo-0125",
                "choices": [{"message": {"role": "assistant", "content": "Tenemos Grooming."}}]
            })))
            .mount(&server)
            .await;

        let response = provider_for(&server).complete(request()).await.unwrap();
        assert_eq!(response.text, "Tenemos Grooming.");
        assert_eq!(response.model, "gpt-3.5-turbo-0125");
    }

    #[tokio::test]
    async fn empty_choices_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})),
            )
            .mount(&server)
            .await;

        let err = provider_for(&server).complete(request()).await.unwrap_err();
        assert!(err.is_external());
    }

    #[tokio::test]
    async fn adapter_identity() {
        let server = MockServer::start().await;
        let provider = provider_for(&server);
        assert_eq!(provider.name(), "openai");
        assert_eq!(provider.adapter_type(), AdapterType::Provider);
        assert_eq!(provider.health_check().await.unwrap(), HealthStatus::Healthy);
    }
}
