// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Web image search adapter for Leadbot.
//!
//! Implements [`ImageSearch`] against the Bing Image Search v7 API: one GET
//! per phrase, `count=1`, first result's `contentUrl`.

pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use leadbot_config::model::ImagesConfig;
use leadbot_core::{AdapterType, HealthStatus, ImageSearch, LeadbotError, PluginAdapter};
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::{debug, info};

use crate::types::{ApiErrorResponse, ImagesResponse};

const SUBSCRIPTION_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// Bing-backed image search.
///
/// API key resolution order: config -> `BING_SEARCH_KEY` env var -> error.
pub struct BingImageSearch {
    client: reqwest::Client,
    endpoint: String,
    safe_search: String,
}

impl BingImageSearch {
    pub fn new(config: &ImagesConfig) -> Result<Self, LeadbotError> {
        let api_key = resolve_api_key(&config.api_key)?;

        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(&api_key).map_err(|e| {
            LeadbotError::Config(format!("invalid image search key header value: {e}"))
        })?;
        headers.insert(SUBSCRIPTION_HEADER, key);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LeadbotError::ImageSearch {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        info!(endpoint = %config.endpoint, "image search initialized");

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            safe_search: config.safe_search.clone(),
        })
    }
}

#[async_trait]
impl PluginAdapter for BingImageSearch {
    fn name(&self) -> &str {
        "bing-images"
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
        debug!("image search shutting down");
        Ok(())
    }
}

#[async_trait]
impl ImageSearch for BingImageSearch {
    async fn search(&self, phrase: &str) -> Result<Option<String>, LeadbotError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("q", phrase),
                ("count", "1"),
                ("safeSearch", self.safe_search.as_str()),
            ])
            .send()
            .await
            .map_err(|e| LeadbotError::ImageSearch {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| LeadbotError::ImageSearch {
            message: format!("failed to read response body: {e}"),
            source: Some(Box::new(e)),
        })?;

        if !status.is_success() {
            let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
                Ok(api_err) => format!(
                    "image search error ({}): {}",
                    api_err.error.code.as_deref().unwrap_or("unknown"),
                    api_err.error.message
                ),
                Err(_) => format!("image search returned {status}: {body}"),
            };
            return Err(LeadbotError::ImageSearch {
                message,
                source: None,
            });
        }

        let parsed: ImagesResponse =
            serde_json::from_str(&body).map_err(|e| LeadbotError::ImageSearch {
                message: format!("failed to parse image search response: {e}"),
                source: Some(Box::new(e)),
            })?;

        let url = parsed
            .value
            .iter()
            .find_map(|r| r.best_url())
            .map(str::to_string);
        debug!(phrase, found = url.is_some(), "image search finished");
        Ok(url)
    }
}

fn resolve_api_key(config_key: &Option<String>) -> Result<String, LeadbotError> {
    if let Some(key) = config_key
        && !key.is_empty()
    {
        return Ok(key.clone());
    }

    std::env::var("BING_SEARCH_KEY").map_err(|_| {
        LeadbotError::Config(
            "image search key not found. Set images.api_key in config or BING_SEARCH_KEY environment variable.".into(),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn search_for(server: &MockServer) -> BingImageSearch {
        let config = ImagesConfig {
            api_key: Some("bing-test".into()),
            endpoint: format!("{}/v7.0/images/search", server.uri()),
            ..ImagesConfig::default()
        };
        BingImageSearch::new(&config).unwrap()
    }

    #[tokio::test]
    async fn returns_first_content_url() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v7.0/images/search"))
            .and(header(SUBSCRIPTION_HEADER, "bing-test"))
            .and(query_param("q", "perro golden retriever"))
            .and(query_param("count", "1"))
            .and(query_param("safeSearch", "Moderate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "value": [
                    {"contentUrl": "https://img.example/golden.jpg", "thumbnailUrl": "https://tse.example/t.jpg"}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let url = search_for(&server).search("perro golden retriever").await.unwrap();
        assert_eq!(url.as_deref(), Some("https://img.example/golden.jpg"));
    }

    #[tokio::test]
    async fn empty_result_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"value": []})))
            .mount(&server)
            .await;

        assert_eq!(search_for(&server).search("nada").await.unwrap(), None);
    }

    #[tokio::test]
    async fn thumbnail_used_when_content_url_missing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "value": [{"thumbnailUrl": "https://tse.example/t.jpg"}]
            })))
            .mount(&server)
            .await;

        assert_eq!(
            search_for(&server).search("gato").await.unwrap().as_deref(),
            Some("https://tse.example/t.jpg")
        );
    }

    #[tokio::test]
    async fn api_error_is_image_search_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "error": {"code": "401", "message": "Access denied due to invalid subscription key."}
            })))
            .mount(&server)
            .await;

        let err = search_for(&server).search("gato").await.unwrap_err();
        assert!(matches!(err, LeadbotError::ImageSearch { .. }));
        assert!(err.to_string().contains("invalid subscription key"));
    }

    #[test]
    fn resolve_api_key_prefers_config() {
        assert_eq!(resolve_api_key(&Some("k".into())).unwrap(), "k");
    }
}
