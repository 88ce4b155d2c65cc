// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Intent routing: keyword heuristics first, then an optional one-word label
//! from the reasoning service for messages the keywords left as general.

use std::sync::Arc;
use std::time::Duration;

use leadbot_config::model::RoutingConfig;
use leadbot_core::{CompletionProvider, CompletionRequest, Service};
use tracing::{debug, warn};

use crate::classifier::{Intent, IntentClassifier};
use crate::prompt::classifier_prompt;

/// Where a routing decision came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutingSource {
    Heuristic,
    Classifier,
}

/// The routed intent plus its provenance, for logging.
#[derive(Debug, Clone)]
pub struct RoutingDecision {
    pub intent: Intent,
    pub source: RoutingSource,
    pub reason: String,
}

impl RoutingDecision {
    /// Whether the reply should offer to start a service request.
    pub fn offers_request(&self) -> bool {
        self.intent == Intent::Scheduling
    }
}

const CLASSIFIER_MAX_TOKENS: u32 = 5;

/// Routes free-form messages to an [`Intent`].
pub struct IntentRouter {
    classifier: IntentClassifier,
    config: RoutingConfig,
    provider: Option<Arc<dyn CompletionProvider>>,
    timeout: Duration,
}

impl IntentRouter {
    /// Heuristics only, regardless of `config.llm_classifier`, until a
    /// provider is attached with [`IntentRouter::with_provider`].
    pub fn new(config: RoutingConfig) -> Self {
        Self {
            classifier: IntentClassifier::new(),
            config,
            provider: None,
            timeout: Duration::from_secs(10),
        }
    }

    /// Attach the reasoning service used for the fallback label.
    pub fn with_provider(mut self, provider: Arc<dyn CompletionProvider>, timeout: Duration) -> Self {
        self.provider = Some(provider);
        self.timeout = timeout;
        self
    }

    /// Route a message.
    ///
    /// `topic` is the persona topic, used to frame the classifier call.
    pub async fn route(&self, message: &str, services: &[Service], topic: &str) -> RoutingDecision {
        let heuristic = self.classifier.classify(message, services);
        if heuristic.intent != Intent::General || !self.config.llm_classifier {
            return RoutingDecision {
                intent: heuristic.intent,
                source: RoutingSource::Heuristic,
                reason: heuristic.reason.to_string(),
            };
        }

        let Some(provider) = self.provider.as_ref() else {
            return RoutingDecision {
                intent: Intent::General,
                source: RoutingSource::Heuristic,
                reason: "no classifier provider configured".to_string(),
            };
        };

        match self.ask_classifier(provider.as_ref(), message, topic).await {
            Some(intent) => {
                debug!(%intent, "classifier labelled message");
                RoutingDecision {
                    intent,
                    source: RoutingSource::Classifier,
                    reason: "reasoning-service label".to_string(),
                }
            }
            None => RoutingDecision {
                intent: Intent::General,
                source: RoutingSource::Heuristic,
                reason: "classifier unavailable, keeping general".to_string(),
            },
        }
    }

    async fn ask_classifier(
        &self,
        provider: &dyn CompletionProvider,
        message: &str,
        topic: &str,
    ) -> Option<Intent> {
        let request = CompletionRequest {
            system: classifier_prompt(topic),
            user: message.to_string(),
            max_tokens: CLASSIFIER_MAX_TOKENS,
            temperature: 0.0,
        };
        match tokio::time::timeout(self.timeout, provider.complete(request)).await {
            Ok(Ok(response)) => parse_label(&response.text),
            Ok(Err(e)) => {
                warn!(error = %e, "intent classifier call failed");
                None
            }
            Err(_) => {
                warn!(timeout = ?self.timeout, "intent classifier call timed out");
                None
            }
        }
    }
}

/// Maps a classifier answer to an intent. Unknown answers yield `None`.
pub fn parse_label(answer: &str) -> Option<Intent> {
    let label = answer
        .trim()
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_uppercase();
    match label.as_str() {
        "SALUDO" => Some(Intent::Greeting),
        "CITA" => Some(Intent::Scheduling),
        "IMAGEN" => Some(Intent::ImageRequest),
        "CONSULTA" => Some(Intent::General),
        _ => None,
    }
}
