// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Keyword intent classification.
//!
//! Sorts a free-form message into greeting, scheduling, image request or
//! general query. No network, no latency; the first matching rule wins.

use leadbot_core::Service;
use strum::Display;

use crate::images::has_visual_request;

/// What a free-form message is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Intent {
    /// Salutation or a bare command: answered from the persona, never the model.
    Greeting,
    /// Interest in booking, prices or a catalog service.
    Scheduling,
    /// The user asked to see something.
    ImageRequest,
    /// Anything else on topic.
    General,
}

/// Result of classifying a message.
#[derive(Debug, Clone)]
pub struct ClassificationResult {
    pub intent: Intent,
    /// Human-readable reason for the classification.
    pub reason: &'static str,
}

/// Prefixes that mark a greeting (lowercase, after trimming).
const GREETING_PREFIXES: &[&str] = &[
    "hola", "buen", "buenas", "buenos", "saludos", "que tal", "qué tal", "hi", "hello",
];

/// Substrings that signal booking interest.
const SCHEDULING_KEYWORDS: &[&str] = &[
    "cita", "turno", "agendar", "quiero", "necesito", "precio", "costo", "solicitar",
    "reserva", "servicio", "haces", "ofrecen",
];

/// Leading character of chat commands.
const COMMAND_MARKER: char = '/';

/// Heuristic intent classifier.
#[derive(Debug, Default)]
pub struct IntentClassifier;

impl IntentClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify `message` against the keyword rules and the catalog names.
    pub fn classify(&self, message: &str, services: &[Service]) -> ClassificationResult {
        let trimmed = message.trim();
        let lower = trimmed.to_lowercase();

        if trimmed.starts_with(COMMAND_MARKER) {
            return ClassificationResult {
                intent: Intent::Greeting,
                reason: "command",
            };
        }

        if GREETING_PREFIXES.iter().any(|g| lower.starts_with(g)) {
            return ClassificationResult {
                intent: Intent::Greeting,
                reason: "greeting keyword",
            };
        }

        if SCHEDULING_KEYWORDS.iter().any(|k| lower.contains(k)) {
            return ClassificationResult {
                intent: Intent::Scheduling,
                reason: "scheduling keyword",
            };
        }

        if mentions_service(&lower, services) {
            return ClassificationResult {
                intent: Intent::Scheduling,
                reason: "mentions catalog service",
            };
        }

        if has_visual_request(trimmed) {
            return ClassificationResult {
                intent: Intent::ImageRequest,
                reason: "visual request keyword",
            };
        }

        ClassificationResult {
            intent: Intent::General,
            reason: "no keyword matched",
        }
    }
}

fn mentions_service(lower: &str, services: &[Service]) -> bool {
    services.iter().any(|s| {
        let name = s.name.trim().to_lowercase();
        !name.is_empty() && lower.contains(&name)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<Service> {
        vec![
            Service {
                id: 1,
                name: "Grooming".into(),
            },
            Service {
                id: 2,
                name: "Baño completo".into(),
            },
        ]
    }

    fn intent(text: &str) -> Intent {
        IntentClassifier::new().classify(text, &catalog()).intent
    }

    #[test]
    fn greetings_match_by_prefix() {
        assert_eq!(intent("hola"), Intent::Greeting);
        assert_eq!(intent("  Buenas tardes"), Intent::Greeting);
        assert_eq!(intent("Qué tal?"), Intent::Greeting);
        assert_eq!(intent("hello there"), Intent::Greeting);
    }

    #[test]
    fn commands_are_greetings() {
        assert_eq!(intent("/start"), Intent::Greeting);
        assert_eq!(intent("/ayuda"), Intent::Greeting);
    }

    #[test]
    fn greeting_wins_over_scheduling() {
        assert_eq!(intent("hola, quiero una cita"), Intent::Greeting);
    }

    #[test]
    fn scheduling_keywords_anywhere() {
        assert_eq!(intent("me gustaría agendar algo"), Intent::Scheduling);
        assert_eq!(intent("¿cuál es el PRECIO?"), Intent::Scheduling);
        assert_eq!(intent("qué servicios ofrecen"), Intent::Scheduling);
    }

    #[test]
    fn catalog_names_count_as_scheduling() {
        assert_eq!(intent("cuánto dura el grooming"), Intent::Scheduling);
        assert_eq!(intent("el baño completo incluye secado?"), Intent::Scheduling);
    }

    #[test]
    fn visual_keywords_are_image_requests() {
        assert_eq!(intent("me enseñas una foto de un caniche"), Intent::ImageRequest);
        assert_eq!(intent("show me a poodle"), Intent::ImageRequest);
    }

    #[test]
    fn everything_else_is_general() {
        assert_eq!(intent("¿cada cuánto se corta el pelo a un caniche?"), Intent::General);
        assert_eq!(intent(""), Intent::General);
    }

    #[test]
    fn intent_display() {
        assert_eq!(Intent::ImageRequest.to_string(), "image_request");
        assert_eq!(Intent::Greeting.to_string(), "greeting");
    }
}
