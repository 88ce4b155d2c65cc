// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Natural-language date resolution.
//!
//! One completion call turns phrases like "mañana" or "el próximo martes"
//! into `YYYY-MM-DD`. The answer is never trusted as-is: it is scanned for
//! the first valid calendar date, and when none is found the user text is
//! parsed literally as `DD/MM/YYYY`.

use std::sync::{Arc, LazyLock};
use std::time::Duration;

use chrono::{Datelike, NaiveDate, Weekday};
use leadbot_core::{CompletionProvider, CompletionRequest};
use regex::Regex;
use tracing::{debug, warn};

static ISO_DATE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d{4}-\d{2}-\d{2}").unwrap());

static LITERAL_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{2})/(\d{2})/(\d{4})$").unwrap());

const DATE_MAX_TOKENS: u32 = 20;

/// How a date was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSource {
    Completion,
    LiteralFallback,
}

/// Outcome of resolving free-form date text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateResolution {
    Resolved { date: NaiveDate, source: DateSource },
    Failed,
}

pub struct DateResolver {
    provider: Arc<dyn CompletionProvider>,
    timeout: Duration,
}

impl DateResolver {
    pub fn new(provider: Arc<dyn CompletionProvider>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    /// Resolve `text` relative to `today`.
    ///
    /// Provider errors and timeouts count as "no date in the answer".
    pub async fn resolve(&self, text: &str, today: NaiveDate) -> DateResolution {
        let answer = self.ask(text, today).await;
        if let Some(date) = answer.as_deref().and_then(first_iso_date) {
            debug!(%date, "date resolved by completion");
            return DateResolution::Resolved {
                date,
                source: DateSource::Completion,
            };
        }

        match parse_literal_date(text) {
            Some(date) => {
                debug!(%date, "date resolved from literal DD/MM/YYYY");
                DateResolution::Resolved {
                    date,
                    source: DateSource::LiteralFallback,
                }
            }
            None => DateResolution::Failed,
        }
    }

    async fn ask(&self, text: &str, today: NaiveDate) -> Option<String> {
        let request = CompletionRequest {
            system: date_prompt(today),
            user: text.to_string(),
            max_tokens: DATE_MAX_TOKENS,
            temperature: 0.0,
        };
        match tokio::time::timeout(self.timeout, self.provider.complete(request)).await {
            Ok(Ok(response)) => Some(response.text),
            Ok(Err(e)) => {
                warn!(error = %e, "date resolution call failed");
                None
            }
            Err(_) => {
                warn!(timeout = ?self.timeout, "date resolution call timed out");
                None
            }
        }
    }
}

fn date_prompt(today: NaiveDate) -> String {
    format!(
        "Convierte la fecha que escribe el usuario a formato YYYY-MM-DD. \
         Hoy es {weekday} {today}. \
         Responde únicamente con la fecha en formato YYYY-MM-DD, o con ERROR si el texto \
         no describe una fecha.",
        weekday = weekday_es(today.weekday()),
        today = today.format("%Y-%m-%d"),
    )
}

fn weekday_es(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "lunes",
        Weekday::Tue => "martes",
        Weekday::Wed => "miércoles",
        Weekday::Thu => "jueves",
        Weekday::Fri => "viernes",
        Weekday::Sat => "sábado",
        Weekday::Sun => "domingo",
    }
}

/// First `YYYY-MM-DD` substring that is a real calendar date.
pub fn first_iso_date(answer: &str) -> Option<NaiveDate> {
    ISO_DATE
        .find_iter(answer)
        .find_map(|m| NaiveDate::parse_from_str(m.as_str(), "%Y-%m-%d").ok())
}

/// Strict `DD/MM/YYYY` parse of the trimmed text.
pub fn parse_literal_date(text: &str) -> Option<NaiveDate> {
    let caps = LITERAL_DATE.captures(text.trim())?;
    let day = caps[1].parse().ok()?;
    let month = caps[2].parse().ok()?;
    let year = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use leadbot_test_utils::MockProvider;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn resolver(provider: MockProvider) -> (Arc<MockProvider>, DateResolver) {
        let provider = Arc::new(provider);
        let resolver = DateResolver::new(provider.clone(), Duration::from_secs(1));
        (provider, resolver)
    }

    #[test]
    fn scans_for_first_valid_iso_date() {
        assert_eq!(first_iso_date("2025-06-02"), Some(date("2025-06-02")));
        assert_eq!(
            first_iso_date("La fecha es 2025-02-30 o mejor 2025-03-01."),
            Some(date("2025-03-01"))
        );
        assert_eq!(first_iso_date("ERROR"), None);
    }

    #[test]
    fn literal_fallback_is_strict() {
        assert_eq!(parse_literal_date(" 15/07/2025 "), Some(date("2025-07-15")));
        assert_eq!(parse_literal_date("31/02/2025"), None);
        assert_eq!(parse_literal_date("5/7/2025"), None);
        assert_eq!(parse_literal_date("15-07-2025"), None);
        assert_eq!(parse_literal_date("el 15/07/2025"), None);
    }

    #[test]
    fn prompt_names_reference_weekday() {
        let prompt = date_prompt(date("2025-06-01"));
        assert!(prompt.contains("domingo 2025-06-01"));
        assert!(prompt.contains("ERROR"));
    }

    #[tokio::test]
    async fn completion_answer_wins() {
        let (provider, resolver) = resolver(MockProvider::with_responses(vec!["2025-06-02".into()]));
        let outcome = resolver.resolve("mañana", date("2025-06-01")).await;
        assert_eq!(
            outcome,
            DateResolution::Resolved {
                date: date("2025-06-02"),
                source: DateSource::Completion,
            }
        );
        let sent = provider.requests().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].user, "mañana");
        assert!(sent[0].system.contains("2025-06-01"));
    }

    #[tokio::test]
    async fn error_answer_falls_back_to_literal() {
        let (_, resolver) = resolver(MockProvider::with_responses(vec!["ERROR".into()]));
        let outcome = resolver.resolve("15/07/2025", date("2025-06-01")).await;
        assert_eq!(
            outcome,
            DateResolution::Resolved {
                date: date("2025-07-15"),
                source: DateSource::LiteralFallback,
            }
        );
    }

    #[tokio::test]
    async fn provider_failure_falls_back_to_literal() {
        let (_, resolver) = resolver(MockProvider::failing());
        let outcome = resolver.resolve("02/06/2025", date("2025-06-01")).await;
        assert!(matches!(
            outcome,
            DateResolution::Resolved {
                source: DateSource::LiteralFallback,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn unresolvable_text_fails() {
        let (_, resolver) = resolver(MockProvider::with_responses(vec!["ERROR".into()]));
        let outcome = resolver.resolve("cuando puedas", date("2025-06-01")).await;
        assert_eq!(outcome, DateResolution::Failed);
    }
}
