// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks semantic constraints serde cannot express: non-empty paths, sane
//! sampling parameters, and a well-formed office-hours window.

use crate::diagnostic::ConfigError;
use crate::model::LeadbotConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every violation instead of stopping at the first one.
pub fn validate_config(config: &LeadbotConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut invalid = |message: String| errors.push(ConfigError::Validation { message });

    if !LOG_LEVELS.contains(&config.agent.log_level.as_str()) {
        invalid(format!(
            "agent.log_level `{}` must be one of {}",
            config.agent.log_level,
            LOG_LEVELS.join(", ")
        ));
    }

    if config.agent.max_concurrent_turns == 0 {
        invalid("agent.max_concurrent_turns must be at least 1".to_string());
    }

    if config.storage.database_path.trim().is_empty() {
        invalid("storage.database_path must not be empty".to_string());
    }

    let openai = &config.openai;
    if openai.base_url.trim().is_empty() {
        invalid("openai.base_url must not be empty".to_string());
    }
    if openai.model.trim().is_empty() {
        invalid("openai.model must not be empty".to_string());
    }
    if openai.max_tokens == 0 {
        invalid("openai.max_tokens must be at least 1".to_string());
    }
    if !(0.0..=2.0).contains(&openai.temperature) {
        invalid(format!(
            "openai.temperature must be between 0.0 and 2.0, got {}",
            openai.temperature
        ));
    }
    if openai.timeout_secs == 0 {
        invalid("openai.timeout_secs must be at least 1".to_string());
    }

    if config.images.enabled && config.images.endpoint.trim().is_empty() {
        invalid("images.endpoint must not be empty when images are enabled".to_string());
    }
    if config.images.timeout_secs == 0 {
        invalid("images.timeout_secs must be at least 1".to_string());
    }

    let hours = &config.office_hours;
    if hours.open_hour > 23 {
        invalid(format!(
            "office_hours.open_hour must be 0-23, got {}",
            hours.open_hour
        ));
    }
    if hours.close_hour > 24 || hours.close_hour <= hours.open_hour {
        invalid(format!(
            "office_hours.close_hour must be after open_hour and at most 24, got {}",
            hours.close_hour
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_error(errors: &[ConfigError], needle: &str) -> bool {
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains(needle)))
    }

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&LeadbotConfig::default()).is_ok());
    }

    #[test]
    fn empty_database_path_fails_validation() {
        let mut config = LeadbotConfig::default();
        config.storage.database_path = "  ".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "database_path"));
    }

    #[test]
    fn out_of_range_temperature_fails_validation() {
        let mut config = LeadbotConfig::default();
        config.openai.temperature = 3.5;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "temperature"));
    }

    #[test]
    fn inverted_office_hours_fail_validation() {
        let mut config = LeadbotConfig::default();
        config.office_hours.open_hour = 20;
        config.office_hours.close_hour = 8;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "close_hour"));
    }

    #[test]
    fn unknown_log_level_fails_validation() {
        let mut config = LeadbotConfig::default();
        config.agent.log_level = "verbose".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "log_level"));
    }

    #[test]
    fn collects_every_violation() {
        let mut config = LeadbotConfig::default();
        config.agent.max_concurrent_turns = 0;
        config.openai.max_tokens = 0;
        config.images.timeout_secs = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn unknown_section_key_is_rejected_by_serde() {
        let toml_str = r#"
[routing]
llm_classifer = true
"#;
        assert!(toml::from_str::<LeadbotConfig>(toml_str).is_err());
    }
}
