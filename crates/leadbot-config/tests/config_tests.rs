// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Leadbot configuration system.

use leadbot_config::diagnostic::ConfigError;
use leadbot_config::model::LeadbotConfig;
use leadbot_config::{load_and_validate_str, load_config_from_path, load_config_from_str};

#[test]
fn full_toml_deserializes_into_config() {
    let toml = r#"
[agent]
log_level = "debug"
max_concurrent_turns = 4

[telegram]
bot_token = "123:ABC"

[openai]
api_key = "sk-test"
model = "gpt-4o-mini"
max_tokens = 200
temperature = 0.5

[images]
enabled = false

[storage]
database_path = "/tmp/leads.db"
wal_mode = false

[routing]
llm_classifier = true

[office_hours]
enabled = true
open_hour = 8
close_hour = 18
weekdays_only = false
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.agent.log_level, "debug");
    assert_eq!(config.agent.max_concurrent_turns, 4);
    assert_eq!(config.telegram.bot_token.as_deref(), Some("123:ABC"));
    assert_eq!(config.openai.api_key.as_deref(), Some("sk-test"));
    assert_eq!(config.openai.model, "gpt-4o-mini");
    assert_eq!(config.openai.max_tokens, 200);
    assert!(!config.images.enabled);
    assert_eq!(config.storage.database_path, "/tmp/leads.db");
    assert!(!config.storage.wal_mode);
    assert!(config.routing.llm_classifier);
    assert!(config.office_hours.enabled);
    assert_eq!(config.office_hours.open_hour, 8);
    assert_eq!(config.office_hours.close_hour, 18);
    assert!(!config.office_hours.weekdays_only);
}

#[test]
fn missing_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");
    assert_eq!(config.agent.log_level, "info");
    assert_eq!(config.openai.model, "gpt-3.5-turbo");
    assert_eq!(config.openai.max_tokens, 300);
    assert!((config.openai.temperature - 0.3).abs() < f32::EPSILON);
    assert!(config.images.enabled);
    assert!(!config.routing.llm_classifier);
    assert!(!config.office_hours.enabled);
    assert_eq!(config.office_hours.open_hour, 6);
    assert_eq!(config.office_hours.close_hour, 21);
    assert!(config.telegram.bot_token.is_none());
}

#[test]
fn unknown_top_level_section_is_rejected() {
    let err = load_config_from_str("[webhooks]\nurl = \"x\"\n").expect_err("should reject");
    assert!(format!("{err}").contains("webhooks"));
}

#[test]
fn unknown_key_reports_suggestion_and_valid_keys() {
    let toml = r#"
[openai]
modle = "gpt-4o"
"#;

    let errors = load_and_validate_str(toml).expect_err("should produce errors");
    let found = errors.iter().any(|e| {
        matches!(e, ConfigError::UnknownKey { key, suggestion, valid_keys, .. } if {
            key == "modle"
                && suggestion.as_deref() == Some("model")
                && valid_keys.contains("max_tokens")
        })
    });
    assert!(found, "expected UnknownKey for `modle`, got: {errors:?}");
}

#[test]
fn invalid_type_is_reported() {
    let toml = r#"
[office_hours]
open_hour = "early"
"#;
    let errors = load_and_validate_str(toml).expect_err("should reject invalid type");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { .. } | ConfigError::Other(_))),
        "got: {errors:?}"
    );
}

#[test]
fn semantic_errors_surface_through_load_and_validate() {
    let toml = r#"
[office_hours]
open_hour = 22
close_hour = 21
"#;
    let errors = load_and_validate_str(toml).expect_err("inverted window should fail");
    assert!(errors
        .iter()
        .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("close_hour"))));
}

#[test]
fn unknown_key_help_renders_with_miette() {
    use miette::{Diagnostic, GraphicalReportHandler};

    let error = ConfigError::UnknownKey {
        key: "bot_tken".to_string(),
        suggestion: Some("bot_token".to_string()),
        valid_keys: "bot_token".to_string(),
        span: None,
        src: None,
    };
    assert!(error.code().is_some());
    let help = error.help().expect("help text").to_string();
    assert!(help.contains("did you mean `bot_token`"), "got: {help}");

    let mut buf = String::new();
    GraphicalReportHandler::new()
        .render_report(&mut buf, &error)
        .expect("should render");
    assert!(buf.contains("bot_tken"));
}

#[test]
fn env_vars_override_file_values() {
    figment::Jail::expect_with(|jail| {
        jail.create_file(
            "leadbot.toml",
            r#"
[openai]
model = "from-file"

[office_hours]
open_hour = 7
"#,
        )?;
        jail.set_env("LEADBOT_OPENAI_MODEL", "from-env");
        jail.set_env("LEADBOT_TELEGRAM_BOT_TOKEN", "42:XYZ");
        jail.set_env("LEADBOT_OFFICE_HOURS_CLOSE_HOUR", "19");

        let config: LeadbotConfig = load_config_from_path(std::path::Path::new("leadbot.toml"))?;
        assert_eq!(config.openai.model, "from-env");
        assert_eq!(config.telegram.bot_token.as_deref(), Some("42:XYZ"));
        assert_eq!(config.office_hours.open_hour, 7);
        assert_eq!(config.office_hours.close_hour, 19);
        Ok(())
    });
}

#[test]
fn missing_config_file_is_skipped() {
    figment::Jail::expect_with(|_jail| {
        let config = load_config_from_path(std::path::Path::new("/nonexistent/leadbot.toml"))?;
        assert_eq!(config.openai.model, "gpt-3.5-turbo");
        Ok(())
    });
}
