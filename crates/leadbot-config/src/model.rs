// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Leadbot assistant.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Leadbot configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LeadbotConfig {
    /// Agent loop and logging settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Telegram bot integration settings.
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Reasoning service settings.
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// Image search settings.
    #[serde(default)]
    pub images: ImagesConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Intent routing settings.
    #[serde(default)]
    pub routing: RoutingConfig,

    /// Office hours gate for free-form messages.
    #[serde(default)]
    pub office_hours: OfficeHoursConfig,
}

/// Agent loop configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Maximum number of inbound messages processed at the same time.
    #[serde(default = "default_max_concurrent_turns")]
    pub max_concurrent_turns: usize,

    /// Seconds to wait for in-flight turns during shutdown.
    #[serde(default = "default_shutdown_timeout_secs")]
    pub shutdown_timeout_secs: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            max_concurrent_turns: default_max_concurrent_turns(),
            shutdown_timeout_secs: default_shutdown_timeout_secs(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_concurrent_turns() -> usize {
    32
}

fn default_shutdown_timeout_secs() -> u64 {
    30
}

/// Telegram bot integration configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TelegramConfig {
    /// Telegram Bot API token. `None` disables Telegram integration.
    #[serde(default)]
    pub bot_token: Option<String>,
}

/// OpenAI-compatible chat completion settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OpenAiConfig {
    /// API key. `None` requires the environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL of the API (without the `/chat/completions` suffix).
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,

    /// Model used for every completion.
    #[serde(default = "default_openai_model")]
    pub model: String,

    /// Maximum tokens to generate per response.
    #[serde(default = "default_openai_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature.
    #[serde(default = "default_openai_temperature")]
    pub temperature: f32,

    /// Upper bound for a single completion call, in seconds.
    #[serde(default = "default_openai_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_openai_base_url(),
            model: default_openai_model(),
            max_tokens: default_openai_max_tokens(),
            temperature: default_openai_temperature(),
            timeout_secs: default_openai_timeout_secs(),
        }
    }
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_openai_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_openai_max_tokens() -> u32 {
    300
}

fn default_openai_temperature() -> f32 {
    0.3
}

fn default_openai_timeout_secs() -> u64 {
    20
}

/// Image search settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ImagesConfig {
    /// Whether image requests are served at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Subscription key for the image search API.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Search endpoint URL.
    #[serde(default = "default_images_endpoint")]
    pub endpoint: String,

    /// Safe-search level passed to the API.
    #[serde(default = "default_safe_search")]
    pub safe_search: String,

    /// Upper bound for a single search, in seconds.
    #[serde(default = "default_images_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: None,
            endpoint: default_images_endpoint(),
            safe_search: default_safe_search(),
            timeout_secs: default_images_timeout_secs(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_images_endpoint() -> String {
    "https://api.bing.microsoft.com/v7.0/images/search".to_string()
}

fn default_safe_search() -> String {
    "Moderate".to_string()
}

fn default_images_timeout_secs() -> u64 {
    10
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_true")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: true,
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("leadbot").join("leadbot.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("leadbot.db"))
        .display()
        .to_string()
}

/// Intent routing configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RoutingConfig {
    /// Ask the reasoning service to label messages the keyword heuristics
    /// could not place.
    #[serde(default)]
    pub llm_classifier: bool,
}

/// Office hours configuration. Outside the window, free-form messages are
/// recorded and answered with a closed notice.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OfficeHoursConfig {
    #[serde(default)]
    pub enabled: bool,

    /// First open hour (local time, 0-23).
    #[serde(default = "default_open_hour")]
    pub open_hour: u32,

    /// Hour the office closes (exclusive, 1-24).
    #[serde(default = "default_close_hour")]
    pub close_hour: u32,

    /// Treat Saturday and Sunday as closed.
    #[serde(default = "default_true")]
    pub weekdays_only: bool,

    /// Text sent when closed.
    #[serde(default = "default_closed_message")]
    pub closed_message: String,
}

impl Default for OfficeHoursConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            open_hour: default_open_hour(),
            close_hour: default_close_hour(),
            weekdays_only: true,
            closed_message: default_closed_message(),
        }
    }
}

fn default_open_hour() -> u32 {
    6
}

fn default_close_hour() -> u32 {
    21
}

fn default_closed_message() -> String {
    "Nuestro horario es de Lun-Vie 6am-9pm. Te contactaremos mañana.".to_string()
}
