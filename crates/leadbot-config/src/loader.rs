// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./leadbot.toml` > `~/.config/leadbot/leadbot.toml` > `/etc/leadbot/leadbot.toml`
//! with environment variable overrides via `LEADBOT_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::LeadbotConfig;

/// Config sections addressable from `LEADBOT_<SECTION>_<KEY>` variables.
///
/// Longer names come first so `office_hours_` wins over any shorter prefix.
const ENV_SECTIONS: &[&str] = &[
    "office_hours",
    "telegram",
    "routing",
    "storage",
    "images",
    "openai",
    "agent",
];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/leadbot/leadbot.toml` (system-wide)
/// 3. `~/.config/leadbot/leadbot.toml` (user XDG config)
/// 4. `./leadbot.toml` (local directory)
/// 5. `LEADBOT_*` environment variables
pub fn load_config() -> Result<LeadbotConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<LeadbotConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(LeadbotConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<LeadbotConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(LeadbotConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(LeadbotConfig::default()))
        .merge(Toml::file("/etc/leadbot/leadbot.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("leadbot/leadbot.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("leadbot.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider with explicit section mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `LEADBOT_OPENAI_API_KEY` must map to `openai.api_key`, and
/// `LEADBOT_OFFICE_HOURS_OPEN_HOUR` to `office_hours.open_hour`.
fn env_provider() -> Env {
    Env::prefixed("LEADBOT_").map(|key| env_key_to_path(key.as_str()).into())
}

/// Map a lowercased, prefix-stripped env var name to a dotted config path.
pub(crate) fn env_key_to_path(key: &str) -> String {
    for section in ENV_SECTIONS {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|rest| rest.strip_prefix('_'))
        {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_map_to_sections() {
        assert_eq!(env_key_to_path("openai_api_key"), "openai.api_key");
        assert_eq!(env_key_to_path("telegram_bot_token"), "telegram.bot_token");
        assert_eq!(
            env_key_to_path("office_hours_open_hour"),
            "office_hours.open_hour"
        );
        assert_eq!(
            env_key_to_path("storage_database_path"),
            "storage.database_path"
        );
    }

    #[test]
    fn unknown_env_keys_pass_through() {
        assert_eq!(env_key_to_path("whatever"), "whatever");
    }
}
