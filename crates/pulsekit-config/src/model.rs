// SPDX-FileCopyrightText: 2026 Pulsekit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Pulsekit feedback SDK.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level Pulsekit configuration.
///
/// Host apps either build this programmatically (see
/// [`PulsekitConfig::with_api_key`]) or load it from `pulsekit.toml` with
/// environment variable overrides. All sections default to sensible values;
/// only the API key is genuinely required for the SDK to do anything.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PulsekitConfig {
    /// Backend API settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Client identification attached to every submission.
    #[serde(default)]
    pub client: ClientConfig,

    /// Retry coordinator settings.
    #[serde(default)]
    pub retry: RetryConfig,

    /// Local persistence settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Logging settings.
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl PulsekitConfig {
    /// Shorthand for the common programmatic setup: defaults everywhere,
    /// plus the one value that has no default.
    pub fn with_api_key(key: impl Into<String>) -> PulsekitConfig {
        let mut config = PulsekitConfig::default();
        config.api.key = Some(key.into());
        config
    }
}

/// Backend API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    /// Bearer token authenticating this app with the feedback backend.
    /// A missing or blank key disables the SDK (logged, never thrown).
    #[serde(default)]
    pub key: Option<String>,

    /// Base URL; endpoints are `{base_url}/experiences` and
    /// `{base_url}/feedback`.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            key: None,
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.pulsekit.dev/v1".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

/// Client identification configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    /// Host-supplied user identifier. When absent, a previously persisted
    /// identifier is reused, or a fresh UUID is generated and persisted.
    #[serde(default)]
    pub user_id: Option<String>,

    /// Platform tag sent with every payload.
    #[serde(default = "default_source")]
    pub source: String,

    /// Host application build identifier sent with every payload.
    #[serde(default = "default_build_version")]
    pub build_version: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_id: None,
            source: default_source(),
            build_version: default_build_version(),
        }
    }
}

fn default_source() -> String {
    std::env::consts::OS.to_string()
}

fn default_build_version() -> String {
    "unknown".to_string()
}

/// Retry coordinator configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RetryConfig {
    /// Seconds between retry passes while connected.
    #[serde(default = "default_retry_interval_secs")]
    pub interval_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_retry_interval_secs(),
        }
    }
}

fn default_retry_interval_secs() -> u64 {
    180
}

/// Local persistence configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// SQLite database path. `None` resolves to
    /// `{platform data dir}/pulsekit/pulsekit.db`.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TelemetryConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_complete() {
        let config = PulsekitConfig::default();
        assert!(config.api.key.is_none());
        assert_eq!(config.api.base_url, "https://api.pulsekit.dev/v1");
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.retry.interval_secs, 180);
        assert_eq!(config.client.build_version, "unknown");
        assert!(config.storage.path.is_none());
    }

    #[test]
    fn with_api_key_sets_only_the_key() {
        let config = PulsekitConfig::with_api_key("pk_live_123");
        assert_eq!(config.api.key.as_deref(), Some("pk_live_123"));
        assert_eq!(config.api.base_url, PulsekitConfig::default().api.base_url);
    }
}
