// SPDX-FileCopyrightText: 2026 Pulsekit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports `./pulsekit.toml` and `~/.config/pulsekit/pulsekit.toml` with
//! environment variable overrides via the `PULSEKIT_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::PulsekitConfig;

/// Load configuration from the standard file hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `~/.config/pulsekit/pulsekit.toml` (user config)
/// 3. `./pulsekit.toml` (local directory)
/// 4. `PULSEKIT_*` environment variables
pub fn load_config() -> Result<PulsekitConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PulsekitConfig::default()))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("pulsekit/pulsekit.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("pulsekit.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from an inline TOML string only (no file lookup).
///
/// Used for testing and for hosts that embed their config inline.
pub fn load_config_from_str(toml_content: &str) -> Result<PulsekitConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PulsekitConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<PulsekitConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PulsekitConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names. For example, `PULSEKIT_CLIENT_BUILD_VERSION`
/// must map to `client.build_version`, not `client.build.version`.
fn env_provider() -> Env {
    Env::prefixed("PULSEKIT_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: PULSEKIT_API_BASE_URL -> "api_base_url"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("api_", "api.", 1)
            .replacen("client_", "client.", 1)
            .replacen("retry_", "retry.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("telemetry_", "telemetry.", 1);
        mapped.into()
    })
}
