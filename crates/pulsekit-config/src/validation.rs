// SPDX-FileCopyrightText: 2026 Pulsekit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes. Findings are warnings, not hard failures: the SDK must never
//! prevent a host app from starting, so suspicious values are logged and
//! clamped or ignored downstream.

use crate::model::PulsekitConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns all findings (does not fail fast). An empty vec means the
/// configuration is clean. The blank-API-key case is intentionally absent
/// here; the facade handles it with its own disable-and-log path.
pub fn validate_config(config: &PulsekitConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.api.base_url.trim().is_empty() {
        warnings.push("api.base_url must not be empty".to_string());
    } else if !config.api.base_url.starts_with("http://")
        && !config.api.base_url.starts_with("https://")
    {
        warnings.push(format!(
            "api.base_url `{}` is not an http(s) URL",
            config.api.base_url
        ));
    }

    if config.api.base_url.ends_with('/') {
        warnings.push("api.base_url should not end with a trailing slash".to_string());
    }

    if config.api.timeout_secs == 0 {
        warnings.push("api.timeout_secs must be greater than 0".to_string());
    }

    if config.retry.interval_secs == 0 {
        warnings.push("retry.interval_secs must be greater than 0".to_string());
    }

    if let Some(user_id) = &config.client.user_id
        && user_id.trim().is_empty()
    {
        warnings.push("client.user_id is set but blank; it will be ignored".to_string());
    }

    warnings
}
