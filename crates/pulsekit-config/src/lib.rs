// SPDX-FileCopyrightText: 2026 Pulsekit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Pulsekit feedback SDK.
//!
//! Hosts construct [`model::PulsekitConfig`] programmatically or load it
//! from `pulsekit.toml` + `PULSEKIT_*` environment variables via
//! [`loader::load_config`]. [`validation::validate_config`] surfaces
//! non-fatal warnings for suspicious values.

pub mod loader;
pub mod model;
pub mod validation;

pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::PulsekitConfig;
pub use validation::validate_config;
