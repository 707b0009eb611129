// SPDX-FileCopyrightText: 2026 Pulsekit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tracing subscriber setup for host apps that want the SDK's default
//! logging. Hosts with their own subscriber skip this entirely.

use tracing_subscriber::EnvFilter;

/// Initializes a global tracing subscriber filtered to the SDK's crates.
///
/// `RUST_LOG` wins when set. Calling this twice is harmless; the second
/// attempt fails quietly instead of panicking in release builds.
pub fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("pulsekit={log_level},warn")));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .try_init();
}
