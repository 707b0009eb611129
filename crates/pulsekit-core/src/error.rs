// SPDX-FileCopyrightText: 2026 Pulsekit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Pulsekit feedback SDK.

use thiserror::Error;

/// The primary error type used across Pulsekit adapter traits and core operations.
///
/// Only [`PulsekitError::Validation`] ever crosses the public SDK boundary;
/// every other variant is recovered internally by queuing the affected item
/// for retry or by logging and degrading to a no-op.
#[derive(Debug, Error)]
pub enum PulsekitError {
    /// Invalid caller input (feedback body over the length cap).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Configuration errors (blank API key, invalid TOML, bad header values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database open, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Transport errors surfaced internally (never to SDK callers).
    #[error("transport error: {message}")]
    Transport {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
