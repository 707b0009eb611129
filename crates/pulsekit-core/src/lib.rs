// SPDX-FileCopyrightText: 2026 Pulsekit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Pulsekit feedback SDK.
//!
//! This crate provides the foundational trait definitions, error types, and
//! common types used throughout the Pulsekit workspace. The storage and
//! transport adapters implement traits defined here.

pub mod error;
pub mod traits;
pub mod types;
pub mod wire;

// Re-export key items at crate root for ergonomic imports.
pub use error::PulsekitError;
pub use types::{
    Experience, FeedbackUiStrings, FlowType, PersistedState, QueuedFeedback, Rating,
    MAX_FEEDBACK_CHARS,
};

// Re-export the adapter traits at crate root.
pub use traits::{StateStore, Transport, TransportError};
