// SPDX-FileCopyrightText: 2026 Pulsekit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Transport adapter trait and the typed outcome classification.

use async_trait::async_trait;
use thiserror::Error;

use crate::wire::{ApiErrorBody, ExperiencePayload, ExperienceResponse, FeedbackPayload};

/// Classified outcome of a single transport attempt.
///
/// Every variant means "queue the item and try again later" to the SDK core;
/// the distinction exists for logging and tests, not for control flow that
/// reaches the caller.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection-level failure before a status line was received.
    #[error("network error: {0}")]
    Network(String),

    /// The bounded request timeout elapsed.
    #[error("request timed out")]
    Timeout,

    /// The server answered with a non-2xx status. 401/422 carry a parsed
    /// structured body when the server provided one.
    #[error("server returned status {status}")]
    Api {
        status: u16,
        body: Option<ApiErrorBody>,
    },

    /// A 2xx response whose body could not be parsed.
    #[error("malformed response body: {0}")]
    Malformed(String),
}

/// Adapter executing one authenticated request against the feedback backend.
///
/// Implementations apply authorization, serialization, and a bounded
/// timeout. They make exactly one attempt per call; all retry scheduling
/// belongs to the SDK's retry coordinator.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// `POST {base}/experiences`; a success returns the parsed prompt
    /// decision payload.
    async fn send_experience(
        &self,
        payload: &ExperiencePayload,
    ) -> Result<ExperienceResponse, TransportError>;

    /// `POST {base}/feedback`; nothing beyond success/failure is needed.
    async fn send_feedback(&self, payload: &FeedbackPayload) -> Result<(), TransportError>;
}
