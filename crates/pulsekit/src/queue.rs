// SPDX-FileCopyrightText: 2026 Pulsekit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The durable queues of unsent experiences and unsent feedback.
//!
//! Append order is delivery order within each queue. Enqueue persists the
//! whole blob before returning, so a process death immediately after a
//! successful `log()` call cannot lose the event. Items leave a queue only
//! via confirmed delivery (set-difference by value at the end of a retry
//! pass) or an explicit SDK reset — there is no expiry and no max-retry
//! cutoff.

use std::sync::Arc;

use pulsekit_core::{Experience, QueuedFeedback};
use tracing::debug;

use crate::state::SharedState;

/// Handle to the two persisted queues. Cheap to clone.
#[derive(Clone)]
pub struct QueueManager {
    state: Arc<SharedState>,
}

impl QueueManager {
    pub fn new(state: Arc<SharedState>) -> QueueManager {
        QueueManager { state }
    }

    /// Appends and persists before returning.
    pub async fn enqueue_experience(&self, experience: Experience) {
        let depth = self
            .state
            .update(|state| {
                state.unsent_experiences.push(experience);
                state.unsent_experiences.len()
            })
            .await;
        debug!(depth, "experience queued");
    }

    /// Appends and persists before returning.
    pub async fn enqueue_feedback(&self, feedback: QueuedFeedback) {
        let depth = self
            .state
            .update(|state| {
                state.unsent_feedback.push(feedback);
                state.unsent_feedback.len()
            })
            .await;
        debug!(depth, "feedback queued");
    }

    /// The current queue contents, re-read from the shared snapshot (never
    /// a cached copy) so items appended since the last retry pass are seen.
    pub async fn snapshot(&self) -> (Vec<Experience>, Vec<QueuedFeedback>) {
        let state = self.state.snapshot().await;
        (state.unsent_experiences, state.unsent_feedback)
    }

    /// Removes exactly the items confirmed delivered during a retry pass,
    /// as one batch update. Matching is by value; failed items keep their
    /// position for the next pass.
    pub async fn remove_delivered(
        &self,
        experiences: &[Experience],
        feedback: &[QueuedFeedback],
    ) {
        if experiences.is_empty() && feedback.is_empty() {
            return;
        }
        self.state
            .update(|state| {
                state
                    .unsent_experiences
                    .retain(|item| !experiences.contains(item));
                state.unsent_feedback.retain(|item| !feedback.contains(item));
            })
            .await;
        debug!(
            experiences = experiences.len(),
            feedback = feedback.len(),
            "delivered items removed from queue"
        );
    }

    /// Current depths of (experiences, feedback). Host-facing diagnostics.
    pub async fn depths(&self) -> (usize, usize) {
        let state = self.state.snapshot().await;
        (state.unsent_experiences.len(), state.unsent_feedback.len())
    }
}
