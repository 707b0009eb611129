// SPDX-FileCopyrightText: 2026 Pulsekit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The event submitter: one attempt now, or into the queue.
//!
//! Sits between the public logging API and the transport. Offline (or
//! forced offline) means queue without touching the network; a transport
//! failure of any kind also means queue. Either way the operation succeeds
//! from the caller's point of view — delivery is best-effort and
//! asynchronous by contract.

use std::sync::Arc;

use chrono::Utc;
use pulsekit_core::wire::{ClientInfo, ExperiencePayload, FeedbackPayload};
use pulsekit_core::{Experience, QueuedFeedback, Transport, TransportError};
use tracing::{debug, warn};

use crate::connectivity::ConnectivityState;
use crate::prompt;
use crate::queue::QueueManager;
use crate::state::SharedState;

pub struct Submitter {
    transport: Arc<dyn Transport>,
    queue: QueueManager,
    state: Arc<SharedState>,
    connectivity: Arc<ConnectivityState>,
    client: ClientInfo,
}

impl Submitter {
    pub fn new(
        transport: Arc<dyn Transport>,
        queue: QueueManager,
        state: Arc<SharedState>,
        connectivity: Arc<ConnectivityState>,
        client: ClientInfo,
    ) -> Submitter {
        Submitter {
            transport,
            queue,
            state,
            connectivity,
            client,
        }
    }

    /// Live submission of a freshly-logged experience. Never fails.
    pub async fn submit_experience(&self, experience: Experience) {
        if !self.connectivity.is_effectively_online() {
            debug!("offline, queuing experience without a transport attempt");
            self.queue.enqueue_experience(experience).await;
            return;
        }
        if let Err(e) = self.try_send_experience(&experience).await {
            warn!(error = %e, "experience submission failed, queuing for retry");
            self.queue.enqueue_experience(experience).await;
        }
    }

    /// Live submission of validated feedback. Never fails.
    pub async fn submit_feedback(&self, feedback: QueuedFeedback) {
        if !self.connectivity.is_effectively_online() {
            debug!("offline, queuing feedback without a transport attempt");
            self.queue.enqueue_feedback(feedback).await;
            return;
        }
        if let Err(e) = self.try_send_feedback(&feedback).await {
            warn!(error = %e, "feedback submission failed, queuing for retry");
            self.queue.enqueue_feedback(feedback).await;
        }
    }

    /// One bare transport attempt, with the response applied to the prompt
    /// state machine on success. No enqueue on failure — the retry
    /// coordinator calls this for items that are already queued.
    pub async fn try_send_experience(
        &self,
        experience: &Experience,
    ) -> Result<(), TransportError> {
        let payload = ExperiencePayload::from_experience(experience, &self.client);
        let response = self.transport.send_experience(&payload).await?;
        let now_ms = Utc::now().timestamp_millis();
        self.state
            .update(|state| prompt::apply_response(state, &response, now_ms))
            .await;
        Ok(())
    }

    /// One bare transport attempt; feedback responses carry nothing to
    /// parse beyond success.
    pub async fn try_send_feedback(
        &self,
        feedback: &QueuedFeedback,
    ) -> Result<(), TransportError> {
        let payload = FeedbackPayload::from_feedback(feedback, &self.client);
        self.transport.send_feedback(&payload).await
    }
}
