// SPDX-FileCopyrightText: 2026 Pulsekit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock transport adapter for deterministic testing.
//!
//! Outcomes are popped from per-endpoint FIFO queues, so a test can script
//! "succeed, fail, succeed" and watch exactly which items survive a retry
//! pass. When a queue is empty the attempt succeeds with an empty response,
//! mirroring a quiet backend. Every payload that reaches the mock is
//! recorded for assertions.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use pulsekit_core::wire::{ExperiencePayload, ExperienceResponse, FeedbackPayload};
use pulsekit_core::{Transport, TransportError};

#[derive(Default)]
pub struct MockTransport {
    experience_outcomes: Mutex<VecDeque<Result<ExperienceResponse, TransportError>>>,
    feedback_outcomes: Mutex<VecDeque<Result<(), TransportError>>>,
    experiences: Mutex<Vec<ExperiencePayload>>,
    feedback: Mutex<Vec<FeedbackPayload>>,
}

/// Builds the experiences-endpoint response body tests feed the mock.
pub fn experience_response(should_show: bool, flow_type: &str) -> ExperienceResponse {
    ExperienceResponse {
        should_show_feedback: should_show,
        flow_type: flow_type.to_string(),
        feedback_ui: None,
    }
}

/// A server-side failure outcome.
pub fn server_error(status: u16) -> TransportError {
    TransportError::Api { status, body: None }
}

impl MockTransport {
    pub fn new() -> MockTransport {
        MockTransport::default()
    }

    /// Scripts the outcome of the next unscripted experience attempt.
    pub fn push_experience_outcome(
        &self,
        outcome: Result<ExperienceResponse, TransportError>,
    ) {
        self.experience_outcomes.lock().unwrap().push_back(outcome);
    }

    /// Scripts the outcome of the next unscripted feedback attempt.
    pub fn push_feedback_outcome(&self, outcome: Result<(), TransportError>) {
        self.feedback_outcomes.lock().unwrap().push_back(outcome);
    }

    /// Every experience payload that reached the transport, in order.
    pub fn sent_experiences(&self) -> Vec<ExperiencePayload> {
        self.experiences.lock().unwrap().clone()
    }

    /// Every feedback payload that reached the transport, in order.
    pub fn sent_feedback(&self) -> Vec<FeedbackPayload> {
        self.feedback.lock().unwrap().clone()
    }

    pub fn experience_calls(&self) -> usize {
        self.experiences.lock().unwrap().len()
    }

    pub fn feedback_calls(&self) -> usize {
        self.feedback.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send_experience(
        &self,
        payload: &ExperiencePayload,
    ) -> Result<ExperienceResponse, TransportError> {
        self.experiences.lock().unwrap().push(payload.clone());
        self.experience_outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(ExperienceResponse::default()))
    }

    async fn send_feedback(&self, payload: &FeedbackPayload) -> Result<(), TransportError> {
        self.feedback.lock().unwrap().push(payload.clone());
        self.feedback_outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(()))
    }
}
