// SPDX-FileCopyrightText: 2026 Pulsekit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompt state machine and observable-state publishing.
//!
//! The show-prompt flag is a latch, not a symmetric state machine: a server
//! response can open it, but only an explicit dismiss or reset closes it.
//! A late-arriving response that says "don't show" must never yank a prompt
//! the user is already looking at.
//!
//! Published state rides three watch channels (show-prompt, UI strings,
//! flow type); the latest value is synchronously available to every new
//! subscriber, which is all the UI layer needs.

use pulsekit_core::wire::ExperienceResponse;
use pulsekit_core::{FeedbackUiStrings, FlowType, PersistedState};
use tokio::sync::watch;
use tracing::debug;

/// Applies one experiences-endpoint response to the persisted prompt state.
///
/// Every response refreshes the flow type and UI copy; only a `true` show
/// decision mutates the latch, and only when it is currently closed.
pub fn apply_response(state: &mut PersistedState, response: &ExperienceResponse, now_ms: i64) {
    let flow = FlowType::from_server(&response.flow_type);
    state.flow_type = flow;

    // Start from the local copy for the (possibly new) flow, then overlay
    // whatever the server chose to override.
    let mut strings = FeedbackUiStrings::for_flow(flow);
    if let Some(ui) = &response.feedback_ui {
        if let Some(title) = &ui.title {
            strings.title = title.clone();
        }
        if let Some(subtitle) = &ui.subtitle {
            strings.subtitle = subtitle.clone();
        }
        if let Some(prompt) = &ui.prompt {
            strings.prompt = prompt.clone();
        }
    }
    state.ui_strings = strings;

    if response.should_show_feedback && !state.show_prompt {
        state.show_prompt = true;
        state.last_prompt_at_ms = Some(now_ms);
        debug!(flow = %flow, "prompt latch opened by server response");
    }
}

/// Opens the latch unconditionally (host-triggered / testing escape hatch).
pub fn force_show(state: &mut PersistedState, now_ms: i64) {
    if !state.show_prompt {
        state.show_prompt = true;
        state.last_prompt_at_ms = Some(now_ms);
    }
}

/// Closes the latch after explicit user dismissal.
pub fn dismiss(state: &mut PersistedState) {
    state.show_prompt = false;
}

/// Single-latest-value broadcast of the prompt state consumed by the UI
/// layer.
pub struct PromptPublisher {
    show_tx: watch::Sender<bool>,
    strings_tx: watch::Sender<FeedbackUiStrings>,
    flow_tx: watch::Sender<FlowType>,
}

impl PromptPublisher {
    pub fn new() -> Self {
        let (show_tx, _) = watch::channel(false);
        let (strings_tx, _) = watch::channel(FeedbackUiStrings::default());
        let (flow_tx, _) = watch::channel(FlowType::default());
        Self {
            show_tx,
            strings_tx,
            flow_tx,
        }
    }

    /// Pushes the current persisted state into all three streams.
    pub fn republish(&self, state: &PersistedState) {
        self.show_tx.send_replace(state.show_prompt);
        self.strings_tx.send_replace(state.ui_strings.clone());
        self.flow_tx.send_replace(state.flow_type);
    }

    pub fn subscribe_show_prompt(&self) -> watch::Receiver<bool> {
        self.show_tx.subscribe()
    }

    pub fn subscribe_ui_strings(&self) -> watch::Receiver<FeedbackUiStrings> {
        self.strings_tx.subscribe()
    }

    pub fn subscribe_flow_type(&self) -> watch::Receiver<FlowType> {
        self.flow_tx.subscribe()
    }
}

impl Default for PromptPublisher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulsekit_core::wire::FeedbackUiPayload;

    fn response(should_show: bool, flow: &str) -> ExperienceResponse {
        ExperienceResponse {
            should_show_feedback: should_show,
            flow_type: flow.to_string(),
            feedback_ui: None,
        }
    }

    #[test]
    fn server_true_opens_the_latch() {
        let mut state = PersistedState::default();
        apply_response(&mut state, &response(true, "normal"), 1000);
        assert!(state.show_prompt);
        assert_eq!(state.last_prompt_at_ms, Some(1000));
    }

    #[test]
    fn server_false_never_closes_the_latch() {
        let mut state = PersistedState::default();
        apply_response(&mut state, &response(true, "normal"), 1000);
        apply_response(&mut state, &response(false, "normal"), 2000);
        assert!(state.show_prompt, "a server response alone must not close the latch");
        // The open timestamp is not refreshed by the second response.
        assert_eq!(state.last_prompt_at_ms, Some(1000));
    }

    #[test]
    fn only_dismiss_closes_the_latch() {
        let mut state = PersistedState::default();
        apply_response(&mut state, &response(true, "normal"), 1000);
        dismiss(&mut state);
        assert!(!state.show_prompt);
    }

    #[test]
    fn repeated_true_does_not_restamp_the_open_time() {
        let mut state = PersistedState::default();
        apply_response(&mut state, &response(true, "normal"), 1000);
        apply_response(&mut state, &response(true, "normal"), 5000);
        assert_eq!(state.last_prompt_at_ms, Some(1000));
    }

    #[test]
    fn every_response_refreshes_flow_type() {
        let mut state = PersistedState::default();
        apply_response(&mut state, &response(false, "frustration"), 1000);
        assert_eq!(state.flow_type, FlowType::Negative);
        assert!(!state.show_prompt);

        apply_response(&mut state, &response(false, "not-a-flow"), 2000);
        assert_eq!(state.flow_type, FlowType::Neutral);
    }

    #[test]
    fn ui_copy_follows_flow_until_server_overrides() {
        let mut state = PersistedState::default();
        apply_response(&mut state, &response(false, "frustration"), 1000);
        assert_eq!(state.ui_strings, FeedbackUiStrings::for_flow(FlowType::Negative));

        let with_overrides = ExperienceResponse {
            should_show_feedback: false,
            flow_type: "frustration".to_string(),
            feedback_ui: Some(FeedbackUiPayload {
                title: Some("We hear you".to_string()),
                subtitle: None,
                prompt: None,
            }),
        };
        apply_response(&mut state, &with_overrides, 2000);
        assert_eq!(state.ui_strings.title, "We hear you");
        // Fields the server omitted keep the per-flow defaults.
        assert_eq!(
            state.ui_strings.prompt,
            FeedbackUiStrings::for_flow(FlowType::Negative).prompt
        );
    }

    #[test]
    fn force_show_opens_without_a_server() {
        let mut state = PersistedState::default();
        force_show(&mut state, 3000);
        assert!(state.show_prompt);
        assert_eq!(state.last_prompt_at_ms, Some(3000));
    }

    #[test]
    fn publisher_delivers_latest_value_to_new_subscribers() {
        let publisher = PromptPublisher::new();
        let mut state = PersistedState::default();
        apply_response(
            &mut state,
            &ExperienceResponse {
                should_show_feedback: true,
                flow_type: "frustration".to_string(),
                feedback_ui: None,
            },
            1000,
        );
        publisher.republish(&state);

        // Subscribed after the publish; still sees the latest values.
        assert!(*publisher.subscribe_show_prompt().borrow());
        assert_eq!(*publisher.subscribe_flow_type().borrow(), FlowType::Negative);
    }
}
