// SPDX-FileCopyrightText: 2026 Pulsekit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Feedback-collection SDK with an offline-tolerant queue and retry
//! coordinator.
//!
//! The [`Pulsekit`] facade is the single entry point that:
//! - Logs discrete experience events and submits structured feedback
//! - Queues everything durably when offline or when the backend fails
//! - Re-delivers queued items from a background retry coordinator
//! - Publishes prompt visibility, UI copy, and flow type as watch streams
//! - Tears down its background work on explicit shutdown
//!
//! Network and storage trouble never surface to the host app; the only
//! caller-visible failure in the whole SDK is feedback body validation.
//!
//! ```no_run
//! use pulsekit::{Pulsekit, PulsekitConfig, Rating};
//!
//! # async fn example() {
//! let sdk = Pulsekit::start(PulsekitConfig::with_api_key("pk_live_123")).await;
//! sdk.log(Rating::Positive, Some("after checkout".to_string()));
//! sdk.post_feedback(Rating::Negative, Some("cart lost my items".to_string()))
//!     .await
//!     .unwrap();
//! sdk.shutdown().await;
//! # }
//! ```

pub mod connectivity;
pub mod identity;
pub mod prompt;
pub mod queue;
pub mod retry;
pub mod state;
pub mod submitter;
pub mod telemetry;

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use pulsekit_core::wire::ClientInfo;
use tokio::sync::{watch, Mutex};
use tracing::{error, info, warn};

pub use pulsekit_config::PulsekitConfig;
pub use pulsekit_core::{
    Experience, FeedbackUiStrings, FlowType, PersistedState, PulsekitError, QueuedFeedback,
    Rating, StateStore, Transport, MAX_FEEDBACK_CHARS,
};
pub use pulsekit_storage::SqliteStore;
pub use pulsekit_transport::HttpTransport;

pub use connectivity::ConnectivityState;

use crate::prompt::PromptPublisher;
use crate::queue::QueueManager;
use crate::retry::RetryCoordinator;
use crate::state::SharedState;
use crate::submitter::Submitter;

struct Inner {
    state: Arc<SharedState>,
    queue: QueueManager,
    submitter: Arc<Submitter>,
    connectivity: Arc<ConnectivityState>,
    retry: Mutex<Option<RetryCoordinator>>,
    user_id: String,
}

/// The SDK facade, owned by the host application's composition root.
///
/// Constructed via [`Pulsekit::start`]; a blank API key produces a disabled
/// handle whose operations are logged no-ops, because this is typically
/// called from app-startup code where throwing would be disruptive.
/// Re-calling `start` builds a fresh, independently-wired handle; teardown
/// is explicit via [`Pulsekit::shutdown`].
pub struct Pulsekit {
    publisher: Arc<PromptPublisher>,
    inner: Option<Arc<Inner>>,
}

impl Pulsekit {
    /// Starts the SDK with production wiring: SQLite storage at the
    /// configured (or platform-default) path and the HTTP transport.
    ///
    /// Never fails: configuration or storage trouble logs a diagnostic and
    /// yields a disabled handle instead.
    pub async fn start(config: PulsekitConfig) -> Pulsekit {
        let Some(api_key) = effective_api_key(&config) else {
            error!("pulsekit disabled: api.key is blank or missing");
            return Pulsekit::disabled();
        };

        let store = match &config.storage.path {
            Some(path) => SqliteStore::open(path).await,
            None => SqliteStore::open_default().await,
        };
        let store: Arc<dyn StateStore> = match store {
            Ok(store) => Arc::new(store),
            Err(e) => {
                error!(error = %e, "pulsekit disabled: storage could not be opened");
                return Pulsekit::disabled();
            }
        };

        let timeout = Duration::from_secs(config.api.timeout_secs.max(1));
        let transport = match HttpTransport::new(&api_key, &config.api.base_url, timeout) {
            Ok(transport) => Arc::new(transport) as Arc<dyn Transport>,
            Err(e) => {
                error!(error = %e, "pulsekit disabled: transport could not be built");
                return Pulsekit::disabled();
            }
        };

        Self::start_with(config, store, transport, Arc::new(ConnectivityState::default())).await
    }

    /// Starts the SDK with injected adapters. This is the seam used by
    /// tests and by hosts with their own storage or connectivity source.
    pub async fn start_with(
        config: PulsekitConfig,
        store: Arc<dyn StateStore>,
        transport: Arc<dyn Transport>,
        connectivity: Arc<ConnectivityState>,
    ) -> Pulsekit {
        if effective_api_key(&config).is_none() {
            error!("pulsekit disabled: api.key is blank or missing");
            return Pulsekit::disabled();
        }
        for warning in pulsekit_config::validate_config(&config) {
            warn!(warning = warning.as_str(), "configuration warning");
        }

        let publisher = Arc::new(PromptPublisher::new());
        let user_id =
            identity::resolve_user_id(config.client.user_id.as_deref(), &store).await;
        let state = Arc::new(SharedState::load(store, publisher.clone()).await);
        let queue = QueueManager::new(state.clone());

        let client = ClientInfo {
            client_id: user_id.clone(),
            source: config.client.source.clone(),
            build_version: config.client.build_version.clone(),
        };
        let submitter = Arc::new(Submitter::new(
            transport,
            queue.clone(),
            state.clone(),
            connectivity.clone(),
            client,
        ));

        let interval = Duration::from_secs(config.retry.interval_secs.max(1));
        let retry = RetryCoordinator::spawn(
            submitter.clone(),
            queue.clone(),
            connectivity.clone(),
            interval,
        );

        info!(source = config.client.source.as_str(), "pulsekit started");

        Pulsekit {
            publisher,
            inner: Some(Arc::new(Inner {
                state,
                queue,
                submitter,
                connectivity,
                retry: Mutex::new(Some(retry)),
                user_id,
            })),
        }
    }

    fn disabled() -> Pulsekit {
        Pulsekit {
            publisher: Arc::new(PromptPublisher::new()),
            inner: None,
        }
    }

    /// Whether `start` wired a working SDK (false for disabled handles).
    pub fn is_started(&self) -> bool {
        self.inner.is_some()
    }

    /// Logs one experience event. Fire-and-forget: the submission runs on a
    /// background task and the call never blocks on the network.
    pub fn log(&self, rating: Rating, context: Option<String>) {
        let Some(inner) = &self.inner else {
            warn!("pulsekit not started, dropping experience");
            return;
        };
        let experience = Experience {
            timestamp_ms: Utc::now().timestamp_millis(),
            rating,
            context,
        };
        let submitter = inner.submitter.clone();
        tokio::spawn(async move {
            submitter.submit_experience(experience).await;
        });
    }

    /// Submits structured feedback.
    ///
    /// The body length check is the only caller-visible failure in the SDK;
    /// once validation passes the result is always `Ok`, whether the item
    /// was delivered immediately or queued for retry.
    pub async fn post_feedback(
        &self,
        rating: Rating,
        body: Option<String>,
    ) -> Result<(), PulsekitError> {
        if let Some(body) = &body
            && body.chars().count() > MAX_FEEDBACK_CHARS
        {
            return Err(PulsekitError::Validation {
                message: format!("feedback body exceeds {MAX_FEEDBACK_CHARS} characters"),
            });
        }
        let Some(inner) = &self.inner else {
            warn!("pulsekit not started, dropping feedback");
            return Ok(());
        };
        let feedback = QueuedFeedback {
            timestamp_ms: Utc::now().timestamp_millis(),
            rating,
            body,
        };
        inner.submitter.submit_feedback(feedback).await;
        Ok(())
    }

    /// Closes the prompt after the user interacted with (or waved away)
    /// the feedback UI. Persisted immediately.
    pub async fn dismiss(&self) {
        if let Some(inner) = &self.inner {
            inner.state.update(prompt::dismiss).await;
        }
    }

    /// Forces the prompt open, bypassing server-driven logic. Host-triggered
    /// and testing scenarios only.
    pub async fn trigger_show(&self) {
        if let Some(inner) = &self.inner {
            let now_ms = Utc::now().timestamp_millis();
            inner
                .state
                .update(|state| prompt::force_show(state, now_ms))
                .await;
        }
    }

    /// Clears all persisted SDK state and the stored user identity, and
    /// republishes defaults. Idempotent; the retry coordinator keeps
    /// running. The in-memory client id lives until the next `start`.
    pub async fn reset(&self) {
        let Some(inner) = &self.inner else {
            return;
        };
        let _ = inner.state.reset().await;
        if let Err(e) = inner.state.store().clear_identity().await {
            warn!(error = %e, "failed to clear user identity");
        }
        info!("pulsekit state reset");
    }

    /// Stops the retry coordinator and releases background work. Required
    /// on host teardown; a long-lived facade would otherwise leak its
    /// background task across the host's lifecycle boundary.
    pub async fn shutdown(&self) {
        let Some(inner) = &self.inner else {
            return;
        };
        if let Some(retry) = inner.retry.lock().await.take() {
            retry.shutdown().await;
        }
        info!("pulsekit stopped");
    }

    /// Observable: should the feedback UI currently be shown.
    pub fn show_prompt(&self) -> watch::Receiver<bool> {
        self.publisher.subscribe_show_prompt()
    }

    /// Observable: current UI copy (local defaults or server overrides).
    pub fn ui_strings(&self) -> watch::Receiver<FeedbackUiStrings> {
        self.publisher.subscribe_ui_strings()
    }

    /// Observable: which question variant the UI should present.
    pub fn flow_type(&self) -> watch::Receiver<FlowType> {
        self.publisher.subscribe_flow_type()
    }

    /// Feeds the raw platform link state into the SDK.
    pub fn set_online(&self, online: bool) {
        if let Some(inner) = &self.inner {
            inner.connectivity.set_online(online);
        }
    }

    /// Sets or clears the forced-offline testing override.
    pub fn set_force_offline(&self, forced: bool) {
        if let Some(inner) = &self.inner {
            inner.connectivity.set_force_offline(forced);
        }
    }

    /// The resolved user identifier, when started.
    pub fn user_id(&self) -> Option<&str> {
        self.inner.as_ref().map(|inner| inner.user_id.as_str())
    }

    /// Current (experiences, feedback) queue depths. Host diagnostics.
    pub async fn queued_counts(&self) -> (usize, usize) {
        match &self.inner {
            Some(inner) => inner.queue.depths().await,
            None => (0, 0),
        }
    }
}

fn effective_api_key(config: &PulsekitConfig) -> Option<String> {
    config
        .api
        .key
        .as_deref()
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(str::to_string)
}
