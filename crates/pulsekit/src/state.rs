// SPDX-FileCopyrightText: 2026 Pulsekit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The single read-modify-write-persist critical section.
//!
//! Caller-triggered submissions and the retry coordinator both mutate the
//! one [`PersistedState`] blob. Every mutation goes through
//! [`SharedState::update`], which holds the lock across mutate, save, and
//! republish, so a `log()` racing a retry-pass completion can never lose an
//! update.
//!
//! The lock is never held across a network call; retry passes clone a
//! snapshot first and come back for one batch update.

use std::sync::Arc;

use pulsekit_core::{PersistedState, PulsekitError, StateStore};
use tokio::sync::Mutex;
use tracing::{error, warn};

use crate::prompt::PromptPublisher;

/// Owner of the in-memory state copy, its durable backing slot, and the
/// observable-state publisher.
pub struct SharedState {
    store: Arc<dyn StateStore>,
    state: Mutex<PersistedState>,
    publisher: Arc<PromptPublisher>,
}

impl SharedState {
    /// Loads state from the store (corrupt or missing data loads as the
    /// default inside the store; a backend failure degrades to the default
    /// here) and republishes it.
    pub async fn load(store: Arc<dyn StateStore>, publisher: Arc<PromptPublisher>) -> SharedState {
        let state = match store.load().await {
            Ok(state) => state,
            Err(e) => {
                warn!(error = %e, "failed to load persisted state, starting from defaults");
                PersistedState::default()
            }
        };
        publisher.republish(&state);
        SharedState {
            store,
            state: Mutex::new(state),
            publisher,
        }
    }

    /// Runs one mutation as a critical section: lock, mutate, persist,
    /// republish, unlock, in that order. The mutation's return value is
    /// handed back to the caller.
    ///
    /// A persist failure is logged and swallowed: the in-memory state stays
    /// mutated and the operation still counts as a success, trading
    /// durability for never surfacing storage trouble to the host app.
    pub async fn update<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut PersistedState) -> R,
    {
        let mut state = self.state.lock().await;
        let result = f(&mut state);
        if let Err(e) = self.store.save(&state).await {
            error!(error = %e, "failed to persist state update");
        }
        self.publisher.republish(&state);
        result
    }

    /// Clones the current state. Used by retry passes to iterate without
    /// holding the lock across network calls.
    pub async fn snapshot(&self) -> PersistedState {
        self.state.lock().await.clone()
    }

    /// Resets to the default state: in-memory copy, durable slot, and
    /// published streams. Idempotent.
    pub async fn reset(&self) -> Result<(), PulsekitError> {
        let mut state = self.state.lock().await;
        *state = PersistedState::default();
        let result = self.store.clear().await;
        if let Err(e) = &result {
            error!(error = %e, "failed to clear persisted state");
        }
        self.publisher.republish(&state);
        result
    }

    pub fn publisher(&self) -> &Arc<PromptPublisher> {
        &self.publisher
    }

    pub fn store(&self) -> &Arc<dyn StateStore> {
        &self.store
    }
}
