// SPDX-FileCopyrightText: 2026 Pulsekit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory `StateStore` for deterministic tests.
//!
//! Stores the state document as serialized JSON, exactly like the SQLite
//! store, so tests that simulate a process restart (drop one SDK, build
//! another over the same store) exercise real serialization. Failure
//! injection covers the recovered-error paths: saves that fail and blobs
//! that are corrupt.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use pulsekit_core::{PersistedState, PulsekitError, StateStore};
use tracing::warn;

#[derive(Default)]
pub struct MemoryStore {
    state_json: Mutex<Option<String>>,
    identity: Mutex<Option<String>>,
    fail_saves: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }

    /// Makes every subsequent save (state or identity) fail.
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Replaces the stored document with garbage to exercise the
    /// corrupt-blob fallback.
    pub fn corrupt_state(&self) {
        *self.state_json.lock().unwrap() = Some("{definitely not json".to_string());
    }

    /// Parses and returns the stored document, for assertions on exactly
    /// what was persisted. `None` when nothing was saved or the blob is
    /// corrupt.
    pub fn read_state(&self) -> Option<PersistedState> {
        self.state_json
            .lock()
            .unwrap()
            .as_deref()
            .and_then(|json| serde_json::from_str(json).ok())
    }

    /// The stored identity, for assertions.
    pub fn read_identity(&self) -> Option<String> {
        self.identity.lock().unwrap().clone()
    }

    fn save_failure(&self) -> Option<PulsekitError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            Some(PulsekitError::Storage {
                source: Box::new(std::io::Error::other("injected save failure")),
            })
        } else {
            None
        }
    }
}

#[async_trait]
impl StateStore for MemoryStore {
    async fn load(&self) -> Result<PersistedState, PulsekitError> {
        match self.state_json.lock().unwrap().as_deref() {
            None => Ok(PersistedState::default()),
            Some(json) => match serde_json::from_str(json) {
                Ok(state) => Ok(state),
                Err(e) => {
                    warn!(error = %e, "stored state is corrupt, falling back to defaults");
                    Ok(PersistedState::default())
                }
            },
        }
    }

    async fn save(&self, state: &PersistedState) -> Result<(), PulsekitError> {
        if let Some(err) = self.save_failure() {
            return Err(err);
        }
        let json = serde_json::to_string(state).map_err(|e| PulsekitError::Storage {
            source: Box::new(e),
        })?;
        *self.state_json.lock().unwrap() = Some(json);
        Ok(())
    }

    async fn clear(&self) -> Result<(), PulsekitError> {
        *self.state_json.lock().unwrap() = None;
        Ok(())
    }

    async fn load_identity(&self) -> Result<Option<String>, PulsekitError> {
        Ok(self.identity.lock().unwrap().clone())
    }

    async fn save_identity(&self, user_id: &str) -> Result<(), PulsekitError> {
        if let Some(err) = self.save_failure() {
            return Err(err);
        }
        *self.identity.lock().unwrap() = Some(user_id.to_string());
        Ok(())
    }

    async fn clear_identity(&self) -> Result<(), PulsekitError> {
        *self.identity.lock().unwrap() = None;
        Ok(())
    }
}
