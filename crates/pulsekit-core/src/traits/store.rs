// SPDX-FileCopyrightText: 2026 Pulsekit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage adapter trait for the durable state blob and user identity.

use async_trait::async_trait;

use crate::error::PulsekitError;
use crate::types::PersistedState;

/// Adapter for the durable key-value slot backing the SDK.
///
/// Implementations store exactly two values under one namespace: the
/// serialized [`PersistedState`] document and the opaque user identity
/// string. The identity lives in its own slot so clearing feedback data and
/// clearing identity remain independent operations.
#[async_trait]
pub trait StateStore: Send + Sync + 'static {
    /// Loads the persisted state blob.
    ///
    /// A missing or corrupt document yields `Ok(PersistedState::default())`
    /// rather than an error; `Err` is reserved for backend failures (e.g.
    /// the database cannot be reached at all).
    async fn load(&self) -> Result<PersistedState, PulsekitError>;

    /// Durably writes the whole state blob, replacing any previous document.
    async fn save(&self, state: &PersistedState) -> Result<(), PulsekitError>;

    /// Removes the state blob. Loading afterwards yields the default state.
    async fn clear(&self) -> Result<(), PulsekitError>;

    /// Loads the stored user identity, if any.
    async fn load_identity(&self) -> Result<Option<String>, PulsekitError>;

    /// Durably stores the user identity.
    async fn save_identity(&self, user_id: &str) -> Result<(), PulsekitError>;

    /// Removes the stored user identity.
    async fn clear_identity(&self) -> Result<(), PulsekitError>;
}
