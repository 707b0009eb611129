// SPDX-FileCopyrightText: 2026 Pulsekit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `StateStore` implementation over the SQLite key-value slots.
//!
//! Two keys under one namespace: `state` holds the serialized
//! [`PersistedState`] document, `user_id` holds the opaque identity string.
//! A corrupt or missing document loads as the default state so a bad write
//! can never brick initialization.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use pulsekit_core::{PersistedState, PulsekitError, StateStore};
use rusqlite::params;
use tracing::{debug, warn};

use crate::database::{map_tr_err, Database};

const NAMESPACE: &str = "pulsekit";
const STATE_KEY: &str = "state";
const IDENTITY_KEY: &str = "user_id";

/// Durable state store backed by SQLite.
#[derive(Clone)]
pub struct SqliteStore {
    db: Database,
}

impl SqliteStore {
    /// Opens a store at the given database path.
    pub async fn open(path: &Path) -> Result<Self, PulsekitError> {
        Ok(Self {
            db: Database::open(path).await?,
        })
    }

    /// Opens a store at the platform-default location,
    /// `{data dir}/pulsekit/pulsekit.db`.
    pub async fn open_default() -> Result<Self, PulsekitError> {
        Self::open(&Self::default_db_path()).await
    }

    /// The platform-default database path.
    pub fn default_db_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pulsekit/pulsekit.db")
    }

    /// Closes the underlying database.
    pub async fn close(&self) -> Result<(), PulsekitError> {
        self.db.close().await
    }

    async fn get(&self, key: &'static str) -> Result<Option<String>, PulsekitError> {
        self.db
            .connection()
            .call(move |conn| {
                let mut stmt =
                    conn.prepare("SELECT value FROM kv WHERE namespace = ?1 AND key = ?2")?;
                let mut rows = stmt.query(params![NAMESPACE, key])?;
                match rows.next()? {
                    Some(row) => Ok(Some(row.get::<_, String>(0)?)),
                    None => Ok(None),
                }
            })
            .await
            .map_err(map_tr_err)
    }

    async fn put(&self, key: &'static str, value: String) -> Result<(), PulsekitError> {
        self.db
            .connection()
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO kv (namespace, key, value) VALUES (?1, ?2, ?3)
                     ON CONFLICT (namespace, key) DO UPDATE
                     SET value = excluded.value,
                         updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')",
                    params![NAMESPACE, key, value],
                )?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }

    async fn delete(&self, key: &'static str) -> Result<(), PulsekitError> {
        self.db
            .connection()
            .call(move |conn| {
                conn.execute(
                    "DELETE FROM kv WHERE namespace = ?1 AND key = ?2",
                    params![NAMESPACE, key],
                )?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }
}

#[async_trait]
impl StateStore for SqliteStore {
    async fn load(&self) -> Result<PersistedState, PulsekitError> {
        match self.get(STATE_KEY).await? {
            None => {
                debug!("no persisted state found, starting from defaults");
                Ok(PersistedState::default())
            }
            Some(json) => match serde_json::from_str(&json) {
                Ok(state) => Ok(state),
                Err(e) => {
                    warn!(error = %e, "persisted state is corrupt, falling back to defaults");
                    Ok(PersistedState::default())
                }
            },
        }
    }

    async fn save(&self, state: &PersistedState) -> Result<(), PulsekitError> {
        let json = serde_json::to_string(state).map_err(|e| PulsekitError::Storage {
            source: Box::new(e),
        })?;
        self.put(STATE_KEY, json).await
    }

    async fn clear(&self) -> Result<(), PulsekitError> {
        self.delete(STATE_KEY).await
    }

    async fn load_identity(&self) -> Result<Option<String>, PulsekitError> {
        self.get(IDENTITY_KEY).await
    }

    async fn save_identity(&self, user_id: &str) -> Result<(), PulsekitError> {
        self.put(IDENTITY_KEY, user_id.to_string()).await
    }

    async fn clear_identity(&self) -> Result<(), PulsekitError> {
        self.delete(IDENTITY_KEY).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulsekit_core::types::{Experience, Rating};
    use tempfile::tempdir;

    async fn open_store() -> (SqliteStore, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let store = SqliteStore::open(&dir.path().join("test.db")).await.unwrap();
        (store, dir)
    }

    fn state_with_one_experience() -> PersistedState {
        PersistedState {
            unsent_experiences: vec![Experience {
                timestamp_ms: 1_700_000_000_000,
                rating: Rating::Positive,
                context: Some("settings screen".to_string()),
            }],
            show_prompt: true,
            ..PersistedState::default()
        }
    }

    #[tokio::test]
    async fn load_without_save_yields_default() {
        let (store, _dir) = open_store().await;
        let state = store.load().await.unwrap();
        assert_eq!(state, PersistedState::default());
        store.close().await.unwrap();
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let (store, _dir) = open_store().await;
        let state = state_with_one_experience();
        store.save(&state).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded, state);
        store.close().await.unwrap();
    }

    #[tokio::test]
    async fn state_survives_reopen() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");

        let store = SqliteStore::open(&db_path).await.unwrap();
        store.save(&state_with_one_experience()).await.unwrap();
        store.close().await.unwrap();

        // Simulated process restart: a fresh store over the same file.
        let store = SqliteStore::open(&db_path).await.unwrap();
        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.unsent_experiences.len(), 1);
        assert!(loaded.show_prompt);
        store.close().await.unwrap();
    }

    #[tokio::test]
    async fn corrupt_document_loads_as_default() {
        let (store, _dir) = open_store().await;
        store
            .put(STATE_KEY, "{not valid json".to_string())
            .await
            .unwrap();

        let state = store.load().await.unwrap();
        assert_eq!(state, PersistedState::default());
        store.close().await.unwrap();
    }

    #[tokio::test]
    async fn clear_removes_only_the_state_document() {
        let (store, _dir) = open_store().await;
        store.save(&state_with_one_experience()).await.unwrap();
        store.save_identity("user-1").await.unwrap();

        store.clear().await.unwrap();

        assert_eq!(store.load().await.unwrap(), PersistedState::default());
        assert_eq!(store.load_identity().await.unwrap().as_deref(), Some("user-1"));
        store.close().await.unwrap();
    }

    #[tokio::test]
    async fn identity_lifecycle() {
        let (store, _dir) = open_store().await;
        assert!(store.load_identity().await.unwrap().is_none());

        store.save_identity("a-uuid").await.unwrap();
        assert_eq!(store.load_identity().await.unwrap().as_deref(), Some("a-uuid"));

        // Overwrite keeps a single slot.
        store.save_identity("another-uuid").await.unwrap();
        assert_eq!(
            store.load_identity().await.unwrap().as_deref(),
            Some("another-uuid")
        );

        store.clear_identity().await.unwrap();
        assert!(store.load_identity().await.unwrap().is_none());
        store.close().await.unwrap();
    }

    #[tokio::test]
    async fn concurrent_saves_serialize_through_the_writer() {
        let (store, _dir) = open_store().await;

        let mut handles = Vec::new();
        for i in 0..10 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                let state = PersistedState {
                    unsent_experiences: vec![Experience {
                        timestamp_ms: i,
                        rating: Rating::Neutral,
                        context: None,
                    }],
                    ..PersistedState::default()
                };
                store.save(&state).await
            }));
        }

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        // Last write wins; the document is one of the ten, never a torn mix.
        let state = store.load().await.unwrap();
        assert_eq!(state.unsent_experiences.len(), 1);
        store.close().await.unwrap();
    }
}
