// SPDX-FileCopyrightText: 2026 Pulsekit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background
//! thread: `Database` wraps a single `tokio_rusqlite::Connection`, every
//! query goes through `connection().call()`, and that one connection IS the
//! single writer. Do NOT create additional Connection instances for writes.

use std::path::Path;

use pulsekit_core::PulsekitError;
use tokio_rusqlite::Connection;
use tracing::debug;

/// Schema for the key-value slots backing the SDK.
///
/// One row per (namespace, key); the state document and the user identity
/// are the only two keys the SDK writes.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS kv (
    namespace   TEXT NOT NULL,
    key         TEXT NOT NULL,
    value       TEXT NOT NULL,
    updated_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    PRIMARY KEY (namespace, key)
);
";

/// Handle to the SQLite database, cheap to clone.
#[derive(Clone)]
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens (creating if needed) the database at `path`, applies pragmas,
    /// and ensures the schema exists.
    pub async fn open(path: &Path) -> Result<Self, PulsekitError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| PulsekitError::Storage {
                source: Box::new(e),
            })?;
        }

        let conn = Connection::open(path.to_path_buf())
            .await
            .map_err(map_rq_err)?;
        init_connection(&conn).await?;
        debug!(path = %path.display(), "database opened");
        Ok(Self { conn })
    }

    /// Opens an in-memory database. Used by tests and as a last-resort
    /// fallback when no on-disk location is writable.
    pub async fn open_in_memory() -> Result<Self, PulsekitError> {
        let conn = Connection::open_in_memory().await.map_err(map_rq_err)?;
        init_connection(&conn).await?;
        Ok(Self { conn })
    }

    /// The single shared connection. All reads and writes call through it.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Closes the connection, flushing pending work on the writer thread.
    /// Affects every clone of this handle.
    pub async fn close(&self) -> Result<(), PulsekitError> {
        self.conn.clone().close().await.map_err(map_tr_err)
    }
}

async fn init_connection(conn: &Connection) -> Result<(), PulsekitError> {
    conn.call(|conn| {
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
    })
    .await
    .map_err(map_tr_err)
}

/// Maps a tokio-rusqlite error into the SDK's storage error variant.
pub(crate) fn map_tr_err(e: tokio_rusqlite::Error) -> PulsekitError {
    PulsekitError::Storage {
        source: Box::new(e),
    }
}

/// Maps a rusqlite error into the SDK's storage error variant.
///
/// `Connection::open`/`open_in_memory` surface `rusqlite::Error` directly,
/// unlike the other calls which go through `tokio_rusqlite::Error`.
pub(crate) fn map_rq_err(e: rusqlite::Error) -> PulsekitError {
    PulsekitError::Storage {
        source: Box::new(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn open_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("nested/dir/test.db");
        let db = Database::open(&db_path).await.unwrap();
        assert!(db_path.exists());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn schema_is_idempotent_across_reopens() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");

        let db = Database::open(&db_path).await.unwrap();
        db.close().await.unwrap();

        // Second open runs the CREATE TABLE IF NOT EXISTS again.
        let db = Database::open(&db_path).await.unwrap();
        let count: i64 = db
            .connection()
            .call(|conn| {
                Ok::<i64, rusqlite::Error>(conn.query_row("SELECT COUNT(*) FROM kv", [], |row| {
                    row.get(0)
                })?)
            })
            .await
            .unwrap();
        assert_eq!(count, 0);
        db.close().await.unwrap();
    }
}
