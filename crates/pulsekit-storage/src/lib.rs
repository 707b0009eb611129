// SPDX-FileCopyrightText: 2026 Pulsekit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for the Pulsekit feedback SDK.
//!
//! Provides WAL-mode SQLite storage with a single-writer concurrency model
//! via `tokio-rusqlite` and a two-slot key-value layout: the persisted
//! state document and the user identity.

pub mod database;
pub mod store;

pub use database::Database;
pub use store::SqliteStore;
