// SPDX-FileCopyrightText: 2026 Pulsekit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP transport adapter for the Pulsekit feedback SDK.
//!
//! Implements the `Transport` trait from pulsekit-core over reqwest with
//! bearer authentication, bounded timeouts, and typed failure
//! classification.

pub mod client;

pub use client::HttpTransport;
