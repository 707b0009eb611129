// SPDX-FileCopyrightText: 2026 Pulsekit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Pulsekit integration tests.
//!
//! `MockTransport` scripts per-attempt outcomes, `MemoryStore` is an
//! in-memory `StateStore` with failure injection, and `TestHarness` wires
//! a complete SDK instance from both.

pub mod harness;
pub mod memory_store;
pub mod mock_transport;

pub use harness::{eventually, TestHarness, TestHarnessBuilder};
pub use memory_store::MemoryStore;
pub use mock_transport::{experience_response, server_error, MockTransport};
