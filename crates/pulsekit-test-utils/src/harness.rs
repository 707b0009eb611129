// SPDX-FileCopyrightText: 2026 Pulsekit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness wiring a full SDK instance from mock adapters.
//!
//! Each harness is isolated: its own in-memory store, mock transport, and
//! connectivity signal. Sharing a store across two harnesses simulates a
//! process restart.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use pulsekit::{ConnectivityState, Pulsekit, PulsekitConfig};
use pulsekit_core::{StateStore, Transport};

use crate::memory_store::MemoryStore;
use crate::mock_transport::MockTransport;

pub struct TestHarness {
    pub sdk: Pulsekit,
    pub transport: Arc<MockTransport>,
    pub store: Arc<MemoryStore>,
    pub connectivity: Arc<ConnectivityState>,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::default()
    }
}

pub struct TestHarnessBuilder {
    api_key: String,
    online: bool,
    user_id: Option<String>,
    retry_interval_secs: u64,
    store: Option<Arc<MemoryStore>>,
}

impl Default for TestHarnessBuilder {
    fn default() -> Self {
        Self {
            api_key: "test-api-key".to_string(),
            online: true,
            user_id: None,
            retry_interval_secs: 180,
            store: None,
        }
    }
}

impl TestHarnessBuilder {
    /// Overrides the API key ("" builds a disabled SDK).
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = key.into();
        self
    }

    /// Initial effective connectivity (default: online).
    pub fn online(mut self, online: bool) -> Self {
        self.online = online;
        self
    }

    /// Host-supplied user identifier.
    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Seconds between retry passes (default 180; the immediate pass on
    /// reconnect is what most tests rely on).
    pub fn retry_interval_secs(mut self, secs: u64) -> Self {
        self.retry_interval_secs = secs;
        self
    }

    /// Reuses an existing store, simulating a restart over persisted data.
    pub fn store(mut self, store: Arc<MemoryStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub async fn build(self) -> TestHarness {
        let mut config = PulsekitConfig::with_api_key(self.api_key);
        config.client.user_id = self.user_id;
        config.client.source = "test".to_string();
        config.client.build_version = "0.0.0-test".to_string();
        config.retry.interval_secs = self.retry_interval_secs;

        let store = self.store.unwrap_or_else(|| Arc::new(MemoryStore::new()));
        let transport = Arc::new(MockTransport::new());
        let connectivity = Arc::new(ConnectivityState::new(self.online));

        let sdk = Pulsekit::start_with(
            config,
            store.clone() as Arc<dyn StateStore>,
            transport.clone() as Arc<dyn Transport>,
            connectivity.clone(),
        )
        .await;

        TestHarness {
            sdk,
            transport,
            store,
            connectivity,
        }
    }
}

/// Polls an async condition until it holds or ~2 seconds elapse.
///
/// Returns whether the condition ever held, so assertions stay at the call
/// site.
pub async fn eventually<F, Fut>(mut condition: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    for _ in 0..200 {
        if condition().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}
