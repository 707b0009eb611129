// SPDX-FileCopyrightText: 2026 Pulsekit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Effective-connectivity signal.
//!
//! The host platform feeds the raw link state through [`ConnectivityState::set_online`];
//! tests and host QA builds can force the SDK offline regardless of the real
//! link via the override. Consumers observe one boolean: raw AND NOT forced.

use std::sync::Mutex;

use tokio::sync::watch;
use tracing::debug;

#[derive(Debug, Clone, Copy)]
struct Flags {
    online: bool,
    force_offline: bool,
}

impl Flags {
    fn effective(self) -> bool {
        self.online && !self.force_offline
    }
}

/// Continuously-updated "is effectively online" signal with a
/// forced-offline override.
///
/// The latest value is synchronously available to any new subscriber via
/// the watch channel; the retry coordinator reacts to transitions through
/// [`ConnectivityState::subscribe`].
pub struct ConnectivityState {
    flags: Mutex<Flags>,
    tx: watch::Sender<bool>,
}

impl ConnectivityState {
    /// Creates the signal with the given initial raw link state and the
    /// override unset.
    pub fn new(initially_online: bool) -> Self {
        let flags = Flags {
            online: initially_online,
            force_offline: false,
        };
        let (tx, _rx) = watch::channel(flags.effective());
        Self {
            flags: Mutex::new(flags),
            tx,
        }
    }

    /// Updates the raw link state as reported by the host platform.
    pub fn set_online(&self, online: bool) {
        self.update(|flags| flags.online = online);
    }

    /// Sets or clears the forced-offline override.
    pub fn set_force_offline(&self, forced: bool) {
        self.update(|flags| flags.force_offline = forced);
    }

    /// Current effective state: raw link up AND override unset.
    pub fn is_effectively_online(&self) -> bool {
        *self.tx.borrow()
    }

    /// Subscribes to effective-state transitions.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }

    fn update(&self, f: impl FnOnce(&mut Flags)) {
        let mut flags = self.flags.lock().expect("connectivity flags poisoned");
        f(&mut flags);
        let effective = flags.effective();
        let previous = self.tx.send_replace(effective);
        if previous != effective {
            debug!(online = effective, "effective connectivity changed");
        }
    }
}

impl Default for ConnectivityState {
    fn default() -> Self {
        // Assume online until the host reports otherwise; a wrong guess
        // costs one failed attempt, which queues the item anyway.
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effective_state_combines_link_and_override() {
        let connectivity = ConnectivityState::new(true);
        assert!(connectivity.is_effectively_online());

        connectivity.set_force_offline(true);
        assert!(!connectivity.is_effectively_online());

        // Link state changes do not clear the override.
        connectivity.set_online(false);
        connectivity.set_online(true);
        assert!(!connectivity.is_effectively_online());

        connectivity.set_force_offline(false);
        assert!(connectivity.is_effectively_online());
    }

    #[tokio::test]
    async fn subscribers_see_the_latest_value_immediately() {
        let connectivity = ConnectivityState::new(false);
        let rx = connectivity.subscribe();
        assert!(!*rx.borrow());

        connectivity.set_online(true);
        assert!(*rx.borrow());
    }

    #[tokio::test]
    async fn transitions_wake_waiting_subscribers() {
        let connectivity = std::sync::Arc::new(ConnectivityState::new(false));
        let mut rx = connectivity.subscribe();

        let flipper = connectivity.clone();
        let task = tokio::spawn(async move {
            flipper.set_online(true);
        });

        rx.changed().await.unwrap();
        assert!(*rx.borrow());
        task.await.unwrap();
    }
}
