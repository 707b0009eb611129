// SPDX-FileCopyrightText: 2026 Pulsekit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User identity resolution.
//!
//! Precedence: host-supplied, then previously persisted, then freshly
//! generated. Whatever wins is persisted so later sessions resolve to the
//! same identifier. The identity lives in its own storage slot, separate
//! from the state blob.

use std::sync::Arc;

use pulsekit_core::StateStore;
use tracing::{debug, warn};
use uuid::Uuid;

pub async fn resolve_user_id(supplied: Option<&str>, store: &Arc<dyn StateStore>) -> String {
    if let Some(supplied) = supplied {
        let supplied = supplied.trim();
        if !supplied.is_empty() {
            persist(supplied, store).await;
            return supplied.to_string();
        }
    }

    match store.load_identity().await {
        Ok(Some(stored)) if !stored.is_empty() => {
            debug!("reusing persisted user identity");
            stored
        }
        Ok(_) => {
            let generated = Uuid::new_v4().to_string();
            debug!("generated new user identity");
            persist(&generated, store).await;
            generated
        }
        Err(e) => {
            // Storage trouble: still hand back a usable id for this
            // session; it just won't be stable across restarts.
            warn!(error = %e, "failed to read persisted identity, using a session-local one");
            Uuid::new_v4().to_string()
        }
    }
}

async fn persist(user_id: &str, store: &Arc<dyn StateStore>) {
    if let Err(e) = store.save_identity(user_id).await {
        warn!(error = %e, "failed to persist user identity");
    }
}
