// SPDX-FileCopyrightText: 2026 Pulsekit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Background retry coordinator.
//!
//! Two states. Idle: wait for effective connectivity. Retrying: run a pass
//! immediately, then every `interval` while still connected. Losing
//! connectivity (or setting the forced-offline override) cancels the
//! in-flight wait rather than letting a reconnect sit behind a stale
//! timer, and shutdown cancels everything via the [`CancellationToken`].
//!
//! A pass re-reads the whole queue from the shared snapshot each time
//! rather than keeping a cursor: queue sizes are single-digit in practice
//! and correctness under restart beats micro-efficiency here.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::connectivity::ConnectivityState;
use crate::queue::QueueManager;
use crate::submitter::Submitter;

/// Handle to the spawned coordinator task.
pub struct RetryCoordinator {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl RetryCoordinator {
    /// Spawns the coordinator loop onto the current runtime.
    pub fn spawn(
        submitter: Arc<Submitter>,
        queue: QueueManager,
        connectivity: Arc<ConnectivityState>,
        interval: Duration,
    ) -> RetryCoordinator {
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let handle = tokio::spawn(async move {
            run_loop(submitter, queue, connectivity, interval, token).await;
        });
        RetryCoordinator { cancel, handle }
    }

    /// Cancels the loop and waits for the task to finish.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        if let Err(e) = self.handle.await {
            warn!(error = %e, "retry coordinator task did not shut down cleanly");
        }
        debug!("retry coordinator stopped");
    }
}

/// Waits until the connectivity signal equals `target`. Errors only when
/// the sender side is gone, which means the SDK is being torn down.
async fn wait_for(
    rx: &mut watch::Receiver<bool>,
    target: bool,
) -> Result<(), watch::error::RecvError> {
    loop {
        if *rx.borrow_and_update() == target {
            return Ok(());
        }
        rx.changed().await?;
    }
}

async fn run_loop(
    submitter: Arc<Submitter>,
    queue: QueueManager,
    connectivity: Arc<ConnectivityState>,
    interval: Duration,
    cancel: CancellationToken,
) {
    let mut rx = connectivity.subscribe();
    debug!(interval_secs = interval.as_secs(), "retry coordinator running");

    loop {
        // Idle: wait for effective connectivity.
        tokio::select! {
            _ = cancel.cancelled() => return,
            result = wait_for(&mut rx, true) => {
                if result.is_err() {
                    return;
                }
            }
        }

        // Retrying: immediate pass on entry, then a fixed cadence. Losing
        // connectivity drops back to Idle without waiting out the timer.
        loop {
            run_pass(&submitter, &queue, &connectivity).await;

            tokio::select! {
                _ = cancel.cancelled() => return,
                result = wait_for(&mut rx, false) => {
                    if result.is_err() {
                        return;
                    }
                    debug!("connectivity lost, retry coordinator idling");
                    break;
                }
                _ = tokio::time::sleep(interval) => {}
            }
        }
    }
}

/// One retry pass: attempt everything currently queued, FIFO within each
/// queue, each item independently; remove the successes in one batch.
async fn run_pass(submitter: &Submitter, queue: &QueueManager, connectivity: &ConnectivityState) {
    let (experiences, feedback) = queue.snapshot().await;
    if experiences.is_empty() && feedback.is_empty() {
        return;
    }
    debug!(
        experiences = experiences.len(),
        feedback = feedback.len(),
        "retry pass started"
    );

    let mut delivered_experiences = Vec::new();
    let mut delivered_feedback = Vec::new();
    let mut aborted = false;

    for experience in &experiences {
        // Re-checked between items so a link drop mid-pass stops burning
        // doomed attempts; the remainder simply stays queued.
        if !connectivity.is_effectively_online() {
            aborted = true;
            break;
        }
        match submitter.try_send_experience(experience).await {
            Ok(()) => delivered_experiences.push(experience.clone()),
            Err(e) => debug!(error = %e, "queued experience still undeliverable"),
        }
    }

    if !aborted {
        for feedback_item in &feedback {
            if !connectivity.is_effectively_online() {
                aborted = true;
                break;
            }
            match submitter.try_send_feedback(feedback_item).await {
                Ok(()) => delivered_feedback.push(feedback_item.clone()),
                Err(e) => debug!(error = %e, "queued feedback still undeliverable"),
            }
        }
    }

    queue
        .remove_delivered(&delivered_experiences, &delivered_feedback)
        .await;

    if !delivered_experiences.is_empty() || !delivered_feedback.is_empty() {
        info!(
            experiences = delivered_experiences.len(),
            feedback = delivered_feedback.len(),
            "retry pass delivered queued items"
        );
    }
    if aborted {
        debug!("retry pass stopped early on connectivity loss");
    }
}
