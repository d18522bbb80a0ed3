// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Background eviction of waiters that outlived the maximum wait
//!
//! Backstop for waiters whose callers vanished without cancelling. With a
//! tick interval shorter than the maximum wait, no waiter survives longer
//! than `max_wait + interval`.

use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::hub::Hub;
use crate::status::StateValue;

/// Smallest tick accepted; `tokio::time::interval` rejects zero
const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Handle to a running reaper task
///
/// Dropping the handle stops the task.
#[derive(Debug)]
pub struct Reaper {
    stop: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl Reaper {
    /// Spawn a reaper using the hub's configured interval
    pub fn start<V: StateValue, C: Clock>(hub: Hub<V, C>) -> Self {
        let interval = hub.config().reap_interval();
        Self::spawn(hub, interval)
    }

    /// Spawn a reaper ticking every `interval`
    pub fn spawn<V: StateValue, C: Clock>(hub: Hub<V, C>, interval: Duration) -> Self {
        let interval = interval.max(MIN_INTERVAL);
        let (stop, mut stopped) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // First tick completes immediately
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = &mut stopped => break,
                    _ = ticker.tick() => {
                        let evicted = hub.reap();
                        if evicted > 0 {
                            info!(evicted, "evicted expired waiters");
                        }
                    }
                }
            }
            debug!("reaper stopped");
        });

        debug!(interval_ms = interval.as_millis() as u64, "reaper started");
        Self {
            stop: Some(stop),
            task,
        }
    }

    /// Stop the task and wait for it to exit
    pub async fn shutdown(mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Err(e) = (&mut self.task).await {
            warn!(error = %e, "reaper task ended abnormally");
        }
    }
}

impl Drop for Reaper {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
#[path = "reaper_tests.rs"]
mod tests;
