// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Versioned-state notification hub
//!
//! Owns the state and the waiter registry behind one mutex. Everything that
//! reads the version to decide whether to register, and everything that
//! bumps the version, happens under that mutex; delivery to waiters happens
//! after it is released.
//!
//! Resolution rule: whoever removes a waiter from the registry resolves it,
//! and only that party. Notifier, reaper, the waiter's own deadline and
//! cancellation all go through removal first.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;
use tracing::{debug, info, trace};

use crate::clock::{Clock, SystemClock};
use crate::config::HubConfig;
use crate::error::HeraldError;
use crate::notify::Broadcast;
use crate::registry::WaiterRegistry;
use crate::state::{Snapshot, VersionedState};
use crate::status::StateValue;
use crate::waiter::{Resolution, Waiter, WaiterId, WaiterState};

/// Counters exposed for health reporting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HubStats {
    /// Current state version
    pub version: u64,
    /// Waiters currently registered
    pub waiters: usize,
    /// Accepted, version-bumping updates
    pub updates: u64,
    pub fulfilled: u64,
    pub timed_out: u64,
    pub cancelled: u64,
}

/// Result of an update request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Published<V> {
    /// State after the update
    pub snapshot: Snapshot<V>,
    /// False when the value was already current
    pub changed: bool,
    /// Waiters that received the new snapshot
    pub notified: usize,
}

/// Outcome of trying to register a waiter
#[derive(Debug)]
pub enum Registration<V: StateValue, C: Clock> {
    /// State is already newer than the baseline; no waiter was created
    Ready(Snapshot<V>),
    /// Waiter registered; await it with [`PendingWait::finish`]
    Pending(PendingWait<V, C>),
    /// Hub is shutting down and no longer accepts waiters
    Closed,
}

struct Inner<V> {
    state: VersionedState<V>,
    registry: WaiterRegistry<V>,
    next_id: u64,
    closed: bool,
    stats: HubStats,
}

impl<V> Inner<V> {
    fn record(&mut self, state: WaiterState, count: usize) {
        let count = count as u64;
        match state {
            WaiterState::Fulfilled => self.stats.fulfilled += count,
            WaiterState::TimedOut => self.stats.timed_out += count,
            WaiterState::Cancelled => self.stats.cancelled += count,
            WaiterState::Pending => {}
        }
    }
}

struct Shared<V, C> {
    inner: Mutex<Inner<V>>,
    clock: C,
    config: HubConfig,
}

/// Handle to a shared hub; clones refer to the same state
pub struct Hub<V, C = SystemClock> {
    shared: Arc<Shared<V, C>>,
}

impl<V, C> Clone for Hub<V, C> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<V: StateValue, C: Clock> Hub<V, C> {
    pub fn new(initial: V, config: HubConfig, clock: C) -> Self {
        let state = VersionedState::new(initial, clock.utc_now());
        Self {
            shared: Arc::new(Shared {
                inner: Mutex::new(Inner {
                    state,
                    registry: WaiterRegistry::new(),
                    next_id: 0,
                    closed: false,
                    stats: HubStats::default(),
                }),
                clock,
                config,
            }),
        }
    }

    pub fn config(&self) -> &HubConfig {
        &self.shared.config
    }

    pub fn clock(&self) -> &C {
        &self.shared.clock
    }

    fn lock(&self) -> MutexGuard<'_, Inner<V>> {
        self.shared.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Current snapshot; never blocks on waiters
    pub fn read(&self) -> Snapshot<V> {
        self.lock().state.read()
    }

    /// Set a new value and wake every waiter if it changed
    pub fn update(&self, value: V) -> Published<V> {
        let broadcast = {
            let mut guard = self.lock();
            let inner = &mut *guard;
            let outcome = inner.state.update(value, self.shared.clock.utc_now());
            if !outcome.changed {
                trace!(version = outcome.version, "update with current value ignored");
                return Published {
                    snapshot: inner.state.read(),
                    changed: false,
                    notified: 0,
                };
            }
            Self::publish(inner)
        };

        let snapshot = broadcast.snapshot.clone();
        let drained = broadcast.len();
        let notified = broadcast.deliver();
        info!(version = snapshot.version, drained, notified, "state updated");

        Published {
            snapshot,
            changed: true,
            notified,
        }
    }

    /// Validate untrusted input, then [`update`](Self::update)
    ///
    /// Invalid input never reaches the state.
    pub fn update_raw(&self, raw: &str) -> Result<Published<V>, HeraldError> {
        if raw.trim().is_empty() {
            return Err(HeraldError::MissingValue);
        }
        let value = V::parse(raw)?;
        Ok(self.update(value))
    }

    /// Drain all waiters against the post-update snapshot
    ///
    /// Called with the lock held, right after a version bump.
    fn publish(inner: &mut Inner<V>) -> Broadcast<V> {
        inner.stats.updates += 1;
        let broadcast = Broadcast::collect(&inner.state, &mut inner.registry);
        inner.record(WaiterState::Fulfilled, broadcast.len());
        broadcast
    }

    /// Register interest in any version newer than `baseline`
    pub fn register(&self, baseline: u64) -> Registration<V, C> {
        // Fast path: caller is already behind
        let current = self.read();
        if current.version > baseline {
            return Registration::Ready(current);
        }

        let mut inner = self.lock();
        // An update may have landed since the read above
        if inner.state.is_newer_than(baseline) {
            return Registration::Ready(inner.state.read());
        }
        if inner.closed {
            return Registration::Closed;
        }

        let id = WaiterId(inner.next_id);
        inner.next_id += 1;
        let (waiter, rx) = Waiter::new(id, baseline, self.shared.clock.now());
        inner.registry.insert(waiter);
        drop(inner);

        trace!(waiter = %id, baseline, "waiter registered");
        Registration::Pending(PendingWait {
            hub: self.clone(),
            id,
            rx,
            settled: false,
        })
    }

    /// Wait up to the configured maximum for a version newer than `baseline`
    pub async fn wait(&self, baseline: u64) -> Resolution<V> {
        self.wait_for(baseline, self.shared.config.max_wait).await
    }

    /// Wait up to `timeout` for a version newer than `baseline`
    pub async fn wait_for(&self, baseline: u64, timeout: Duration) -> Resolution<V> {
        match self.register(baseline) {
            Registration::Ready(snapshot) => Resolution::Fulfilled(snapshot),
            Registration::Pending(pending) => pending.finish(timeout).await,
            Registration::Closed => Resolution::Cancelled,
        }
    }

    /// Remove one waiter and resolve it; false if it was already gone
    fn retire(&self, id: WaiterId, resolution: Resolution<V>) -> bool {
        let waiter = {
            let mut inner = self.lock();
            let waiter = inner.registry.remove(id);
            if waiter.is_some() {
                inner.record(resolution.state(), 1);
            }
            waiter
        };

        match waiter {
            Some(waiter) => {
                waiter.resolve(resolution);
                true
            }
            None => false,
        }
    }

    /// Evict waiters older than the maximum wait, resolving them as timed out
    pub fn reap(&self) -> usize {
        let expired = {
            let mut inner = self.lock();
            let expired = inner
                .registry
                .drain_expired(self.shared.clock.now(), self.shared.config.max_wait);
            inner.record(WaiterState::TimedOut, expired.len());
            expired
        };

        let evicted = expired.len();
        for waiter in expired {
            waiter.resolve(Resolution::TimedOut);
        }
        evicted
    }

    /// Stop accepting waiters and cancel the ones still pending
    ///
    /// Updates are still accepted afterwards.
    pub fn close(&self) -> usize {
        let pending = {
            let mut inner = self.lock();
            inner.closed = true;
            let pending = inner.registry.drain();
            inner.record(WaiterState::Cancelled, pending.len());
            pending
        };

        let cancelled = pending.len();
        for waiter in pending {
            waiter.resolve(Resolution::Cancelled);
        }
        info!(cancelled, "hub closed");
        cancelled
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    pub fn waiter_count(&self) -> usize {
        self.lock().registry.len()
    }

    pub fn stats(&self) -> HubStats {
        let inner = self.lock();
        HubStats {
            version: inner.state.version(),
            waiters: inner.registry.len(),
            ..inner.stats
        }
    }
}

/// A registered waiter seen from the waiting side
///
/// Dropping it before [`finish`](Self::finish) completes removes the waiter
/// from the hub and counts it as cancelled.
pub struct PendingWait<V: StateValue, C: Clock> {
    hub: Hub<V, C>,
    id: WaiterId,
    rx: oneshot::Receiver<Resolution<V>>,
    settled: bool,
}

impl<V: StateValue, C: Clock> PendingWait<V, C> {
    pub fn id(&self) -> WaiterId {
        self.id
    }

    /// Suspend until resolved or until `timeout` elapses
    pub async fn finish(mut self, timeout: Duration) -> Resolution<V> {
        let resolution = match tokio::time::timeout(timeout, &mut self.rx).await {
            Ok(Ok(resolution)) => resolution,
            Ok(Err(_)) => Resolution::Cancelled,
            Err(_) => {
                if self.hub.retire(self.id, Resolution::TimedOut) {
                    Resolution::TimedOut
                } else {
                    // Another resolver removed it first; its delivery is in flight
                    (&mut self.rx).await.unwrap_or(Resolution::Cancelled)
                }
            }
        };

        self.settled = true;
        debug!(waiter = %self.id, state = ?resolution.state(), "wait finished");
        resolution
    }
}

impl<V: StateValue, C: Clock> Drop for PendingWait<V, C> {
    fn drop(&mut self) {
        if !self.settled && self.hub.retire(self.id, Resolution::Cancelled) {
            debug!(waiter = %self.id, "wait cancelled");
        }
    }
}

impl<V: StateValue, C: Clock> fmt::Debug for PendingWait<V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingWait")
            .field("id", &self.id)
            .field("settled", &self.settled)
            .finish()
    }
}

#[cfg(test)]
#[path = "hub_tests.rs"]
mod tests;
