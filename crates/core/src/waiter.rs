// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A blocked caller waiting for a newer version
//!
//! Each waiter owns the sending half of a one-shot slot. Resolving consumes
//! the waiter, so whoever removed it from the registry is the only party that
//! can ever deliver to it.

use std::fmt;
use std::time::{Duration, Instant};

use tokio::sync::oneshot;

use crate::state::Snapshot;

/// Process-unique waiter identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WaiterId(pub u64);

impl fmt::Display for WaiterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "w{}", self.0)
    }
}

/// Lifecycle of a waiter
///
/// `Pending` on registration; every other state is terminal and reached at
/// most once, together with removal from the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaiterState {
    Pending,
    Fulfilled,
    TimedOut,
    Cancelled,
}

/// What a waiter is resolved with
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<V> {
    /// A newer snapshot arrived
    Fulfilled(Snapshot<V>),
    /// Nothing newer within the maximum wait
    TimedOut,
    /// The wait was abandoned (caller went away or the hub closed)
    Cancelled,
}

impl<V> Resolution<V> {
    pub fn state(&self) -> WaiterState {
        match self {
            Resolution::Fulfilled(_) => WaiterState::Fulfilled,
            Resolution::TimedOut => WaiterState::TimedOut,
            Resolution::Cancelled => WaiterState::Cancelled,
        }
    }
}

/// One outstanding wait
#[derive(Debug)]
pub struct Waiter<V> {
    pub id: WaiterId,
    /// Version the caller already knows; only a strictly greater one satisfies it
    pub baseline: u64,
    pub created_at: Instant,
    slot: oneshot::Sender<Resolution<V>>,
}

impl<V> Waiter<V> {
    /// Create a waiter and the receiving half of its slot
    pub fn new(
        id: WaiterId,
        baseline: u64,
        created_at: Instant,
    ) -> (Self, oneshot::Receiver<Resolution<V>>) {
        let (slot, rx) = oneshot::channel();
        let waiter = Self {
            id,
            baseline,
            created_at,
            slot,
        };
        (waiter, rx)
    }

    /// Time spent waiting as of `now`
    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.created_at)
    }

    pub fn is_expired(&self, now: Instant, max_wait: Duration) -> bool {
        self.elapsed(now) > max_wait
    }

    /// Deliver the resolution
    ///
    /// Returns false when the receiving side is already gone.
    pub fn resolve(self, resolution: Resolution<V>) -> bool {
        self.slot.send(resolution).is_ok()
    }
}

#[cfg(test)]
#[path = "waiter_tests.rs"]
mod tests;
