// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Broadcast of a new version to every drained waiter

use tracing::debug;

use crate::registry::WaiterRegistry;
use crate::state::{Snapshot, VersionedState};
use crate::waiter::{Resolution, Waiter};

/// Waiters taken out of the registry together with the snapshot they get
///
/// Built while the state lock is held, delivered after it is released.
#[derive(Debug)]
pub struct Broadcast<V> {
    pub snapshot: Snapshot<V>,
    waiters: Vec<Waiter<V>>,
}

impl<V: Clone + PartialEq> Broadcast<V> {
    /// Drain the registry against a single read of the state
    pub fn collect(state: &VersionedState<V>, registry: &mut WaiterRegistry<V>) -> Self {
        Self {
            snapshot: state.read(),
            waiters: registry.drain(),
        }
    }

    pub fn len(&self) -> usize {
        self.waiters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waiters.is_empty()
    }

    /// Hand the snapshot to every waiter
    ///
    /// Sending on a one-shot slot never blocks, so delivery happens in place.
    /// Returns how many waiters were still listening.
    pub fn deliver(self) -> usize {
        let version = self.snapshot.version;
        let mut delivered = 0;
        for waiter in self.waiters {
            let id = waiter.id;
            if waiter.resolve(Resolution::Fulfilled(self.snapshot.clone())) {
                delivered += 1;
            } else {
                debug!(waiter = %id, version, "waiter gone before delivery");
            }
        }
        delivered
    }
}

#[cfg(test)]
#[path = "notify_tests.rs"]
mod tests;
