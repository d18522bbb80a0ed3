// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Set of outstanding waiters
//!
//! Plain data structure; callers provide the exclusion. Removal hands the
//! waiter to the caller, which then becomes its only possible resolver.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::waiter::{Waiter, WaiterId};

#[derive(Debug)]
pub struct WaiterRegistry<V> {
    waiters: HashMap<WaiterId, Waiter<V>>,
}

impl<V> Default for WaiterRegistry<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> WaiterRegistry<V> {
    pub fn new() -> Self {
        Self {
            waiters: HashMap::new(),
        }
    }

    pub fn insert(&mut self, waiter: Waiter<V>) {
        self.waiters.insert(waiter.id, waiter);
    }

    /// Take a waiter out; `None` if something else already removed it
    pub fn remove(&mut self, id: WaiterId) -> Option<Waiter<V>> {
        self.waiters.remove(&id)
    }

    /// Take every waiter, leaving the registry empty
    pub fn drain(&mut self) -> Vec<Waiter<V>> {
        self.waiters.drain().map(|(_, waiter)| waiter).collect()
    }

    /// Take every waiter that has waited longer than `max_wait`
    pub fn drain_expired(&mut self, now: Instant, max_wait: Duration) -> Vec<Waiter<V>> {
        let expired: Vec<WaiterId> = self
            .waiters
            .values()
            .filter(|w| w.is_expired(now, max_wait))
            .map(|w| w.id)
            .collect();

        expired
            .into_iter()
            .filter_map(|id| self.waiters.remove(&id))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.waiters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waiters.is_empty()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
