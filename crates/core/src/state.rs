// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Versioned state container
//!
//! Holds the current value, its version and the time of the last accepted
//! change. The container itself is not synchronized; the hub keeps it behind
//! the same lock as the waiter registry so that version checks and
//! registrations are linearizable with updates.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A consistent view of the state at one version
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot<V> {
    pub value: V,
    pub version: u64,
    pub updated_at: DateTime<Utc>,
}

/// Result of applying an update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// Version after the update (unchanged for a no-op)
    pub version: u64,
    /// Whether the value changed and the version was bumped
    pub changed: bool,
}

/// Current value plus a strictly increasing version counter
#[derive(Debug, Clone)]
pub struct VersionedState<V> {
    value: V,
    version: u64,
    updated_at: DateTime<Utc>,
}

impl<V: Clone + PartialEq> VersionedState<V> {
    /// Create the state at version 0
    pub fn new(initial: V, at: DateTime<Utc>) -> Self {
        Self {
            value: initial,
            version: 0,
            updated_at: at,
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Whether a caller that has seen `baseline` is behind
    pub fn is_newer_than(&self, baseline: u64) -> bool {
        self.version > baseline
    }

    pub fn read(&self) -> Snapshot<V> {
        Snapshot {
            value: self.value.clone(),
            version: self.version,
            updated_at: self.updated_at,
        }
    }

    /// Replace the value, bumping the version by one
    ///
    /// Setting the value it already holds is a no-op: no version bump and
    /// no new timestamp.
    pub fn update(&mut self, value: V, at: DateTime<Utc>) -> UpdateOutcome {
        if value == self.value {
            return UpdateOutcome {
                version: self.version,
                changed: false,
            };
        }

        self.value = value;
        self.version += 1;
        self.updated_at = at;

        UpdateOutcome {
            version: self.version,
            changed: true,
        }
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
