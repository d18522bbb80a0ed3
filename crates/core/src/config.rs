// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Hub timing configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Divisor applied to `max_wait` when no reap interval is configured
const REAP_DIVISOR: u32 = 6;

/// Timing limits for waiters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HubConfig {
    /// Longest a waiter may stay registered
    #[serde(with = "humantime_serde", default = "default_max_wait")]
    pub max_wait: Duration,
    /// How often the reaper sweeps; defaults to a sixth of `max_wait`
    #[serde(with = "humantime_serde", default)]
    pub reap_interval: Option<Duration>,
}

fn default_max_wait() -> Duration {
    Duration::from_secs(30)
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            max_wait: default_max_wait(),
            reap_interval: None,
        }
    }
}

impl HubConfig {
    pub fn with_max_wait(max_wait: Duration) -> Self {
        Self {
            max_wait,
            reap_interval: None,
        }
    }

    /// Effective sweep interval
    pub fn reap_interval(&self) -> Duration {
        self.reap_interval
            .unwrap_or_else(|| self.max_wait / REAP_DIVISOR)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
