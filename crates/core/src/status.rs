// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task status domain
//!
//! The value carried by the shared state in the herald daemon: a
//! closed set of task states. Anything outside the set is rejected before
//! the state is touched.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::HeraldError;

/// A value that can live in a [`VersionedState`](crate::VersionedState)
///
/// `parse` is the domain check applied to untrusted input.
pub trait StateValue: Clone + PartialEq + Send + Sync + 'static {
    fn parse(raw: &str) -> Result<Self, HeraldError>;
}

/// Status of the tracked task
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Failed,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Completed,
        TaskStatus::Failed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
            TaskStatus::Failed => "failed",
        }
    }

    /// The status after this one when cycling through [`TaskStatus::ALL`]
    pub fn next(&self) -> TaskStatus {
        match self {
            TaskStatus::Pending => TaskStatus::InProgress,
            TaskStatus::InProgress => TaskStatus::Completed,
            TaskStatus::Completed => TaskStatus::Failed,
            TaskStatus::Failed => TaskStatus::Pending,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = HeraldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| HeraldError::InvalidValue(s.to_string()))
    }
}

impl StateValue for TaskStatus {
    fn parse(raw: &str) -> Result<Self, HeraldError> {
        raw.parse()
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
