// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the notification core

use thiserror::Error;

/// Errors surfaced by state updates
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeraldError {
    #[error("invalid value: {0:?}")]
    InvalidValue(String),
    #[error("value is required")]
    MissingValue,
}
