// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Output formatting for CLI commands

use std::fmt::Display;

use herald_daemon::StatusBody;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_flag(json: bool) -> Self {
        if json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// Print `value` as JSON, or `text` in text mode
pub fn print<T: Serialize>(value: &T, text: impl Display, format: OutputFormat) {
    match format {
        OutputFormat::Text => println!("{}", text),
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string(value) {
                println!("{}", json);
            }
        }
    }
}

/// One-line rendering of a status snapshot
pub fn status_line(body: &StatusBody) -> String {
    format!(
        "{} (v{}) at {}",
        body.status,
        body.version,
        body.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
    )
}
