// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User-friendly error display with context and suggestions.
//!
//! This module provides enhanced error types that include:
//! - What went wrong (message)
//! - Why it might have happened (context)
//! - How to fix it (suggestions)

use std::fmt;

use herald_core::TaskStatus;

use crate::client::ClientError;

/// Error with context and recovery suggestions for user-friendly display.
#[derive(Debug)]
pub struct CliError {
    /// What went wrong
    pub message: String,
    /// Why it might have happened
    pub context: Vec<String>,
    /// How to fix it
    pub suggestions: Vec<String>,
    /// Original error if any
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl CliError {
    /// Create a new error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: Vec::new(),
            suggestions: Vec::new(),
            source: None,
        }
    }

    /// Add context about why this error might have happened.
    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        self.context.push(ctx.into());
        self
    }

    /// Add a suggestion for how to fix this error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Set the source error that caused this error.
    pub fn with_source<E: std::error::Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "error: {}", self.message)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            for ctx in &self.context {
                writeln!(f, "  -> {}", ctx)?;
            }
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            writeln!(f, "suggestions:")?;
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Common error builders for typical failure scenarios.
impl CliError {
    /// Error for when the daemon cannot be reached.
    pub fn server_unreachable(server: &str) -> Self {
        CliError::new(format!("Could not reach herald server at {}", server))
            .with_context("The daemon may not be running")
            .with_context("The address or port may be wrong")
            .with_suggestion("Start the daemon: heraldd")
            .with_suggestion("Point at another server: herald --server <url> (or HERALD_SERVER)")
    }

    /// Error for a status outside the known set.
    pub fn invalid_status(raw: &str) -> Self {
        let valid: Vec<&str> = TaskStatus::ALL.iter().map(|s| s.as_str()).collect();
        CliError::new(format!("invalid status {:?}", raw))
            .with_context(format!("Valid statuses: {}", valid.join(", ")))
            .with_suggestion(format!("herald update {}", TaskStatus::InProgress))
    }

    /// Error for when the daemon is closing and refuses new waits.
    pub fn shutting_down(server: &str) -> Self {
        CliError::new(format!("Herald server at {} is shutting down", server))
            .with_suggestion("Retry once the daemon has restarted")
    }

    /// Translate a client error into something actionable.
    pub fn from_client(err: ClientError, server: &str) -> Self {
        if err.is_unreachable() {
            return CliError::server_unreachable(server).with_source(err);
        }
        match err {
            ClientError::ShuttingDown => CliError::shutting_down(server),
            other => CliError::new(other.to_string()).with_source(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CliError::new("Something went wrong")
            .with_context("First context")
            .with_context("Second context")
            .with_suggestion("Try this")
            .with_suggestion("Or this");

        let output = format!("{}", err);
        assert!(output.contains("error: Something went wrong"));
        assert!(output.contains("-> First context"));
        assert!(output.contains("-> Second context"));
        assert!(output.contains("1. Try this"));
        assert!(output.contains("2. Or this"));
    }

    #[test]
    fn test_invalid_status_lists_choices() {
        let output = format!("{}", CliError::invalid_status("done"));
        assert!(output.contains("invalid status \"done\""));
        assert!(output.contains("pending, in_progress, completed, failed"));
    }

    #[test]
    fn test_shutting_down_is_translated() {
        let err = CliError::from_client(ClientError::ShuttingDown, "http://h:1");
        assert!(err.message.contains("shutting down"));
        assert!(err.source.is_none());
    }

    #[test]
    fn test_rejection_keeps_server_message() {
        let err = CliError::from_client(
            ClientError::Rejected {
                status: 400,
                message: "status is required".to_string(),
            },
            "http://h:1",
        );
        assert!(err.message.contains("status is required"));
        assert!(err.source.is_some());
    }
}
