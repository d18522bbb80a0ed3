// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon configuration
//!
//! Sources, lowest to highest precedence: built-in defaults, an optional
//! TOML file, then `HERALD_*` environment variables.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use herald_core::{HubConfig, TaskStatus};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ENV_BIND: &str = "HERALD_BIND";
pub const ENV_LOG: &str = "HERALD_LOG";
pub const ENV_LOG_FILE: &str = "HERALD_LOG_FILE";
pub const ENV_MAX_WAIT_MS: &str = "HERALD_MAX_WAIT_MS";
pub const ENV_REAP_INTERVAL_MS: &str = "HERALD_REAP_INTERVAL_MS";

/// Daemon configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Address the HTTP server binds to
    pub bind: SocketAddr,
    /// Status the state starts with at version 0
    pub initial_status: TaskStatus,
    pub log: LogConfig,
    pub hub: HubConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub filter: String,
    /// Write logs to this file instead of stdout
    pub file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 5000)),
            initial_status: TaskStatus::default(),
            log: LogConfig::default(),
            hub: HubConfig::default(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            file: None,
        }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    Read(PathBuf, std::io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {var}: {value:?}")]
    InvalidEnv { var: &'static str, value: String },

    #[error("Invalid timing: {0}")]
    InvalidTiming(String),
}

impl Config {
    /// Load from an optional file plus the process environment
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|var| std::env::var(var).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Apply overrides from environment variables (looked up through `var`)
    pub fn apply_env<F>(&mut self, var: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = var(ENV_BIND) {
            self.bind = value.parse().map_err(|_| ConfigError::InvalidEnv {
                var: ENV_BIND,
                value,
            })?;
        }
        if let Some(value) = var(ENV_LOG) {
            self.log.filter = value;
        }
        if let Some(value) = var(ENV_LOG_FILE) {
            self.log.file = (!value.is_empty()).then(|| PathBuf::from(value));
        }
        if let Some(value) = var(ENV_MAX_WAIT_MS) {
            self.hub.max_wait = parse_millis(ENV_MAX_WAIT_MS, value)?;
        }
        if let Some(value) = var(ENV_REAP_INTERVAL_MS) {
            self.hub.reap_interval = Some(parse_millis(ENV_REAP_INTERVAL_MS, value)?);
        }
        Ok(())
    }

    /// The reaper must tick more often than waiters expire
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hub.max_wait.is_zero() {
            return Err(ConfigError::InvalidTiming(
                "max_wait must be greater than zero".to_string(),
            ));
        }
        let interval = self.hub.reap_interval();
        if interval.is_zero() || interval >= self.hub.max_wait {
            return Err(ConfigError::InvalidTiming(format!(
                "reap_interval ({:?}) must be between zero and max_wait ({:?})",
                interval, self.hub.max_wait
            )));
        }
        Ok(())
    }
}

fn parse_millis(var: &'static str, value: String) -> Result<Duration, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|_| ConfigError::InvalidEnv { var, value })
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
