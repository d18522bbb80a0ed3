// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tracing subscriber setup

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LogConfig;
use crate::lifecycle::LifecycleError;

/// Install the global subscriber
///
/// `RUST_LOG` takes precedence over the configured filter. When logging to a
/// file the returned guard must be held until exit so buffered lines flush.
pub fn setup_logging(config: &LogConfig) -> Result<Option<WorkerGuard>, LifecycleError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let Some(path) = config.file.as_deref() else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .try_init()
            .map_err(|e| LifecycleError::Logging(e.to_string()))?;
        return Ok(None);
    };

    // Create log directory if needed
    let dir = path.parent().ok_or(LifecycleError::NoLogDir)?;
    std::fs::create_dir_all(dir)?;
    let file_name = path.file_name().ok_or(LifecycleError::NoLogDir)?;

    let file_appender = tracing_appender::rolling::never(dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .try_init()
        .map_err(|e| LifecycleError::Logging(e.to_string()))?;

    Ok(Some(guard))
}
