// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Herald Daemon (heraldd)
//!
//! Serves the current task status and holds long-poll requests until the
//! status changes.

use std::path::PathBuf;

use herald_daemon::{lifecycle, setup_logging, Config};
use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info};

const ENV_CONFIG: &str = "HERALD_CONFIG";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Config path: first argument, then HERALD_CONFIG
    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var(ENV_CONFIG).ok())
        .filter(|p| !p.is_empty())
        .map(PathBuf::from);

    let config = Config::load(config_path.as_deref())?;

    // Set up logging
    let log_guard = setup_logging(&config.log)?;

    match &config_path {
        Some(path) => info!("Starting heraldd with config {}", path.display()),
        None => info!("Starting heraldd with default config"),
    }

    // Start daemon
    let daemon = match lifecycle::startup(&config).await {
        Ok(d) => d,
        Err(e) => {
            error!("Failed to start daemon: {}", e);
            drop(log_guard);
            return Err(e.into());
        }
    };

    // Set up signal handlers
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    let addr = daemon.local_addr()?;
    info!("Daemon ready, listening on {}", addr);

    // Signal ready for parent process (e.g., test harness waiting for startup)
    println!("READY {}", addr);

    let shutdown = async move {
        tokio::select! {
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
            _ = sigint.recv() => info!("Received SIGINT, shutting down..."),
        }
    };

    if let Err(e) = daemon.run(shutdown).await {
        error!("Daemon exited with error: {}", e);
        return Err(e.into());
    }

    drop(log_guard);
    Ok(())
}
