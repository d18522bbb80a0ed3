// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management: startup, serving, shutdown.

use std::future::Future;
use std::net::SocketAddr;

use herald_core::{Hub, Reaper, SystemClock, TaskStatus};
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::info;

use crate::config::{Config, ConfigError};
use crate::routes::{self, AppState};

/// Hub type served by the daemon
pub type StatusHub = Hub<TaskStatus, SystemClock>;

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Failed to bind {0}: {1}")]
    BindFailed(SocketAddr, std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Could not determine log directory")]
    NoLogDir,

    #[error("Logging setup failed: {0}")]
    Logging(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A started daemon, bound but not yet serving
pub struct Daemon {
    pub config: Config,
    pub hub: StatusHub,
    listener: TcpListener,
    reaper: Reaper,
}

/// Start the daemon
///
/// Binding happens before the reaper is spawned so a taken port fails fast.
pub async fn startup(config: &Config) -> Result<Daemon, LifecycleError> {
    let listener = TcpListener::bind(config.bind)
        .await
        .map_err(|e| LifecycleError::BindFailed(config.bind, e))?;

    let hub = Hub::new(config.initial_status, config.hub, SystemClock);
    let reaper = Reaper::start(hub.clone());

    info!(
        initial_status = %config.initial_status,
        max_wait_ms = config.hub.max_wait.as_millis() as u64,
        reap_interval_ms = config.hub.reap_interval().as_millis() as u64,
        "Daemon started"
    );

    Ok(Daemon {
        config: config.clone(),
        hub,
        listener,
        reaper,
    })
}

impl Daemon {
    /// Address actually bound (resolves port 0)
    pub fn local_addr(&self) -> Result<SocketAddr, LifecycleError> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve until `shutdown` resolves
    ///
    /// On shutdown the hub is closed first so held polls answer right away
    /// instead of keeping connections open for the rest of their wait.
    pub async fn run<F>(self, shutdown: F) -> Result<(), LifecycleError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let hub = self.hub.clone();
        let app = routes::router(AppState::new(self.hub.clone()));

        axum::serve(self.listener, app)
            .with_graceful_shutdown(async move {
                shutdown.await;
                info!("Shutting down daemon...");
                hub.close();
            })
            .await?;

        self.reaper.shutdown().await;
        info!("Daemon shutdown complete");
        Ok(())
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
