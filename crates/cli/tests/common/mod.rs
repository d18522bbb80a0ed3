// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test utilities for CLI integration tests.

#![allow(dead_code)]

use std::time::Duration;

use herald_core::HubConfig;
use herald_daemon::{startup, Config, StatusHub};
use tokio::runtime::Runtime;
use tokio::sync::oneshot;

/// A daemon running in-process on an ephemeral port.
///
/// Dropping it shuts the daemon down.
pub struct TestServer {
    pub url: String,
    pub hub: StatusHub,
    stop: Option<oneshot::Sender<()>>,
    runtime: Runtime,
}

impl TestServer {
    pub fn start() -> Self {
        Self::with_max_wait(Duration::from_secs(30))
    }

    pub fn with_max_wait(max_wait: Duration) -> Self {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .expect("Failed to build runtime");

        let config = Config {
            bind: "127.0.0.1:0".parse().expect("valid address"),
            hub: HubConfig::with_max_wait(max_wait),
            ..Config::default()
        };
        let daemon = runtime
            .block_on(startup(&config))
            .expect("Failed to start daemon");
        let addr = daemon.local_addr().expect("Failed to read bound address");
        let hub = daemon.hub.clone();

        let (stop, stopped) = oneshot::channel::<()>();
        runtime.spawn(daemon.run(async move {
            let _ = stopped.await;
        }));

        Self {
            url: format!("http://{}", addr),
            hub,
            stop: Some(stop),
            runtime,
        }
    }

    /// Block until `count` polls are held by the daemon.
    pub fn wait_for_waiters(&self, count: usize) {
        for _ in 0..2000 {
            if self.hub.waiter_count() == count {
                return;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        panic!(
            "expected {} waiters, found {}",
            count,
            self.hub.waiter_count()
        );
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
    }
}

/// A server URL nothing is listening on.
pub fn closed_server() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to read address");
    drop(listener);
    format!("http://{}", addr)
}
