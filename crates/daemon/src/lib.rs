// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! herald-daemon: HTTP long-poll server over a herald hub
//!
//! The `heraldd` binary is a thin wrapper; everything it does is exposed here
//! so integration tests can run a daemon in-process on an ephemeral port.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod config;
pub mod lifecycle;
pub mod logging;
pub mod routes;

pub use config::{Config, ConfigError, LogConfig};
pub use lifecycle::{startup, Daemon, LifecycleError, StatusHub};
pub use logging::setup_logging;
pub use routes::{router, ApiError, AppState, ErrorBody, HealthBody, StatusBody};
