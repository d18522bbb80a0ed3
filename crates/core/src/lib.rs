// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! herald-core: versioned-state notification primitive
//!
//! This crate provides:
//! - A versioned state container with atomic value/version updates
//! - A waiter registry and broadcast delivery of new versions
//! - The long-poll wait protocol (fast path, registration, deadline, cancellation)
//! - A background reaper that times out stale waiters

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod baseline;
pub mod clock;
pub mod config;
pub mod error;
pub mod status;

// Notification machinery (order follows dependencies)
pub mod state;
pub mod waiter;
pub mod registry;
pub mod notify;
pub mod hub;
pub mod reaper;

// Re-exports
pub use baseline::parse_baseline;
pub use clock::{Clock, FakeClock, SystemClock};
pub use config::HubConfig;
pub use error::HeraldError;
pub use hub::{Hub, HubStats, PendingWait, Published, Registration};
pub use notify::Broadcast;
pub use reaper::Reaper;
pub use registry::WaiterRegistry;
pub use state::{Snapshot, UpdateOutcome, VersionedState};
pub use status::{StateValue, TaskStatus};
pub use waiter::{Resolution, Waiter, WaiterId, WaiterState};
