// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod bench;
pub mod health;
pub mod poll;
pub mod status;
pub mod update;
pub mod watch;
