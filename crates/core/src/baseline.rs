// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Parsing of the caller's last-seen version

/// Parse a `last_version` parameter
///
/// Anything that is not a non-negative integer falls back to 0, which is
/// always behind the current state once it has changed at least once.
pub fn parse_baseline(raw: Option<&str>) -> u64 {
    raw.and_then(|s| s.trim().parse::<u64>().ok()).unwrap_or(0)
}
