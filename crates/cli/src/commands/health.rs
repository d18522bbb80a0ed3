// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon health and counters

use anyhow::Result;

use crate::client::{HealthReport, HeraldClient};
use crate::error::CliError;
use crate::output::{self, OutputFormat};

pub fn handle(client: &HeraldClient, format: OutputFormat) -> Result<()> {
    let report = client
        .health()
        .map_err(|e| CliError::from_client(e, client.server()))?;
    output::print(&report, render(&report), format);
    Ok(())
}

fn render(report: &HealthReport) -> String {
    let hub = &report.hub;
    format!(
        "{} (herald {}, up {}s)\n  Version:   {}\n  Waiters:   {}\n  Updates:   {}\n  Fulfilled: {}\n  Timed out: {}\n  Cancelled: {}",
        report.status,
        report.version,
        report.uptime_secs,
        hub.version,
        hub.waiters,
        hub.updates,
        hub.fulfilled,
        hub.timed_out,
        hub.cancelled
    )
}
