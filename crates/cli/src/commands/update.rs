// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Publish a new status

use anyhow::Result;
use herald_core::TaskStatus;

use crate::client::HeraldClient;
use crate::error::CliError;
use crate::output::{self, OutputFormat};

#[derive(clap::Args)]
pub struct UpdateArgs {
    /// New status (pending, in_progress, completed, failed)
    pub status: String,
}

pub fn handle(client: &HeraldClient, args: UpdateArgs, format: OutputFormat) -> Result<()> {
    // Reject locally so a typo never reaches the server
    let status: TaskStatus = args
        .status
        .trim()
        .parse()
        .map_err(|_| CliError::invalid_status(&args.status))?;

    let body = client
        .update(status)
        .map_err(|e| CliError::from_client(e, client.server()))?;
    output::print(
        &body,
        format!("Status updated: {}", output::status_line(&body)),
        format,
    );
    Ok(())
}
