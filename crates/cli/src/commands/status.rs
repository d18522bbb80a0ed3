// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Read the current status without waiting

use anyhow::Result;

use crate::client::HeraldClient;
use crate::error::CliError;
use crate::output::{self, OutputFormat};

pub fn handle(client: &HeraldClient, format: OutputFormat) -> Result<()> {
    let body = client
        .status()
        .map_err(|e| CliError::from_client(e, client.server()))?;
    output::print(&body, output::status_line(&body), format);
    Ok(())
}
