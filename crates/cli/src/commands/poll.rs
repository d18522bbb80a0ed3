// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One long poll

use anyhow::Result;
use serde_json::json;

use crate::client::{HeraldClient, PollOutcome};
use crate::error::CliError;
use crate::output::{self, OutputFormat};

#[derive(clap::Args)]
pub struct PollArgs {
    /// Last version seen; returns as soon as the server has a newer one
    #[arg(long, default_value_t = 0)]
    pub since: u64,
}

pub fn handle(client: &HeraldClient, args: PollArgs, format: OutputFormat) -> Result<()> {
    let outcome = client
        .poll(args.since)
        .map_err(|e| CliError::from_client(e, client.server()))?;

    match outcome {
        PollOutcome::Update(body) => output::print(&body, output::status_line(&body), format),
        PollOutcome::NoChange => output::print(
            &json!({ "changed": false, "since": args.since }),
            "no change",
            format,
        ),
    }
    Ok(())
}
