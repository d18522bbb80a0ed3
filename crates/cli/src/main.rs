// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! herald - command-line client for the herald status daemon

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod client;
mod commands;
mod error;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{bench, health, poll, status, update, watch};
use tracing_subscriber::EnvFilter;

use crate::client::{HeraldClient, DEFAULT_SERVER};
use crate::error::CliError;
use crate::output::OutputFormat;

#[derive(Parser)]
#[command(
    name = "herald",
    version,
    about = "Herald - follow a shared task status with long polling"
)]
struct Cli {
    /// Base URL of the herald daemon
    #[arg(long, global = true, env = "HERALD_SERVER", default_value = DEFAULT_SERVER)]
    server: String,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the current status
    Status,
    /// Wait once for a status newer than a version
    Poll(poll::PollArgs),
    /// Print every status change until interrupted
    Watch(watch::WatchArgs),
    /// Publish a new status
    Update(update::UpdateArgs),
    /// Show daemon health and counters
    Health,
    /// Run several watchers against a burst of updates
    Bench(bench::BenchArgs),
}

fn main() {
    if let Err(e) = run() {
        match e.downcast_ref::<CliError>() {
            Some(err) => eprint!("{}", err),
            None => eprintln!("error: {:#}", e),
        }
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Diagnostics go to stderr so stdout stays machine-readable
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .try_init();

    let client = HeraldClient::new(&cli.server);
    let format = OutputFormat::from_flag(cli.json);

    match cli.command {
        Commands::Status => status::handle(&client, format),
        Commands::Poll(args) => poll::handle(&client, args, format),
        Commands::Watch(args) => watch::handle(&client, args, format),
        Commands::Update(args) => update::handle(&client, args, format),
        Commands::Health => health::handle(&client, format),
        Commands::Bench(args) => bench::handle(&client, args, format),
    }
}
