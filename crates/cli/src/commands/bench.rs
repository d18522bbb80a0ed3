// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Load check: several watchers follow a burst of updates
//!
//! Every update cycles to the next status so each one bumps the version.
//! A watcher is done once it has seen the final version; updates that land
//! between two of its polls are coalesced into one response.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use serde::Serialize;
use tracing::info;

use super::watch::{self, sleep_unless_stopped, Watcher};
use crate::client::HeraldClient;
use crate::error::CliError;
use crate::output::{self, OutputFormat};

#[derive(clap::Args)]
pub struct BenchArgs {
    /// Number of concurrent watchers
    #[arg(long, default_value_t = 5)]
    pub clients: usize,

    /// Number of status updates to publish
    #[arg(long, default_value_t = 10)]
    pub updates: u64,

    /// Delay between updates (milliseconds)
    #[arg(long, default_value_t = 500)]
    pub interval_ms: u64,

    /// Extra time watchers get to catch up after the last update (milliseconds)
    ///
    /// A watcher still behind when this window closes stops after its poll in
    /// flight returns, which can take up to the server's maximum wait.
    #[arg(long, default_value_t = 3000)]
    pub settle_ms: u64,
}

/// Per-watcher result
#[derive(Debug, Clone, Serialize)]
pub struct ClientReport {
    pub id: usize,
    #[serde(flatten)]
    pub watcher: Watcher,
}

/// Whole-run result
#[derive(Debug, Clone, Serialize)]
pub struct BenchReport {
    pub updates_sent: u64,
    pub start_version: u64,
    pub final_version: u64,
    pub elapsed_ms: u64,
    pub clients: Vec<ClientReport>,
}

impl BenchReport {
    /// Watchers that ended on the final version
    pub fn caught_up(&self) -> usize {
        self.clients
            .iter()
            .filter(|c| c.watcher.version >= self.final_version)
            .count()
    }
}

impl fmt::Display for BenchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Sent {} updates (v{} -> v{}) in {}ms",
            self.updates_sent, self.start_version, self.final_version, self.elapsed_ms
        )?;
        writeln!(f, "{:<8} {:>6} {:>8} {:>7} {:>8}", "CLIENT", "POLLS", "UPDATES", "ERRORS", "VERSION")?;
        for c in &self.clients {
            writeln!(
                f,
                "{:<8} {:>6} {:>8} {:>7} {:>8}",
                c.id, c.watcher.polls, c.watcher.updates, c.watcher.errors, c.watcher.version
            )?;
        }
        write!(
            f,
            "{}/{} clients reached final version {}",
            self.caught_up(),
            self.clients.len(),
            self.final_version
        )
    }
}

pub fn handle(client: &HeraldClient, args: BenchArgs, format: OutputFormat) -> Result<()> {
    let stop = watch::stop_on_ctrlc()?;
    let report = run(client, &args, &stop)?;
    output::print(&report, &report, format);
    Ok(())
}

/// Run the benchmark; `stop` ends it early
pub fn run(client: &HeraldClient, args: &BenchArgs, stop: &Arc<AtomicBool>) -> Result<BenchReport> {
    let started = Instant::now();
    let initial = client
        .status()
        .map_err(|e| CliError::from_client(e, client.server()))?;
    let start_version = initial.version;
    let target = start_version.saturating_add(args.updates);
    info!(clients = args.clients, updates = args.updates, start_version, "bench starting");

    let handles: Vec<_> = (1..=args.clients)
        .map(|id| {
            let client = client.clone();
            let stop = stop.clone();
            thread::spawn(move || {
                let mut watcher = Watcher::new(start_version);
                // Nothing to wait for when no updates will be sent
                if watcher.version < target {
                    watch::watch_loop(
                        &client,
                        &mut watcher,
                        &stop,
                        watch::RETRY_DELAY,
                        |watcher, _| watcher.version < target,
                    );
                }
                ClientReport { id, watcher }
            })
        })
        .collect();

    // Let watchers register before the first update
    let interval = Duration::from_millis(args.interval_ms);
    sleep_unless_stopped(interval, stop);

    let mut status = initial.status;
    let mut updates_sent = 0;
    let mut final_version = start_version;
    for _ in 0..args.updates {
        if stop.load(Ordering::SeqCst) {
            break;
        }
        status = status.next();
        let body = client
            .update(status)
            .map_err(|e| CliError::from_client(e, client.server()))?;
        updates_sent += 1;
        final_version = body.version;
        sleep_unless_stopped(interval, stop);
    }

    // Watchers still behind are released after the settle window
    let deadline = Instant::now().checked_add(Duration::from_millis(args.settle_ms));
    while !handles.iter().all(|h| h.is_finished())
        && deadline.map_or(true, |deadline| Instant::now() < deadline)
    {
        sleep_unless_stopped(Duration::from_millis(10), stop);
        if stop.load(Ordering::SeqCst) {
            break;
        }
    }
    stop.store(true, Ordering::SeqCst);

    let mut clients = Vec::with_capacity(handles.len());
    for handle in handles {
        clients.push(
            handle
                .join()
                .map_err(|_| anyhow!("watcher thread panicked"))?,
        );
    }

    Ok(BenchReport {
        updates_sent,
        start_version,
        final_version,
        elapsed_ms: started.elapsed().as_millis() as u64,
        clients,
    })
}
