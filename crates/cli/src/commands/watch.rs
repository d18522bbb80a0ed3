// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Follow status changes with back-to-back long polls

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use herald_daemon::StatusBody;
use serde::Serialize;
use tracing::warn;

use crate::client::{ClientError, HeraldClient, PollOutcome};
use crate::output::{self, OutputFormat};

/// Pause after a failed poll before trying again
pub const RETRY_DELAY: Duration = Duration::from_secs(3);

/// Granularity at which sleeps notice a stop request
const STOP_CHECK: Duration = Duration::from_millis(50);

#[derive(clap::Args)]
pub struct WatchArgs {
    /// Last version seen
    #[arg(long, default_value_t = 0)]
    pub since: u64,

    /// Exit after this many updates
    #[arg(long)]
    pub count: Option<u64>,

    /// Delay before retrying a failed poll (milliseconds)
    #[arg(long, default_value_t = RETRY_DELAY.as_millis() as u64, hide = true)]
    pub retry_ms: u64,
}

/// Progress of one watching client
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Watcher {
    /// Highest version received
    pub version: u64,
    pub polls: u64,
    pub updates: u64,
    pub errors: u64,
}

/// What one poll amounted to
#[derive(Debug)]
pub enum Step {
    Update(StatusBody),
    NoChange,
    Failed(ClientError),
}

impl Watcher {
    pub fn new(since: u64) -> Self {
        Self {
            version: since,
            ..Self::default()
        }
    }

    /// Fold one poll result into the counters
    pub fn observe(&mut self, result: Result<PollOutcome, ClientError>) -> Step {
        self.polls += 1;
        match result {
            Ok(PollOutcome::Update(body)) if body.version > self.version => {
                self.version = body.version;
                self.updates += 1;
                Step::Update(body)
            }
            Ok(PollOutcome::Update(_)) | Ok(PollOutcome::NoChange) => Step::NoChange,
            Err(e) => {
                self.errors += 1;
                Step::Failed(e)
            }
        }
    }
}

/// Poll until `stop` is set or `on_update` returns false
///
/// A poll that ends without a change is reissued at once; a failed poll is
/// retried after `retry`.
pub fn watch_loop<F>(
    client: &HeraldClient,
    watcher: &mut Watcher,
    stop: &AtomicBool,
    retry: Duration,
    mut on_update: F,
) where
    F: FnMut(&Watcher, &StatusBody) -> bool,
{
    while !stop.load(Ordering::SeqCst) {
        match watcher.observe(client.poll(watcher.version)) {
            Step::Update(body) => {
                if !on_update(watcher, &body) {
                    break;
                }
            }
            Step::NoChange => {}
            Step::Failed(e) => {
                warn!(error = %e, retry_ms = retry.as_millis() as u64, "poll failed");
                sleep_unless_stopped(retry, stop);
            }
        }
    }
}

/// Sleep for `duration`, returning early once `stop` is set
///
/// A duration too large to represent as a deadline sleeps until stopped.
pub fn sleep_unless_stopped(duration: Duration, stop: &AtomicBool) {
    let deadline = Instant::now().checked_add(duration);
    while !stop.load(Ordering::SeqCst) {
        let remaining = match deadline {
            Some(deadline) => match deadline.checked_duration_since(Instant::now()) {
                Some(remaining) if !remaining.is_zero() => remaining,
                _ => break,
            },
            None => STOP_CHECK,
        };
        std::thread::sleep(STOP_CHECK.min(remaining));
    }
}

/// Install a Ctrl-C handler that sets the returned flag
///
/// A second Ctrl-C exits immediately instead of waiting for the poll in
/// flight.
pub fn stop_on_ctrlc() -> Result<Arc<AtomicBool>> {
    let stop = Arc::new(AtomicBool::new(false));
    let flag = stop.clone();
    ctrlc::set_handler(move || {
        if flag.swap(true, Ordering::SeqCst) {
            std::process::exit(130);
        }
        eprintln!("\nStopping after the current poll (Ctrl-C again to quit)...");
    })?;
    Ok(stop)
}

pub fn handle(client: &HeraldClient, args: WatchArgs, format: OutputFormat) -> Result<()> {
    let stop = stop_on_ctrlc()?;
    let mut watcher = Watcher::new(args.since);

    watch_loop(
        client,
        &mut watcher,
        &stop,
        Duration::from_millis(args.retry_ms),
        |watcher, body| {
            output::print(body, output::status_line(body), format);
            args.count.map_or(true, |count| watcher.updates < count)
        },
    );

    if format == OutputFormat::Text {
        eprintln!(
            "Watched {} polls, {} updates, {} errors (last version {})",
            watcher.polls, watcher.updates, watcher.errors, watcher.version
        );
    }
    Ok(())
}

#[cfg(test)]
#[path = "watch_tests.rs"]
mod tests;
