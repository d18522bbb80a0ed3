// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

//! Integration tests for the long-poll protocol
//!
//! Several clients follow a stream of updates through the public API, with a
//! live reaper running alongside.

use herald_core::{parse_baseline, Hub, HubConfig, Reaper, Resolution, SystemClock, TaskStatus};
use std::time::Duration;

type StatusHub = Hub<TaskStatus, SystemClock>;

fn hub(max_wait: Duration) -> StatusHub {
    Hub::new(
        TaskStatus::Pending,
        HubConfig::with_max_wait(max_wait),
        SystemClock,
    )
}

/// Follow updates until `target` is reached, returning every version seen
async fn follow(hub: StatusHub, target: u64) -> Vec<u64> {
    let mut seen = Vec::new();
    let mut version = 0;
    while version < target {
        match hub.wait(version).await {
            Resolution::Fulfilled(snapshot) => {
                version = snapshot.version;
                seen.push(version);
            }
            Resolution::TimedOut => continue,
            Resolution::Cancelled => break,
        }
    }
    seen
}

// =============================================================================
// Multi-client follow
// =============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn every_client_reaches_final_version() {
    let hub = hub(Duration::from_millis(200));
    let reaper = Reaper::start(hub.clone());
    let updates = 20;

    let clients: Vec<_> = (0..5)
        .map(|_| tokio::spawn(follow(hub.clone(), updates)))
        .collect();

    let mut status = TaskStatus::Pending;
    for _ in 0..updates {
        status = status.next();
        hub.update(status);
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    for client in clients {
        let seen = tokio::time::timeout(Duration::from_secs(10), client)
            .await
            .expect("client did not finish")
            .unwrap();
        assert_eq!(seen.last(), Some(&updates));
        assert!(seen.windows(2).all(|w| w[0] < w[1]), "{:?}", seen);
    }

    assert_eq!(hub.waiter_count(), 0);
    reaper.shutdown().await;
}

#[tokio::test]
async fn idle_clients_time_out_and_resume() {
    let hub = hub(Duration::from_millis(60));
    let reaper = Reaper::start(hub.clone());

    assert_eq!(hub.wait(0).await, Resolution::TimedOut);
    assert_eq!(hub.waiter_count(), 0);

    let waiting = tokio::spawn({
        let hub = hub.clone();
        async move { follow(hub, 1).await }
    });
    tokio::time::sleep(Duration::from_millis(150)).await;
    hub.update(TaskStatus::Completed);

    let seen = waiting.await.unwrap();
    assert_eq!(seen, vec![1]);

    let stats = hub.stats();
    assert!(stats.timed_out >= 2, "{:?}", stats);
    assert_eq!(stats.updates, 1);
    reaper.shutdown().await;
}

// =============================================================================
// Baselines from the wire
// =============================================================================

#[tokio::test]
async fn malformed_baseline_gets_current_state() {
    let hub = hub(Duration::from_secs(30));
    hub.update(TaskStatus::InProgress);

    for raw in [Some("garbage"), Some(""), None, Some("-3")] {
        match hub.wait(parse_baseline(raw)).await {
            Resolution::Fulfilled(snapshot) => {
                assert_eq!(snapshot.version, 1);
                assert_eq!(snapshot.value, TaskStatus::InProgress);
            }
            other => panic!("unexpected {:?} for {:?}", other, raw),
        }
    }
}

#[tokio::test]
async fn close_releases_followers() {
    let hub = hub(Duration::from_secs(30));
    let follower = tokio::spawn(follow(hub.clone(), 5));

    for _ in 0..1000 {
        if hub.waiter_count() == 1 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    assert_eq!(hub.close(), 1);

    let seen = follower.await.unwrap();
    assert!(seen.is_empty());
}
