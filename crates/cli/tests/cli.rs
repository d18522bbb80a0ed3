// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI integration tests against an in-process daemon

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(deprecated)]

mod common;

use std::time::Duration;

use assert_cmd::Command;
use common::{closed_server, TestServer};
use herald_core::TaskStatus;
use predicates::prelude::*;

fn herald(server: &TestServer) -> Command {
    let mut cmd = Command::cargo_bin("herald").unwrap();
    cmd.env_remove("HERALD_SERVER")
        .args(["--server", &server.url])
        .timeout(Duration::from_secs(30));
    cmd
}

#[test]
fn test_help_lists_commands() {
    Command::cargo_bin("herald")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("status"))
        .stdout(predicate::str::contains("poll"))
        .stdout(predicate::str::contains("watch"))
        .stdout(predicate::str::contains("update"))
        .stdout(predicate::str::contains("bench"));
}

#[test]
fn test_status_shows_initial_state() {
    let server = TestServer::start();

    herald(&server)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("pending (v0)"));
}

#[test]
fn test_status_json() {
    let server = TestServer::start();

    let output = herald(&server).args(["status", "--json"]).output().unwrap();
    assert!(output.status.success());

    let body: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(body["status"], "pending");
    assert_eq!(body["version"], 0);
    assert!(body["timestamp"].is_string());
}

#[test]
fn test_server_from_env() {
    let server = TestServer::start();

    Command::cargo_bin("herald")
        .unwrap()
        .env("HERALD_SERVER", &server.url)
        .arg("status")
        .timeout(Duration::from_secs(30))
        .assert()
        .success()
        .stdout(predicate::str::contains("(v0)"));
}

#[test]
fn test_update_publishes_new_version() {
    let server = TestServer::start();

    herald(&server)
        .args(["update", "completed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Status updated: completed (v1)"));

    let snapshot = server.hub.read();
    assert_eq!(snapshot.value, TaskStatus::Completed);
    assert_eq!(snapshot.version, 1);
}

#[test]
fn test_update_rejects_unknown_status_locally() {
    let server = TestServer::start();

    herald(&server)
        .args(["update", "done"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid status \"done\""))
        .stderr(predicate::str::contains("pending, in_progress, completed, failed"));

    assert_eq!(server.hub.read().version, 0);
}

#[test]
fn test_poll_returns_newer_version_immediately() {
    let server = TestServer::start();
    server.hub.update(TaskStatus::InProgress);
    server.hub.update(TaskStatus::Failed);

    herald(&server)
        .args(["poll", "--since", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("failed (v2)"));
}

#[test]
fn test_poll_reports_no_change_on_timeout() {
    let server = TestServer::with_max_wait(Duration::from_millis(200));

    herald(&server)
        .args(["poll", "--since", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("no change"));

    assert_eq!(server.hub.stats().timed_out, 1);
}

#[test]
fn test_poll_is_woken_by_update() {
    let server = TestServer::start();
    let hub = server.hub.clone();

    let updater = std::thread::spawn(move || {
        for _ in 0..2000 {
            if hub.waiter_count() == 1 {
                hub.update(TaskStatus::Completed);
                return;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
    });

    herald(&server)
        .args(["poll", "--since", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("completed (v1)"));

    updater.join().unwrap();
}

#[test]
fn test_watch_prints_each_update() {
    let server = TestServer::start();
    server.hub.update(TaskStatus::InProgress);

    let updater = std::thread::spawn({
        let hub = server.hub.clone();
        move || {
            // First poll answers at once with v1; the second one is held
            for _ in 0..2000 {
                if hub.waiter_count() == 1 {
                    hub.update(TaskStatus::Completed);
                    return;
                }
                std::thread::sleep(Duration::from_millis(5));
            }
        }
    });

    herald(&server)
        .args(["watch", "--since", "0", "--count", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("in_progress (v1)"))
        .stdout(predicate::str::contains("completed (v2)"));

    updater.join().unwrap();
}

#[test]
fn test_health_reports_counters() {
    let server = TestServer::start();
    server.hub.update(TaskStatus::Completed);

    let output = herald(&server).args(["health", "--json"]).output().unwrap();
    assert!(output.status.success());

    let body: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["hub"]["version"], 1);
    assert_eq!(body["hub"]["updates"], 1);
}

#[test]
fn test_bench_all_clients_reach_final_version() {
    let server = TestServer::start();

    let output = herald(&server)
        .args([
            "bench",
            "--clients",
            "3",
            "--updates",
            "4",
            "--interval-ms",
            "50",
            "--json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success(), "{:?}", output);

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["updates_sent"], 4);
    assert_eq!(report["final_version"], 4);
    let clients = report["clients"].as_array().unwrap();
    assert_eq!(clients.len(), 3);
    for client in clients {
        assert_eq!(client["version"], 4);
        assert!(client["updates"].as_u64().unwrap() >= 1);
    }
    assert_eq!(server.hub.read().version, 4);
}

#[test]
fn test_bench_without_updates_returns_promptly() {
    let server = TestServer::start();

    let output = herald(&server)
        .args([
            "bench",
            "--clients",
            "2",
            "--updates",
            "0",
            "--interval-ms",
            "10",
            "--settle-ms",
            "100",
            "--json",
        ])
        .timeout(Duration::from_secs(10))
        .output()
        .unwrap();
    assert!(output.status.success(), "{:?}", output);

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["updates_sent"], 0);
    for client in report["clients"].as_array().unwrap() {
        assert_eq!(client["polls"], 0);
        assert_eq!(client["version"], 0);
    }
    assert_eq!(server.hub.waiter_count(), 0);
}

#[test]
fn test_bench_accepts_huge_settle_window() {
    let server = TestServer::start();

    herald(&server)
        .args([
            "bench",
            "--clients",
            "1",
            "--updates",
            "1",
            "--interval-ms",
            "10",
            "--settle-ms",
            &u64::MAX.to_string(),
        ])
        .timeout(Duration::from_secs(10))
        .assert()
        .success()
        .stdout(predicate::str::contains("1/1 clients reached final version 1"));
}

#[test]
fn test_unreachable_server_suggests_fix() {
    Command::cargo_bin("herald")
        .unwrap()
        .args(["--server", &closed_server(), "status"])
        .timeout(Duration::from_secs(30))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not reach herald server"))
        .stderr(predicate::str::contains("heraldd"));
}
