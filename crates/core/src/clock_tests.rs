// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn system_clock_wall_time_is_recent() {
    let clock = SystemClock;
    let before = Utc::now();
    let stamped = clock.utc_now();
    assert!(stamped >= before);
}

#[test]
fn fake_clock_advances_both_readings() {
    let clock = FakeClock::new();
    let t1 = clock.now();
    let w1 = clock.utc_now();

    clock.advance(Duration::from_secs(30));

    assert_eq!(clock.now().duration_since(t1), Duration::from_secs(30));
    assert_eq!((clock.utc_now() - w1).num_seconds(), 30);
}

#[test]
fn fake_clock_clones_share_time() {
    let clock1 = FakeClock::new();
    let clock2 = clock1.clone();
    let t1 = clock1.now();
    clock2.advance(Duration::from_secs(5));
    assert_eq!(clock1.now().duration_since(t1), Duration::from_secs(5));
}

#[test]
fn fake_clock_does_not_move_on_its_own() {
    let clock = FakeClock::new();
    let t1 = clock.now();
    std::thread::sleep(Duration::from_millis(2));
    assert_eq!(clock.now(), t1);
}
