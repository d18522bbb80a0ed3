// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::clock::{Clock, FakeClock};
use crate::status::TaskStatus;
use crate::waiter::WaiterId;

#[test]
fn every_waiter_gets_the_same_snapshot() {
    let clock = FakeClock::new();
    let mut state = VersionedState::new(TaskStatus::Pending, clock.utc_now());
    let mut registry = WaiterRegistry::new();
    let mut receivers = Vec::new();
    for i in 0..4 {
        let (waiter, rx) = Waiter::new(WaiterId(i), 0, clock.now());
        registry.insert(waiter);
        receivers.push(rx);
    }

    state.update(TaskStatus::InProgress, clock.utc_now());
    let broadcast = Broadcast::collect(&state, &mut registry);
    assert_eq!(broadcast.len(), 4);
    assert!(registry.is_empty());

    assert_eq!(broadcast.deliver(), 4);

    let expected = state.read();
    for mut rx in receivers {
        assert_eq!(rx.try_recv().unwrap(), Resolution::Fulfilled(expected.clone()));
    }
}

#[test]
fn deliver_skips_departed_waiters() {
    let clock = FakeClock::new();
    let state = VersionedState::new(TaskStatus::Pending, clock.utc_now());
    let mut registry = WaiterRegistry::new();

    let (gone, gone_rx) = Waiter::new(WaiterId(1), 0, clock.now());
    let (kept, mut kept_rx) = Waiter::new(WaiterId(2), 0, clock.now());
    registry.insert(gone);
    registry.insert(kept);
    drop(gone_rx);

    let broadcast = Broadcast::collect(&state, &mut registry);
    assert_eq!(broadcast.deliver(), 1);
    assert!(matches!(kept_rx.try_recv(), Ok(Resolution::Fulfilled(_))));
}

#[test]
fn empty_broadcast_delivers_nothing() {
    let clock = FakeClock::new();
    let state = VersionedState::new(TaskStatus::Pending, clock.utc_now());
    let mut registry = WaiterRegistry::new();

    let broadcast = Broadcast::collect(&state, &mut registry);
    assert!(broadcast.is_empty());
    assert_eq!(broadcast.deliver(), 0);
}
