// Copyright 2026 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Registration, activation order, and snapshots on a detached tracker.
//!
//! Run:
//! - `cargo run -p sightline_demos --example tracker_basics`

use sightline_tracker::{ActiveState, Target, VisibilityTracker};

fn main() {
    let mut tracker: VisibilityTracker<u32> = VisibilityTracker::detached();

    let _sub = tracker.subscribe(|snapshot, changed| {
        println!(
            "changed={changed:?} active={:?} last_active={:?} current={:?}",
            snapshot.active,
            snapshot.last_active,
            snapshot.current()
        );
    });

    let mut first = tracker.register(Target::Handle(1));
    let _ = tracker.register(Target::Handle(2));
    let _ = tracker.register(Target::Handle(3));

    // Transitions normally come from an observer sweep; apply a batch directly.
    tracker.apply_events([(1, true), (2, true), (1, true), (2, false)]);

    println!("is_active(2) = {:?}", tracker.is_active(&2)); // Inactive
    println!("is_active(9) = {:?}", tracker.is_active(&9)); // Untracked

    // Handles unregister exactly once; the second release is a no-op.
    first.release(&mut tracker);
    first.release(&mut tracker);

    tracker.unregister_all();
    assert_eq!(tracker.is_active(&2), ActiveState::Untracked);
}
