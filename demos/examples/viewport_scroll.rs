// Copyright 2026 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scrolling a viewport over a long list of rows and tracking which are visible.
//!
//! Run:
//! - `cargo run -p sightline_demos --example viewport_scroll`

use kurbo::Rect;
use sightline_tracker::{NoLookup, Target, VisibilityTracker};
use sightline_viewport::{ViewportObserver, ViewportOptions};

const ROW_H: f64 = 20.0;
const WIDTH: f64 = 200.0;

fn main() {
    let rows = 1000_u32;
    let observer = ViewportObserver::new(Rect::new(0.0, 0.0, WIDTH, 100.0));
    let mut tracker = VisibilityTracker::new(observer, NoLookup, ViewportOptions::default());

    for i in 0..rows {
        let y0 = f64::from(i) * ROW_H;
        tracker
            .observer_mut()
            .set_bounds(i, Rect::new(0.0, y0, WIDTH, y0 + ROW_H));
        let _ = tracker.register(Target::Handle(i));
    }

    // Simulate a few scroll positions by moving the viewport rectangle.
    for scroll in [0.0, 30.0, 200.0, 600.0] {
        tracker
            .observer_mut()
            .set_viewport(Rect::new(0.0, scroll, WIDTH, scroll + 100.0));
        let batch = tracker.observer_mut().sweep();
        tracker.apply_events(batch);
        println!(
            "scroll={scroll:.1} -> active rows: {:?}, current: {:?}, last_active: {:?}",
            tracker.active(),
            tracker.current(),
            tracker.last_active()
        );
    }
}
