// Copyright 2026 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Identifier-based registration with derived display labels.
//!
//! Run with warnings visible:
//! - `RUST_LOG=warn cargo run -p sightline_demos --example labeled_sections`

use sightline_tracker::{ItemLookup, LabeledTracker, NoObserver, Target, VisibilityTracker};

/// A toy page: section handles with string identifiers.
struct Page {
    sections: Vec<(String, u32)>,
}

impl ItemLookup<u32> for Page {
    fn lookup_by_id(&self, id: &str) -> Option<u32> {
        self.sections
            .iter()
            .find(|(i, _)| i == id)
            .map(|(_, item)| *item)
    }

    fn id_of(&self, item: &u32) -> Option<&str> {
        self.sections
            .iter()
            .find(|(_, i)| i == item)
            .map(|(id, _)| id.as_str())
    }
}

fn main() {
    env_logger::init();

    let page = Page {
        sections: vec![
            ("intro-section".into(), 1),
            ("getting-started".into(), 2),
            ("api-reference".into(), 3),
        ],
    };
    let mut tracker = LabeledTracker::new(VisibilityTracker::new(NoObserver, page, ()));

    let _ = tracker.register(Target::Id("intro-section"), None);
    let _ = tracker.register(Target::Id("getting-started"), None);
    let _ = tracker.register(Target::Id("api-reference"), Some("API"));

    // Soft failures: each warns and mutates nothing.
    let _ = tracker.register(Target::Id("missing-section"), None);
    let _ = tracker.register(Target::Handle(1), None); // duplicate
    let _ = tracker.register(Target::Handle(99), None); // no identifier

    for (item, label) in tracker.labels() {
        println!("{item}: {label}");
    }

    tracker.tracker_mut().visibility_changed(2, true);
    let current = tracker.tracker().current().expect("one section is active");
    println!(
        "current section: {}",
        tracker.label_of(&current).unwrap_or("?")
    );
}
