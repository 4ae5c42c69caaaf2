// Copyright 2026 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=sightline_viewport --heading-base-level=0

//! Sightline Viewport: a Kurbo-native visibility observer for the Sightline tracker.
//!
//! ## Overview
//!
//! This crate is a reference implementation of the tracker's
//! [`VisibilityObserver`](sightline_tracker::VisibilityObserver) seam.
//! It watches axis-aligned item bounds and reports, per sweep, which watched items
//! intersect a viewport rectangle:
//!
//! - The viewport may be expanded (or shrunk) by a margin before testing, so items can
//!   report visible shortly before they scroll in.
//! - A threshold sets what fraction of an item's own area must overlap before it counts
//!   as visible; zero means any positive overlap.
//! - [`ViewportObserver::sweep`] is polled by the caller (per frame or scroll tick) and
//!   returns only the transitions since the previous sweep, in watch order, ready to feed
//!   into the tracker's `apply_events`.
//!
//! Geometry is caller-owned: supply world-space bounds with
//! [`ViewportObserver::set_bounds`] from whatever layout system you use. This crate does
//! no layout and no rendering.
//!
//! ## Example
//!
//! ```
//! use kurbo::Rect;
//! use sightline_tracker::{NoLookup, Target, VisibilityTracker};
//! use sightline_viewport::{ViewportObserver, ViewportOptions};
//!
//! let observer = ViewportObserver::new(Rect::new(0.0, 0.0, 200.0, 100.0));
//! let mut tracker = VisibilityTracker::new(observer, NoLookup, ViewportOptions::default());
//!
//! for (item, y) in [(0_u32, 0.0), (1, 40.0), (2, 120.0)] {
//!     tracker.observer_mut().set_bounds(item, Rect::new(0.0, y, 200.0, y + 30.0));
//!     let _ = tracker.register(Target::Handle(item));
//! }
//!
//! let batch = tracker.observer_mut().sweep();
//! tracker.apply_events(batch);
//! assert_eq!(tracker.active(), &[0, 1]);
//!
//! // Scroll down: row 0 leaves, row 2 enters.
//! tracker.observer_mut().set_viewport(Rect::new(0.0, 60.0, 200.0, 160.0));
//! let batch = tracker.observer_mut().sweep();
//! tracker.apply_events(batch);
//! assert_eq!(tracker.active(), &[1, 2]);
//! assert_eq!(tracker.last_active(), Some(2));
//! ```
//!
//! This crate is `no_std`-capable; the default `std` feature forwards to Kurbo, and the
//! `libm` feature supports `no_std` builds.

#![no_std]

extern crate alloc;

pub mod observer;
pub mod types;

pub use observer::ViewportObserver;
pub use types::ViewportOptions;
