// Copyright 2026 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=sightline_tracker --heading-base-level=0

//! Sightline Tracker: ordered, `no_std` visibility tracking over opaque item handles.
//!
//! ## Overview
//!
//! This crate answers three questions about a dynamically registered set of items:
//! which items are being watched, which are currently visible ("active"), and which
//! item most recently became visible — whether or not it still is.
//! It does not detect visibility itself.
//! Instead, a [`VisibilityObserver`](crate::types::VisibilityObserver) collaborator reports
//! `(item, visible)` transitions (for example from viewport rectangle intersection — see the
//! `sightline_viewport` crate), and the tracker maintains the bookkeeping:
//!
//! - the registration set, in insertion order, duplicate-free;
//! - the active set, a subset of the registration set ordered by most recent activation;
//! - the last-active pointer, which survives deactivation and is cleared only when its item
//!   is unregistered.
//!
//! ## Ordering
//!
//! Activating item `A` then `B` yields an active set of `[A, B]`; re-activating `A` moves it
//! to the most-recent end, `[B, A]`. The registration set never reorders on visibility
//! changes or on removal of other items.
//!
//! ## Targets and lookups
//!
//! [`register`](crate::tracker::VisibilityTracker::register) and
//! [`unregister`](crate::tracker::VisibilityTracker::unregister) accept a
//! [`Target`](crate::types::Target): either a concrete handle or a string identifier
//! resolved through the [`ItemLookup`](crate::types::ItemLookup) collaborator.
//! Unregistering by an identifier that matches several registered items removes all of them
//! (ambiguity does not block cleanup).
//!
//! ## Failure semantics
//!
//! No tracking misuse returns an error or panics. Unresolvable identifiers, duplicate
//! registrations, and unknown handles degrade to a `log::warn!` plus a no-op, and the
//! three-valued [`ActiveState`](crate::types::ActiveState) query distinguishes "confirmed
//! inactive" from "never registered". Without a detection mechanism, construct with
//! [`VisibilityTracker::detached`](crate::tracker::VisibilityTracker::detached):
//! everything works, nothing ever becomes active.
//!
//! ## Minimal example
//!
//! ```
//! use sightline_tracker::{ActiveState, Target, VisibilityTracker};
//!
//! let mut tracker: VisibilityTracker<u32> = VisibilityTracker::detached();
//! let _a = tracker.register(Target::Handle(1));
//! let _b = tracker.register(Target::Handle(2));
//!
//! // Transitions normally come from an observer; apply them directly here.
//! tracker.apply_events([(1, true), (2, true), (1, false)]);
//!
//! assert_eq!(tracker.active(), &[2]);
//! assert_eq!(tracker.last_active(), Some(2));
//! assert_eq!(tracker.is_active(&1), ActiveState::Inactive);
//! assert_eq!(tracker.is_active(&3), ActiveState::Untracked);
//! ```
//!
//! ## Subscriptions
//!
//! [`subscribe`](crate::tracker::VisibilityTracker::subscribe) delivers an owned,
//! immutable [`TrackerSnapshot`](crate::snapshot::TrackerSnapshot) immediately and after
//! every mutation, tagged with coarse [`ChangeFlags`](crate::snapshot::ChangeFlags), in
//! the exact order transitions are applied:
//!
//! ```
//! use sightline_tracker::{Target, VisibilityTracker};
//!
//! let mut tracker: VisibilityTracker<u32> = VisibilityTracker::detached();
//! let sub = tracker.subscribe(|snapshot, changed| {
//!     let _ = (snapshot.current(), changed);
//! });
//! let _ = tracker.register(Target::Handle(1));
//! tracker.unsubscribe(sub);
//! ```
//!
//! ## Labels
//!
//! [`LabeledTracker`](crate::labels::LabeledTracker) wraps a tracker to require an
//! identifier on every item and stamp a display label derived from it
//! (`"intro-section"` → `"Intro Section"`), delegating everything else unchanged.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod labels;
pub mod snapshot;
pub mod tracker;
pub mod types;

pub use labels::{LabeledTracker, display_label};
pub use snapshot::{ChangeFlags, TrackerSnapshot};
pub use tracker::VisibilityTracker;
pub use types::{
    ActiveState, ItemLookup, NoLookup, NoObserver, Registration, SubscriberId, Target,
    VisibilityObserver,
};
