// Copyright 2026 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Immutable state snapshots delivered to subscribers, plus the coarse
//! change summary attached to each notification.

use alloc::vec::Vec;

use crate::types::ActiveState;

bitflags::bitflags! {
    /// Which parts of the tracker state a notification covers.
    ///
    /// Delivered alongside each [`TrackerSnapshot`] so subscribers can skip
    /// work when the part they care about did not change. A notification with
    /// empty flags is still a valid snapshot (for example the initial delivery
    /// on subscribe, or an unregister of a handle that was never registered).
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ChangeFlags: u8 {
        /// The registration set changed.
        const REGISTRATIONS = 0b0000_0001;
        /// The active set changed (membership or recency order).
        const ACTIVE        = 0b0000_0010;
        /// The last-active pointer changed.
        const LAST_ACTIVE   = 0b0000_0100;
    }
}

/// A point-in-time copy of tracker state.
///
/// Snapshots own their data: mutating the tracker after taking one does not
/// affect it, and nothing a subscriber does to a snapshot can corrupt the
/// tracker. Derived facts (the current item, per-item state) are computed on
/// demand rather than stored, so they can never diverge from the sets.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TrackerSnapshot<K> {
    /// Registered items, in registration order.
    pub registered: Vec<K>,
    /// Active items, ordered by most recent transition into active (last is
    /// the most recent).
    pub active: Vec<K>,
    /// The item that most recently became active, whether or not it still is.
    pub last_active: Option<K>,
}

impl<K> Default for TrackerSnapshot<K> {
    fn default() -> Self {
        Self {
            registered: Vec::new(),
            active: Vec::new(),
            last_active: None,
        }
    }
}

impl<K: Copy + Eq> TrackerSnapshot<K> {
    /// Number of registered items.
    pub fn len(&self) -> usize {
        self.registered.len()
    }

    /// True if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.registered.is_empty()
    }

    /// The most recently activated item that is *still* active.
    ///
    /// Distinct from [`last_active`](Self::last_active): when the most recent
    /// activation has since deactivated, `current` moves back to the next
    /// most recent still-active item (or `None`) while `last_active` keeps
    /// pointing at the deactivated one.
    pub fn current(&self) -> Option<K> {
        self.active.last().copied()
    }

    /// Three-valued visibility query; see [`ActiveState`].
    pub fn is_active(&self, item: &K) -> ActiveState {
        if !self.registered.contains(item) {
            ActiveState::Untracked
        } else if self.active.contains(item) {
            ActiveState::Active
        } else {
            ActiveState::Inactive
        }
    }
}
