// Copyright 2026 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types for the tracker: targets, query results, handles, and the
//! collaborator traits.
//!
//! ## Overview
//!
//! These types describe the tracking protocol and its inputs/outputs.
//! They are referenced by the [`tracker`](crate::tracker) and implemented or
//! consumed by downstream toolkits.

use crate::tracker::VisibilityTracker;

/// How an item may be named when registering or unregistering.
///
/// The tracker works with opaque handles, but callers frequently hold a
/// string identifier instead. `Target` keeps the two paths explicit rather
/// than relying on runtime type inspection: the identifier path goes through
/// the [`ItemLookup`] collaborator, the handle path does not.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Target<'a, K> {
    /// A concrete item handle.
    Handle(K),
    /// A string identifier, resolved via [`ItemLookup`].
    Id(&'a str),
}

/// Answer to [`VisibilityTracker::is_active`](crate::tracker::VisibilityTracker::is_active).
///
/// Three-valued on purpose: a registered item that is not visible is
/// [`Inactive`](Self::Inactive), while an item the tracker has never been told
/// about is [`Untracked`](Self::Untracked). Callers must not conflate the two.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ActiveState {
    /// The item is registered and currently reported visible.
    Active,
    /// The item is registered but not currently visible.
    Inactive,
    /// The item is not in the registration set at all.
    Untracked,
}

impl ActiveState {
    /// Collapse to an optional boolean: `Some(true)` for active, `Some(false)`
    /// for confirmed inactive, `None` for untracked.
    pub fn known(self) -> Option<bool> {
        match self {
            Self::Active => Some(true),
            Self::Inactive => Some(false),
            Self::Untracked => None,
        }
    }
}

/// Deregistration handle returned by
/// [`VisibilityTracker::register`](crate::tracker::VisibilityTracker::register).
///
/// Calling [`release`](Self::release) unregisters the item exactly once;
/// every later call is a no-op. A handle returned from a failed or duplicate
/// registration starts out already released. Releasing after the tracker has
/// been cleared with `unregister_all` is harmless: unregistering an absent
/// handle is itself a safe no-op.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Registration<K> {
    item: Option<K>,
}

impl<K: Copy + Eq + core::fmt::Debug> Registration<K> {
    pub(crate) fn new(item: K) -> Self {
        Self { item: Some(item) }
    }

    /// A handle that does nothing when released.
    pub fn released() -> Self {
        Self { item: None }
    }

    /// The item this handle would unregister, if it has not been released yet.
    pub fn item(&self) -> Option<K> {
        self.item
    }

    /// True once the handle has been consumed (or never held an item).
    pub fn is_released(&self) -> bool {
        self.item.is_none()
    }

    /// Unregister the item from `tracker`. Idempotent.
    pub fn release<O, L>(&mut self, tracker: &mut VisibilityTracker<K, O, L>)
    where
        O: VisibilityObserver<K>,
        L: ItemLookup<K>,
    {
        if let Some(item) = self.item.take() {
            tracker.unregister(Target::Handle(item));
        }
    }
}

/// Identifier for a subscriber, returned by
/// [`VisibilityTracker::subscribe`](crate::tracker::VisibilityTracker::subscribe)
/// and accepted by
/// [`VisibilityTracker::unsubscribe`](crate::tracker::VisibilityTracker::unsubscribe).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct SubscriberId(pub(crate) u64);

/// The visibility-detection collaborator.
///
/// The tracker tells the observer which items to watch; the observer produces
/// batches of `(item, visible)` pairs on its own cadence (for example once
/// per frame or scroll tick), which the caller feeds back through
/// [`VisibilityTracker::apply_events`](crate::tracker::VisibilityTracker::apply_events).
/// How those batches are produced is entirely up to the implementation; see
/// `sightline_viewport` for a rectangle-intersection reference.
///
/// `Options` is an opaque configuration bundle handed to the tracker at
/// construction and passed through to [`observe`](Self::observe) unmodified.
pub trait VisibilityObserver<K> {
    /// Observer configuration, supplied once at tracker construction.
    type Options;

    /// Start watching `item`.
    fn observe(&mut self, item: &K, options: &Self::Options);

    /// Stop watching `item`.
    fn unobserve(&mut self, item: &K);

    /// Stop watching everything.
    fn disconnect(&mut self);
}

/// Resolve string identifiers to items and back.
///
/// Consulted only when [`Target::Id`] is used, and by the labeled tracker in
/// [`labels`](crate::labels) to require and derive display labels.
pub trait ItemLookup<K> {
    /// Return the item carrying `id`, if any.
    fn lookup_by_id(&self, id: &str) -> Option<K>;

    /// Return the identifier carried by `item`, if any.
    fn id_of(&self, item: &K) -> Option<&str>;
}

/// A visibility observer that never reports anything.
///
/// Used by [`VisibilityTracker::detached`](crate::tracker::VisibilityTracker::detached)
/// for environments without a detection mechanism: registration and queries
/// keep working, but no item ever becomes active.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoObserver;

impl<K> VisibilityObserver<K> for NoObserver {
    type Options = ();

    #[inline]
    fn observe(&mut self, _item: &K, _options: &()) {}

    #[inline]
    fn unobserve(&mut self, _item: &K) {}

    #[inline]
    fn disconnect(&mut self) {}
}

/// A lookup that resolves nothing. All identifier-path operations become
/// warn-and-no-op.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoLookup;

impl<K> ItemLookup<K> for NoLookup {
    #[inline]
    fn lookup_by_id(&self, _id: &str) -> Option<K> {
        None
    }

    #[inline]
    fn id_of(&self, _item: &K) -> Option<&str> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_state_known_mapping() {
        assert_eq!(ActiveState::Active.known(), Some(true));
        assert_eq!(ActiveState::Inactive.known(), Some(false));
        assert_eq!(ActiveState::Untracked.known(), None);
    }

    #[test]
    fn released_handle_holds_nothing() {
        let handle: Registration<u32> = Registration::released();
        assert!(handle.is_released());
        assert_eq!(handle.item(), None);
    }

    #[test]
    fn fresh_handle_exposes_item() {
        let handle = Registration::new(7_u32);
        assert!(!handle.is_released());
        assert_eq!(handle.item(), Some(7));
    }

    #[test]
    fn no_lookup_resolves_nothing() {
        let lookup = NoLookup;
        assert_eq!(ItemLookup::<u32>::lookup_by_id(&lookup, "nav"), None);
        assert_eq!(lookup.id_of(&3_u32), None);
    }
}
