// Copyright 2026 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracker implementation.
//!
//! ## Overview
//!
//! [`VisibilityTracker`] owns three structures and keeps them consistent as
//! items are registered, unregistered, and reported visible or not:
//!
//! - the registration set: insertion-ordered, duplicate-free;
//! - the active set: a subset of the registration set, ordered by most
//!   recent transition into active;
//! - the last-active pointer: the item that most recently became active,
//!   regardless of whether it still is.
//!
//! ## Update protocol
//!
//! - Registering appends, starts observation, and notifies.
//! - A visibility event moves the item to the most-recent end of the active
//!   set (activation) or drops it (deactivation); activation also stamps the
//!   last-active pointer. Deactivation never clears last-active.
//! - Unregistering cascades: observation stops, active membership is dropped,
//!   last-active is cleared if it pointed at the removed item.
//!
//! ## Failure semantics
//!
//! Nothing here returns an error or panics for misuse. Invalid input degrades
//! to a `log::warn!` plus a no-op; stale events for unregistered items are
//! dropped with a `log::debug!`. The three-valued
//! [`is_active`](VisibilityTracker::is_active) query and the idempotent
//! handles give callers what they need to stay correct.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt::Debug;

use log::{debug, warn};

use crate::snapshot::{ChangeFlags, TrackerSnapshot};
use crate::types::{
    ActiveState, ItemLookup, NoLookup, NoObserver, Registration, SubscriberId, Target,
    VisibilityObserver,
};

type SubscriberFn<K> = Box<dyn FnMut(&TrackerSnapshot<K>, ChangeFlags)>;

struct Subscriber<K> {
    id: SubscriberId,
    callback: SubscriberFn<K>,
}

/// Ordered visibility tracker over opaque item handles.
///
/// ## Usage
///
/// - Construct with [`VisibilityTracker::new`], supplying the
///   visibility-detection collaborator, the identifier lookup, and the
///   observer options (passed through to every
///   [`observe`](crate::types::VisibilityObserver::observe) unmodified), or
///   with [`VisibilityTracker::detached`] when the environment has no
///   detection mechanism.
/// - Register items (by handle or identifier) with
///   [`register`](Self::register); keep or discard the returned
///   [`Registration`] handle.
/// - Feed collaborator batches through [`apply_events`](Self::apply_events).
/// - Query with [`is_active`](Self::is_active) and the slice accessors, or
///   subscribe for push-based snapshots with [`subscribe`](Self::subscribe).
///
/// All mutation is synchronous and single-threaded; subscribers receive
/// notifications in the exact order state transitions are applied.
pub struct VisibilityTracker<K, O = NoObserver, L = NoLookup>
where
    O: VisibilityObserver<K>,
    L: ItemLookup<K>,
{
    registered: Vec<K>,
    active: Vec<K>,
    last_active: Option<K>,
    observer: O,
    options: O::Options,
    lookup: L,
    subscribers: Vec<Subscriber<K>>,
    next_subscriber: u64,
}

impl<K, O, L> Debug for VisibilityTracker<K, O, L>
where
    K: Debug,
    O: VisibilityObserver<K>,
    L: ItemLookup<K>,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("VisibilityTracker")
            .field("registered", &self.registered)
            .field("active", &self.active)
            .field("last_active", &self.last_active)
            .field("subscribers", &self.subscribers.len())
            .finish_non_exhaustive()
    }
}

impl<K: Copy + Eq + Debug> VisibilityTracker<K> {
    /// Create a tracker with no detection mechanism and no identifier lookup.
    ///
    /// Degraded but functional: registration, unregistration, queries, and
    /// subscriptions all behave normally, but no item ever becomes active and
    /// identifier targets never resolve.
    pub fn detached() -> Self {
        Self::new(NoObserver, NoLookup, ())
    }
}

impl<K, O, L> VisibilityTracker<K, O, L>
where
    K: Copy + Eq + Debug,
    O: VisibilityObserver<K>,
    L: ItemLookup<K>,
{
    /// Create a tracker wired to `observer` and `lookup`.
    ///
    /// `options` is the observer configuration; the tracker does not
    /// interpret it, it only forwards it on each
    /// [`observe`](crate::types::VisibilityObserver::observe).
    pub fn new(observer: O, lookup: L, options: O::Options) -> Self {
        Self {
            registered: Vec::new(),
            active: Vec::new(),
            last_active: None,
            observer,
            options,
            lookup,
            subscribers: Vec::new(),
            next_subscriber: 0,
        }
    }

    /// The visibility-detection collaborator.
    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Mutable access to the collaborator, e.g. to drive a polled observer.
    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    /// The identifier-resolution collaborator.
    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    /// The observer options supplied at construction.
    pub fn options(&self) -> &O::Options {
        &self.options
    }

    /// Register a target for visibility tracking.
    ///
    /// On success the item is appended to the registration set, handed to the
    /// observer, and one notification is emitted; the returned handle
    /// unregisters it once when released.
    ///
    /// Soft failures return an already-released handle and mutate nothing:
    /// an identifier that resolves to no item, or an item that is already
    /// registered (duplicate registration is a diagnostic, not an error).
    pub fn register(&mut self, target: Target<'_, K>) -> Registration<K> {
        let item = match target {
            Target::Handle(item) => item,
            Target::Id(id) => match self.lookup.lookup_by_id(id) {
                Some(item) => item,
                None => {
                    warn!("register: no item found for id {id:?}");
                    return Registration::released();
                }
            },
        };
        if self.registered.contains(&item) {
            warn!("register: item {item:?} is already registered");
            return Registration::released();
        }
        self.registered.push(item);
        self.observer.observe(&item, &self.options);
        self.notify(ChangeFlags::REGISTRATIONS);
        Registration::new(item)
    }

    /// Unregister a target.
    ///
    /// The identifier path resolves against the *registered* items' own
    /// identifiers: zero matches is a warn-and-no-op; more than one match is
    /// warned as ambiguous and then all matches are removed (ambiguity does
    /// not block cleanup). The handle path proceeds unconditionally, which is
    /// a safe no-op when the item was never registered.
    ///
    /// Exactly one notification is emitted per call, after all resolved items
    /// are processed.
    pub fn unregister(&mut self, target: Target<'_, K>) {
        let mut resolved: Vec<K> = Vec::new();
        match target {
            Target::Handle(item) => resolved.push(item),
            Target::Id(id) => {
                for &item in &self.registered {
                    if self.lookup.id_of(&item) == Some(id) {
                        resolved.push(item);
                    }
                }
                if resolved.is_empty() {
                    warn!("unregister: no registered item has id {id:?}");
                    return;
                }
                if resolved.len() > 1 {
                    warn!(
                        "unregister: id {id:?} matches {} registered items; removing all",
                        resolved.len()
                    );
                }
            }
        }
        let mut changed = ChangeFlags::empty();
        for item in resolved {
            changed |= self.remove_item(item);
        }
        self.notify(changed);
    }

    /// Unregister everything: disconnect the observer, clear all three
    /// structures, emit one notification. Always succeeds.
    pub fn unregister_all(&mut self) {
        self.observer.disconnect();
        self.registered.clear();
        self.active.clear();
        self.last_active = None;
        self.notify(ChangeFlags::all());
    }

    fn remove_item(&mut self, item: K) -> ChangeFlags {
        let mut changed = ChangeFlags::empty();
        self.observer.unobserve(&item);
        if let Some(pos) = self.active.iter().position(|a| *a == item) {
            self.active.remove(pos);
            changed |= ChangeFlags::ACTIVE;
        }
        if self.last_active == Some(item) {
            self.last_active = None;
            changed |= ChangeFlags::LAST_ACTIVE;
        }
        if let Some(pos) = self.registered.iter().position(|r| *r == item) {
            self.registered.remove(pos);
            changed |= ChangeFlags::REGISTRATIONS;
        }
        changed
    }

    /// Apply one visibility transition reported by the observer.
    ///
    /// Activation moves `item` to the most-recent end of the active set
    /// (re-activation reorders to "now") and stamps the last-active pointer
    /// unconditionally. Deactivation removes `item` from the active set if
    /// present; the last-active pointer is deliberately left alone.
    ///
    /// Events for items no longer registered are dropped: the active set must
    /// stay a subset of the registration set, and an unregister that raced a
    /// pending report must not resurrect the item.
    ///
    /// Emits one notification per processed event.
    pub fn visibility_changed(&mut self, item: K, is_visible: bool) {
        if !self.registered.contains(&item) {
            debug!("visibility event for untracked item {item:?} dropped");
            return;
        }
        let mut changed = ChangeFlags::empty();
        if is_visible {
            if let Some(pos) = self.active.iter().position(|a| *a == item) {
                self.active.remove(pos);
            }
            self.active.push(item);
            changed |= ChangeFlags::ACTIVE;
            if self.last_active != Some(item) {
                changed |= ChangeFlags::LAST_ACTIVE;
            }
            self.last_active = Some(item);
        } else if let Some(pos) = self.active.iter().position(|a| *a == item) {
            self.active.remove(pos);
            changed |= ChangeFlags::ACTIVE;
        }
        self.notify(changed);
    }

    /// Apply a batch of transitions in delivery order, one notification per
    /// event.
    pub fn apply_events<I>(&mut self, events: I)
    where
        I: IntoIterator<Item = (K, bool)>,
    {
        for (item, is_visible) in events {
            self.visibility_changed(item, is_visible);
        }
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

    /// Number of registered items.
    pub fn len(&self) -> usize {
        self.registered.len()
    }

    /// True if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.registered.is_empty()
    }

    /// Registered items in registration order.
    pub fn registered(&self) -> &[K] {
        &self.registered
    }

    /// Active items ordered by most recent activation (last is most recent).
    pub fn active(&self) -> &[K] {
        &self.active
    }

    /// The item that most recently became active, active or not.
    pub fn last_active(&self) -> Option<K> {
        self.last_active
    }

    /// The most recently activated item that is still active.
    pub fn current(&self) -> Option<K> {
        self.active.last().copied()
    }

    /// An owned point-in-time copy of the tracker state.
    pub fn snapshot(&self) -> TrackerSnapshot<K> {
        TrackerSnapshot {
            registered: self.registered.clone(),
            active: self.active.clone(),
            last_active: self.last_active,
        }
    }

    /// Subscribe to state changes.
    ///
    /// `callback` is invoked immediately with the current snapshot (and empty
    /// change flags), then again after every mutation, in mutation order.
    /// Returns an id for [`unsubscribe`](Self::unsubscribe).
    pub fn subscribe<F>(&mut self, mut callback: F) -> SubscriberId
    where
        F: FnMut(&TrackerSnapshot<K>, ChangeFlags) + 'static,
    {
        let id = SubscriberId(self.next_subscriber);
        self.next_subscriber += 1;
        let snapshot = self.snapshot();
        callback(&snapshot, ChangeFlags::empty());
        self.subscribers.push(Subscriber {
            id,
            callback: Box::new(callback),
        });
        id
    }

    /// Remove a subscriber. Unknown or already-removed ids are a no-op.
    pub fn unsubscribe(&mut self, id: SubscriberId) {
        self.subscribers.retain(|s| s.id != id);
    }

    fn notify(&mut self, changed: ChangeFlags) {
        if self.subscribers.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        for sub in &mut self.subscribers {
            (sub.callback)(&snapshot, changed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    /// Observer that records which items it was asked to watch.
    #[derive(Default)]
    struct RecordingObserver {
        watched: Vec<u32>,
        disconnects: usize,
    }

    impl VisibilityObserver<u32> for RecordingObserver {
        type Options = ();

        fn observe(&mut self, item: &u32, _options: &()) {
            self.watched.push(*item);
        }

        fn unobserve(&mut self, item: &u32) {
            self.watched.retain(|w| w != item);
        }

        fn disconnect(&mut self) {
            self.watched.clear();
            self.disconnects += 1;
        }
    }

    /// Lookup backed by a plain list; duplicate ids are allowed so the
    /// ambiguous-unregister path can be exercised.
    struct ListLookup {
        entries: Vec<(String, u32)>,
    }

    impl ListLookup {
        fn new(entries: &[(&str, u32)]) -> Self {
            Self {
                entries: entries
                    .iter()
                    .map(|(id, item)| (String::from(*id), *item))
                    .collect(),
            }
        }
    }

    impl ItemLookup<u32> for ListLookup {
        fn lookup_by_id(&self, id: &str) -> Option<u32> {
            self.entries
                .iter()
                .find(|(i, _)| i == id)
                .map(|(_, item)| *item)
        }

        fn id_of(&self, item: &u32) -> Option<&str> {
            self.entries
                .iter()
                .find(|(_, i)| i == item)
                .map(|(id, _)| id.as_str())
        }
    }

    fn tracker_with(
        entries: &[(&str, u32)],
    ) -> VisibilityTracker<u32, RecordingObserver, ListLookup> {
        VisibilityTracker::new(RecordingObserver::default(), ListLookup::new(entries), ())
    }

    #[test]
    fn registration_preserves_call_order() {
        let mut t = tracker_with(&[]);
        for item in [5_u32, 3, 9, 1] {
            let _ = t.register(Target::Handle(item));
        }
        assert_eq!(t.registered(), &[5, 3, 9, 1]);
        assert_eq!(t.len(), 4);
        assert_eq!(t.observer().watched, vec![5, 3, 9, 1]);
    }

    #[test]
    fn duplicate_registration_is_a_noop() {
        let mut t = tracker_with(&[]);
        let first = t.register(Target::Handle(1));
        let second = t.register(Target::Handle(1));
        assert!(!first.is_released());
        assert!(second.is_released());
        assert_eq!(t.registered(), &[1]);
        assert_eq!(t.observer().watched, vec![1]);
    }

    #[test]
    fn register_by_id_resolves_through_lookup() {
        let mut t = tracker_with(&[("intro", 1), ("outro", 2)]);
        let handle = t.register(Target::Id("outro"));
        assert_eq!(handle.item(), Some(2));
        assert_eq!(t.registered(), &[2]);
    }

    #[test]
    fn register_unresolvable_id_is_a_noop() {
        let mut t = tracker_with(&[("intro", 1)]);
        let handle = t.register(Target::Id("missing"));
        assert!(handle.is_released());
        assert!(t.is_empty());
    }

    #[test]
    fn activation_orders_by_recency() {
        let mut t = tracker_with(&[]);
        let _ = t.register(Target::Handle(1));
        let _ = t.register(Target::Handle(2));
        t.visibility_changed(1, true);
        t.visibility_changed(2, true);
        assert_eq!(t.active(), &[1, 2]);
        // Re-activating 1 reorders it to most recent.
        t.visibility_changed(1, true);
        assert_eq!(t.active(), &[2, 1]);
        assert_eq!(t.last_active(), Some(1));
    }

    #[test]
    fn deactivation_keeps_last_active() {
        let mut t = tracker_with(&[]);
        let _ = t.register(Target::Handle(1));
        t.visibility_changed(1, true);
        t.visibility_changed(1, false);
        assert_eq!(t.active(), &[] as &[u32]);
        assert_eq!(t.last_active(), Some(1));
        assert_eq!(t.current(), None);
    }

    #[test]
    fn unregister_clears_last_active_only_for_that_item() {
        let mut t = tracker_with(&[]);
        let _ = t.register(Target::Handle(1));
        let _ = t.register(Target::Handle(2));
        t.visibility_changed(2, true);
        t.unregister(Target::Handle(1));
        assert_eq!(t.last_active(), Some(2));
        t.unregister(Target::Handle(2));
        assert_eq!(t.last_active(), None);
    }

    #[test]
    fn unregister_cascades_out_of_active_set() {
        let mut t = tracker_with(&[]);
        let _ = t.register(Target::Handle(1));
        let _ = t.register(Target::Handle(2));
        t.visibility_changed(1, true);
        t.visibility_changed(2, true);
        t.unregister(Target::Handle(1));
        assert_eq!(t.registered(), &[2]);
        assert_eq!(t.active(), &[2]);
        assert_eq!(t.observer().watched, vec![2]);
    }

    #[test]
    fn unregister_by_ambiguous_id_removes_all_matches() {
        // Two distinct items share an id; cleanup wins over strictness.
        let mut t = tracker_with(&[("section", 1), ("section", 2), ("other", 3)]);
        let _ = t.register(Target::Handle(1));
        let _ = t.register(Target::Handle(2));
        let _ = t.register(Target::Handle(3));
        t.unregister(Target::Id("section"));
        assert_eq!(t.registered(), &[3]);
    }

    #[test]
    fn unregister_unknown_id_is_a_noop() {
        let mut t = tracker_with(&[("intro", 1)]);
        let _ = t.register(Target::Handle(1));
        t.unregister(Target::Id("missing"));
        assert_eq!(t.registered(), &[1]);
    }

    #[test]
    fn unregister_unknown_handle_is_safe() {
        let mut t = tracker_with(&[]);
        let _ = t.register(Target::Handle(1));
        t.unregister(Target::Handle(42));
        assert_eq!(t.registered(), &[1]);
    }

    #[test]
    fn unregister_all_clears_everything() {
        let mut t = tracker_with(&[]);
        let _ = t.register(Target::Handle(1));
        let _ = t.register(Target::Handle(2));
        t.visibility_changed(1, true);
        t.unregister_all();
        assert!(t.is_empty());
        assert_eq!(t.active(), &[] as &[u32]);
        assert_eq!(t.last_active(), None);
        assert_eq!(t.is_active(&1), ActiveState::Untracked);
        assert_eq!(t.observer().disconnects, 1);
    }

    #[test]
    fn registration_handle_is_idempotent() {
        let mut t = tracker_with(&[]);
        let mut handle = t.register(Target::Handle(1));
        let _ = t.register(Target::Handle(2));
        handle.release(&mut t);
        assert_eq!(t.registered(), &[2]);
        // Releasing again, even after re-registering the same item, does nothing.
        let _ = t.register(Target::Handle(1));
        handle.release(&mut t);
        assert_eq!(t.registered(), &[2, 1]);
    }

    #[test]
    fn handle_release_after_teardown_is_harmless() {
        let mut t = tracker_with(&[]);
        let mut handle = t.register(Target::Handle(1));
        t.unregister_all();
        handle.release(&mut t);
        assert!(t.is_empty());
    }

    #[test]
    fn is_active_is_three_valued() {
        let mut t = tracker_with(&[]);
        let _ = t.register(Target::Handle(1));
        let _ = t.register(Target::Handle(2));
        t.visibility_changed(2, true);
        assert_eq!(t.is_active(&2), ActiveState::Active);
        assert_eq!(t.is_active(&1), ActiveState::Inactive);
        assert_eq!(t.is_active(&99), ActiveState::Untracked);
    }

    #[test]
    fn stale_event_for_unregistered_item_is_dropped() {
        let mut t = tracker_with(&[]);
        let _ = t.register(Target::Handle(1));
        t.unregister(Target::Handle(1));
        t.visibility_changed(1, true);
        assert_eq!(t.active(), &[] as &[u32]);
        assert_eq!(t.last_active(), None);
    }

    #[test]
    fn batch_events_apply_in_delivery_order() {
        let mut t = tracker_with(&[]);
        let _ = t.register(Target::Handle(1));
        let _ = t.register(Target::Handle(2));
        let _ = t.register(Target::Handle(3));
        t.apply_events([(1, true), (2, true), (3, true), (1, false)]);
        assert_eq!(t.active(), &[2, 3]);
        assert_eq!(t.last_active(), Some(3));
        assert_eq!(t.current(), Some(3));
    }

    #[test]
    fn scenario_register_activate_deactivate() {
        let mut t = tracker_with(&[]);
        let _ = t.register(Target::Handle(1));
        let _ = t.register(Target::Handle(2));
        t.visibility_changed(1, true);
        t.visibility_changed(2, true);
        t.visibility_changed(1, false);
        assert_eq!(t.active(), &[2]);
        assert_eq!(t.last_active(), Some(2));
        assert_eq!(t.is_active(&1), ActiveState::Inactive);
        assert_eq!(t.is_active(&2), ActiveState::Active);
    }

    #[test]
    fn detached_tracker_never_activates() {
        let mut t: VisibilityTracker<u32> = VisibilityTracker::detached();
        let _ = t.register(Target::Handle(1));
        let _ = t.register(Target::Handle(2));
        assert_eq!(t.registered(), &[1, 2]);
        assert_eq!(t.active(), &[] as &[u32]);
        assert_eq!(t.is_active(&1), ActiveState::Inactive);
        // Identifier targets never resolve without a lookup.
        let handle = t.register(Target::Id("intro"));
        assert!(handle.is_released());
    }

    #[test]
    fn subscriber_gets_initial_snapshot_then_updates() {
        let mut t = tracker_with(&[]);
        let _ = t.register(Target::Handle(1));
        let seen: Rc<RefCell<Vec<(TrackerSnapshot<u32>, ChangeFlags)>>> =
            Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let id = t.subscribe(move |snap, changed| {
            sink.borrow_mut().push((snap.clone(), changed));
        });

        t.visibility_changed(1, true);
        t.unsubscribe(id);
        t.visibility_changed(1, false);

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        // Initial delivery: current state, empty flags.
        assert_eq!(seen[0].0.registered, vec![1]);
        assert_eq!(seen[0].1, ChangeFlags::empty());
        // Activation: active set and last-active both changed.
        assert_eq!(seen[1].0.active, vec![1]);
        assert!(seen[1].1.contains(ChangeFlags::ACTIVE | ChangeFlags::LAST_ACTIVE));
    }

    #[test]
    fn multi_item_unregister_notifies_once() {
        let mut t = tracker_with(&[("section", 1), ("section", 2)]);
        let _ = t.register(Target::Handle(1));
        let _ = t.register(Target::Handle(2));
        let count = Rc::new(RefCell::new(0_usize));
        let sink = Rc::clone(&count);
        let _ = t.subscribe(move |_snap, _changed| {
            *sink.borrow_mut() += 1;
        });
        t.unregister(Target::Id("section"));
        // One initial delivery plus one batched unregister notification.
        assert_eq!(*count.borrow(), 2);
    }

    #[test]
    fn unresolvable_targets_do_not_notify() {
        let mut t = tracker_with(&[("intro", 1)]);
        let count = Rc::new(RefCell::new(0_usize));
        let sink = Rc::clone(&count);
        let _ = t.subscribe(move |_snap, _changed| {
            *sink.borrow_mut() += 1;
        });
        let _ = t.register(Target::Id("missing"));
        t.unregister(Target::Id("missing"));
        assert_eq!(*count.borrow(), 1); // initial delivery only
    }

    #[test]
    fn snapshot_is_detached_from_tracker() {
        let mut t = tracker_with(&[]);
        let _ = t.register(Target::Handle(1));
        let snap = t.snapshot();
        t.visibility_changed(1, true);
        assert_eq!(snap.active, Vec::<u32>::new());
        assert_eq!(t.active(), &[1]);
    }
}
