// Copyright 2026 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Label-assigning derived tracker.
//!
//! [`LabeledTracker`] wraps a [`VisibilityTracker`] and intercepts only the
//! registration path: every item must carry an identifier, and a display
//! label is derived from it with [`display_label`] unless an explicit label
//! is supplied. The label is stamped as auxiliary metadata queryable with
//! [`LabeledTracker::label_of`]; tracking semantics are untouched, and all
//! querying and unregistration go through the wrapped tracker unchanged via
//! [`LabeledTracker::tracker`] / [`LabeledTracker::tracker_mut`].

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Debug;

use log::warn;

use crate::tracker::VisibilityTracker;
use crate::types::{ItemLookup, Registration, Target, VisibilityObserver};

/// Convert a hyphen-separated lowercase token sequence into capitalized
/// words: `"intro-section"` becomes `"Intro Section"`.
///
/// Empty tokens (leading, trailing, or doubled hyphens) are skipped; token
/// bytes after the first character are kept as-is.
pub fn display_label(id: &str) -> String {
    let mut out = String::new();
    for word in id.split('-').filter(|w| !w.is_empty()) {
        if !out.is_empty() {
            out.push(' ');
        }
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}

/// A [`VisibilityTracker`] wrapper that requires identifiers and stamps
/// display labels at registration time.
pub struct LabeledTracker<K, O, L>
where
    O: VisibilityObserver<K>,
    L: ItemLookup<K>,
{
    inner: VisibilityTracker<K, O, L>,
    labels: Vec<(K, String)>,
}

impl<K, O, L> Debug for LabeledTracker<K, O, L>
where
    K: Debug,
    O: VisibilityObserver<K>,
    L: ItemLookup<K>,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LabeledTracker")
            .field("inner", &self.inner)
            .field("labels", &self.labels)
            .finish()
    }
}

impl<K, O, L> LabeledTracker<K, O, L>
where
    K: Copy + Eq + Debug,
    O: VisibilityObserver<K>,
    L: ItemLookup<K>,
{
    /// Wrap an existing tracker.
    pub fn new(inner: VisibilityTracker<K, O, L>) -> Self {
        Self {
            inner,
            labels: Vec::new(),
        }
    }

    /// Register a target, deriving or applying its display label first.
    ///
    /// The resolved item must carry an identifier (per the wrapped tracker's
    /// [`ItemLookup`]); otherwise this warns and rejects without delegating.
    /// When `label` is `None` the label is derived from the identifier with
    /// [`display_label`]. The label is stamped only if the delegated
    /// registration succeeds, so a duplicate registration leaves any earlier
    /// stamp in place.
    pub fn register(&mut self, target: Target<'_, K>, label: Option<&str>) -> Registration<K> {
        let item = match target {
            Target::Handle(item) => item,
            Target::Id(id) => match self.inner.lookup().lookup_by_id(id) {
                Some(item) => item,
                None => {
                    warn!("register: no item found for id {id:?}");
                    return Registration::released();
                }
            },
        };
        let Some(derived) = self.inner.lookup().id_of(&item).map(display_label) else {
            warn!("register: item {item:?} carries no identifier; rejecting");
            return Registration::released();
        };
        let label = label.map(String::from).unwrap_or(derived);
        let handle = self.inner.register(Target::Handle(item));
        if handle.is_released() {
            return handle;
        }
        self.labels.retain(|(k, _)| *k != item);
        self.labels.push((item, label));
        handle
    }

    /// The label stamped on `item`, if it was ever registered through this
    /// wrapper. Stamps are metadata and survive unregistration.
    pub fn label_of(&self, item: &K) -> Option<&str> {
        self.labels
            .iter()
            .find(|(k, _)| k == item)
            .map(|(_, label)| label.as_str())
    }

    /// All stamped labels, in stamping order.
    pub fn labels(&self) -> &[(K, String)] {
        &self.labels
    }

    /// The wrapped tracker, for queries and subscriptions.
    pub fn tracker(&self) -> &VisibilityTracker<K, O, L> {
        &self.inner
    }

    /// The wrapped tracker, for unregistration and event application.
    pub fn tracker_mut(&mut self) -> &mut VisibilityTracker<K, O, L> {
        &mut self.inner
    }

    /// Unwrap, discarding the stamped labels.
    pub fn into_inner(self) -> VisibilityTracker<K, O, L> {
        self.inner
    }
}
