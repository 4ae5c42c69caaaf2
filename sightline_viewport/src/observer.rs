// Copyright 2026 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Observer implementation: intersection sweeps over watched items.

use alloc::vec::Vec;

use kurbo::Rect;
use log::debug;
use sightline_tracker::VisibilityObserver;

use crate::types::ViewportOptions;

struct Watch<K> {
    item: K,
    /// Last state delivered from a sweep; `None` until first reported.
    reported: Option<bool>,
}

/// A polled visibility observer over axis-aligned item bounds.
///
/// ## Usage
///
/// - Hand it to a `VisibilityTracker` along with a [`ViewportOptions`]; the
///   tracker calls [`observe`](VisibilityObserver::observe) /
///   [`unobserve`](VisibilityObserver::unobserve) as items come and go.
/// - Keep item geometry current with [`set_bounds`](Self::set_bounds) and move
///   the viewport with [`set_viewport`](Self::set_viewport) as the caller's
///   layout or scroll position changes.
/// - Once per frame or scroll tick, call [`sweep`](Self::sweep) and feed the
///   returned batch to the tracker's `apply_events`.
///
/// Geometry is caller-owned: bounds set for an item persist across
/// `unobserve`, so re-observing does not require re-measuring. Items watched
/// before any bounds are supplied report as not visible.
pub struct ViewportObserver<K> {
    viewport: Rect,
    options: ViewportOptions,
    bounds: Vec<(K, Rect)>,
    watched: Vec<Watch<K>>,
}

impl<K> core::fmt::Debug for ViewportObserver<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ViewportObserver")
            .field("viewport", &self.viewport)
            .field("options", &self.options)
            .field("bounds", &self.bounds.len())
            .field("watched", &self.watched.len())
            .finish()
    }
}

impl<K: Copy + Eq> ViewportObserver<K> {
    /// Create an observer for the given viewport rectangle.
    pub fn new(viewport: Rect) -> Self {
        Self {
            viewport,
            options: ViewportOptions::default(),
            bounds: Vec::new(),
            watched: Vec::new(),
        }
    }

    /// Move or resize the viewport. Takes effect on the next sweep.
    pub fn set_viewport(&mut self, viewport: Rect) {
        self.viewport = viewport;
    }

    /// The current (unexpanded) viewport rectangle.
    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    /// Set or update the world-space bounds for `item`.
    pub fn set_bounds(&mut self, item: K, bounds: Rect) {
        if let Some(entry) = self.bounds.iter_mut().find(|(k, _)| *k == item) {
            entry.1 = bounds;
        } else {
            self.bounds.push((item, bounds));
        }
    }

    /// Number of items currently under observation.
    pub fn watched_len(&self) -> usize {
        self.watched.len()
    }

    /// Compute visibility for every watched item and return the transitions
    /// since the previous sweep, in watch order.
    ///
    /// Newly observed items always produce an initial report. An item is
    /// visible when the overlap of its bounds with the margin-expanded
    /// viewport meets the configured threshold fraction of the item's own
    /// area; zero-area bounds (including items with no bounds yet) are never
    /// visible.
    pub fn sweep(&mut self) -> Vec<(K, bool)> {
        let viewport = self.viewport.inset(self.options.margin);
        let mut out = Vec::new();
        for watch in &mut self.watched {
            let bounds = self
                .bounds
                .iter()
                .find(|(k, _)| *k == watch.item)
                .map_or(Rect::ZERO, |(_, r)| *r);
            let visible = meets_threshold(viewport, bounds, self.options.threshold);
            if watch.reported != Some(visible) {
                watch.reported = Some(visible);
                out.push((watch.item, visible));
            }
        }
        out
    }
}

impl<K: Copy + Eq> VisibilityObserver<K> for ViewportObserver<K> {
    type Options = ViewportOptions;

    fn observe(&mut self, item: &K, options: &ViewportOptions) {
        self.options = *options;
        if self.watched.iter().any(|w| w.item == *item) {
            debug!("observe: item already watched");
            return;
        }
        self.watched.push(Watch {
            item: *item,
            reported: None,
        });
    }

    fn unobserve(&mut self, item: &K) {
        self.watched.retain(|w| w.item != *item);
    }

    fn disconnect(&mut self) {
        self.watched.clear();
    }
}

/// True when the overlap of `bounds` with `viewport` covers at least
/// `threshold` of the bounds' own area (any positive overlap for a zero
/// threshold).
fn meets_threshold(viewport: Rect, bounds: Rect, threshold: f64) -> bool {
    let area = bounds.area();
    if area <= 0.0 {
        return false;
    }
    let w = (viewport.x1.min(bounds.x1) - viewport.x0.max(bounds.x0)).max(0.0);
    let h = (viewport.y1.min(bounds.y1) - viewport.y0.max(bounds.y0)).max(0.0);
    let overlap = w * h;
    if threshold <= 0.0 {
        overlap > 0.0
    } else {
        overlap >= threshold * area
    }
}
