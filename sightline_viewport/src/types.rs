// Copyright 2026 the Sightline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Observer configuration.

use kurbo::Insets;

/// Configuration for [`ViewportObserver`](crate::ViewportObserver).
///
/// Handed to the tracker at construction and passed through unmodified; the
/// tracker itself never interprets it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ViewportOptions {
    /// Outward expansion of the viewport before intersection testing.
    ///
    /// Positive insets grow the effective viewport, so items just outside the
    /// visible region report as visible early (the root-margin idiom).
    /// Negative insets shrink it.
    pub margin: Insets,
    /// Fraction of an item's own area that must overlap the (expanded)
    /// viewport for the item to count as visible, in `0.0..=1.0`.
    ///
    /// `0.0` means any positive overlap counts.
    pub threshold: f64,
}

impl Default for ViewportOptions {
    fn default() -> Self {
        Self {
            margin: Insets::ZERO,
            threshold: 0.0,
        }
    }
}
