// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared-run math between two rooms' facing walls

use floorplan_core::{Bounds, WallOrientation};

/// A 1-D interval along a wall axis, in world coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub start: f64,
    pub end: f64,
}

impl Span {
    #[inline]
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.end - self.start
    }

    #[inline]
    pub fn midpoint(&self) -> f64 {
        (self.start + self.end) * 0.5
    }

    /// True if the open intervals share a positive length
    #[inline]
    pub fn intersects(&self, other: &Span) -> bool {
        self.start.max(other.start) < self.end.min(other.end)
    }
}

/// Overlapping run of two rectangles projected onto the axis a wall of
/// `orientation` runs along
///
/// Touching at a single point is not an overlap.
pub fn overlap(source: &Bounds, target: &Bounds, orientation: WallOrientation) -> Option<Span> {
    let (s0, s1) = source.span(orientation);
    let (t0, t1) = target.span(orientation);

    let span = Span::new(s0.max(t0), s1.min(t1));
    if span.length() <= 0.0 {
        None
    } else {
        Some(span)
    }
}

/// Coordinate at `percent` (0-100) along `span`
#[inline]
pub fn position_on_overlap(span: &Span, percent: f64) -> f64 {
    span.start + span.length() * percent / 100.0
}

/// Coordinate at `percent` along the run shared with `target`
///
/// Falls back to `percent` of the source wall's own full run when there is no
/// target or no positive overlap.
pub fn position_with_fallback(
    source: &Bounds,
    target: Option<&Bounds>,
    orientation: WallOrientation,
    percent: f64,
) -> f64 {
    match target.and_then(|t| overlap(source, t, orientation)) {
        Some(span) => position_on_overlap(&span, percent),
        None => {
            let (start, end) = source.span(orientation);
            position_on_overlap(&Span::new(start, end), percent)
        }
    }
}
