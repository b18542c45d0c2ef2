// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Opening overlay meshes
//!
//! Drawn in the hole rectangle on the wall line when the wall material was not
//! removed: a panel per door leaf, a pane for windows, nothing for a plain
//! passage.

use crate::csg::aabb_to_mesh;
use crate::holes::Hole;
use crate::mesh::Mesh;
use floorplan_core::{OpeningType, WallOrientation};
use nalgebra::Point3;

pub const DOOR_PANEL_THICKNESS: f64 = 0.04;
pub const WINDOW_PANE_THICKNESS: f64 = 0.02;

/// Gap between the two leaves of a double door
const LEAF_GAP: f64 = 0.01;

/// Box spanning `[a0, a1]` along the wall, `[y0, y1]` vertically and
/// `thickness` across the wall line
fn slab(hole: &Hole, a0: f64, a1: f64, y0: f64, y1: f64, thickness: f64) -> Mesh {
    let half = thickness * 0.5;
    let (min, max) = match hole.orientation {
        WallOrientation::Horizontal => (
            Point3::new(a0, y0, hole.plane - half),
            Point3::new(a1, y1, hole.plane + half),
        ),
        WallOrientation::Vertical => (
            Point3::new(hole.plane - half, y0, a0),
            Point3::new(hole.plane + half, y1, a1),
        ),
    };
    aabb_to_mesh(min, max)
}

/// Overlay for `hole`, `None` for a plain passage
pub fn opening_overlay(hole: &Hole) -> Option<Mesh> {
    let range = hole.range();
    let y0 = hole.elevation + hole.bottom;
    let y1 = hole.elevation + hole.top();

    match hole.kind {
        OpeningType::Door => Some(slab(hole, range.start, range.end, y0, y1, DOOR_PANEL_THICKNESS)),
        OpeningType::DoubleDoor => {
            let mid = range.midpoint();
            let gap = (LEAF_GAP * 0.5).min(range.length() * 0.25);
            let mut mesh = slab(hole, range.start, mid - gap, y0, y1, DOOR_PANEL_THICKNESS);
            mesh.merge(&slab(hole, mid + gap, range.end, y0, y1, DOOR_PANEL_THICKNESS));
            Some(mesh)
        }
        OpeningType::Window => Some(slab(hole, range.start, range.end, y0, y1, WINDOW_PANE_THICKNESS)),
        OpeningType::Opening => None,
    }
}
