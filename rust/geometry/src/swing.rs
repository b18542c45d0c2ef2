// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Door hinge and swing resolution
//!
//! Presentational only: nothing here changes hole geometry.

use crate::holes::Hole;
use floorplan_core::{OpeningType, SwingSide};
use nalgebra::{Point3, Vector3};
use smallvec::SmallVec;

/// Where a door is hinged and which way it opens
#[derive(Debug, Clone, PartialEq)]
pub struct DoorSwing {
    /// Hinge side as seen from inside the room the door swings into, facing the wall
    pub hinge_side: SwingSide,
    /// Hinge axis base points on the floor; two for a double door
    pub hinges: SmallVec<[Point3<f64>; 2]>,
    /// Unit plan vector the door opens toward
    pub swing_direction: Vector3<f64>,
    /// Signed yaw (radians about +Y) from the closed to the fully open leaf
    ///
    /// Applies to the leaf on `hinge_side`; the second leaf of a double door
    /// mirrors it.
    pub rotation: f64,
}

/// Resolve hinge and swing for a door hole, `None` for other openings
pub fn door_swing(hole: &Hole) -> Option<DoorSwing> {
    if !hole.kind.is_door() {
        return None;
    }

    let (ox, oz) = hole.wall.outward();
    let outward = Vector3::new(ox, 0.0, oz);
    let swing_direction = if hole.opens_into_current {
        -outward
    } else {
        outward
    };

    // Standing in the target room, facing the wall
    let facing = -swing_direction;
    let right = facing.cross(&Vector3::y());

    let center = hole.world_center();
    let base = Point3::new(center.x, hole.elevation + hole.bottom, center.z)
        + swing_direction * (hole.wall_thickness * 0.5);
    let half = hole.width * 0.5;

    let (hinge, leaf) = match hole.swing_side {
        SwingSide::Left => (base - right * half, right),
        SwingSide::Right => (base + right * half, -right),
    };

    let mut hinges: SmallVec<[Point3<f64>; 2]> = SmallVec::new();
    hinges.push(hinge);
    if hole.kind == OpeningType::DoubleDoor {
        hinges.push(hinge + leaf * hole.width);
    }

    // Yaw from the closed leaf to the swing direction
    let rotation = (leaf.z * swing_direction.x - leaf.x * swing_direction.z)
        .atan2(leaf.x * swing_direction.x + leaf.z * swing_direction.z);

    Some(DoorSwing {
        hinge_side: hole.swing_side,
        hinges,
        swing_direction,
        rotation,
    })
}
