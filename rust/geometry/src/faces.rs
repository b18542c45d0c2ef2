// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Face classification by outward normal
//!
//! Boolean subtraction returns a triangle soup with no face grouping left, so
//! finishes are re-attached by bucketing every triangle into one of the six
//! axis directions.

use crate::mesh::Mesh;
use floorplan_core::WallDirection;
use nalgebra::Vector3;

/// One of the six signed world axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisDirection {
    PosX,
    NegX,
    PosY,
    NegY,
    PosZ,
    NegZ,
}

impl AxisDirection {
    /// Classify a normal by its dominant component
    ///
    /// Returns `None` for zero or non-finite vectors.
    pub fn from_normal(normal: &Vector3<f64>) -> Option<Self> {
        if !(normal.x.is_finite() && normal.y.is_finite() && normal.z.is_finite()) {
            return None;
        }
        let (ax, ay, az) = (normal.x.abs(), normal.y.abs(), normal.z.abs());
        if ax.max(ay).max(az) < 1e-12 {
            return None;
        }

        let direction = if ax >= ay && ax >= az {
            if normal.x > 0.0 {
                AxisDirection::PosX
            } else {
                AxisDirection::NegX
            }
        } else if ay >= az {
            if normal.y > 0.0 {
                AxisDirection::PosY
            } else {
                AxisDirection::NegY
            }
        } else if normal.z > 0.0 {
            AxisDirection::PosZ
        } else {
            AxisDirection::NegZ
        };
        Some(direction)
    }

    /// Direction pointing out of a room through its wall on `wall`
    pub fn outward_of(wall: WallDirection) -> Self {
        match wall {
            WallDirection::Top => AxisDirection::NegZ,
            WallDirection::Bottom => AxisDirection::PosZ,
            WallDirection::Left => AxisDirection::NegX,
            WallDirection::Right => AxisDirection::PosX,
        }
    }
}

/// Split a mesh into two meshes: triangles whose normal classifies as
/// `selected`, and all the others
///
/// Degenerate triangles are dropped.
pub fn partition_by_direction(mesh: &Mesh, selected: AxisDirection) -> (Mesh, Mesh) {
    let mut hit = Mesh::new();
    let mut rest = Mesh::new();

    for t in 0..mesh.triangle_count() {
        let normal = match mesh.triangle_normal(t) {
            Some(n) => n,
            None => continue,
        };
        let target = if AxisDirection::from_normal(&normal) == Some(selected) {
            &mut hit
        } else {
            &mut rest
        };

        let base = target.vertex_count() as u32;
        for corner in 0..3 {
            let index = mesh.indices[t * 3 + corner] as usize;
            target.add_vertex(mesh.position(index), normal);
        }
        target.add_triangle(base, base + 1, base + 2);
    }

    (hit, rest)
}
