// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wall assembly
//!
//! For one floor: analyze every room wall, resolve its holes, build one solid
//! per owned segment, cut the holes crossing it through the backend and split
//! the result into finish parts. Openings whose material was not removed get
//! an overlay mesh instead.

use crate::backend::{CutterBox, WallBackend};
use crate::csg::aabb_to_mesh;
use crate::faces::{partition_by_direction, AxisDirection};
use crate::holes::{Hole, HoleBuilder, OpeningKey};
use crate::mesh::Mesh;
use crate::overlay::opening_overlay;
use crate::ownership::{analyze, WallOwnership, WallSegment, ADJACENCY_EPSILON};
use crate::swing::{door_swing, DoorSwing};
use floorplan_core::{
    Connection, Finish, FinishResolver, FloorDefaults, Room, WallDirection, WallKind,
    WallOrientation,
};
use nalgebra::Point3;
use rustc_hash::FxHashSet;
use tracing::{debug, warn};

/// Which side of a segment a surface part faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FinishRole {
    /// Faces carrying the rendering room's finish
    Own,
    /// The face pointing into the neighbor sharing the segment
    Neighbor,
}

/// Triangles of one segment solid sharing one finish
#[derive(Debug, Clone)]
pub struct SurfacePart {
    pub role: FinishRole,
    pub finish: Finish,
    pub mesh: Mesh,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolidKind {
    /// Box without holes
    Plain,
    /// Material removed by at least one hole
    Holed,
}

#[derive(Debug, Clone)]
pub struct WallSolid {
    pub kind: SolidKind,
    pub parts: Vec<SurfacePart>,
}

impl WallSolid {
    /// All parts merged into one mesh
    pub fn merged(&self) -> Mesh {
        let mut mesh = Mesh::new();
        for part in &self.parts {
            mesh.merge(&part.mesh);
        }
        mesh
    }

    pub fn triangle_count(&self) -> usize {
        self.parts.iter().map(|p| p.mesh.triangle_count()).sum()
    }
}

#[derive(Debug, Clone)]
pub struct SegmentGeometry {
    /// Position of the segment in the wall's ownership partition
    pub index: usize,
    pub segment: WallSegment,
    pub solid: WallSolid,
    /// Holes crossing the segment, cut or not
    pub hole_count: usize,
}

/// Solids one room emits for one of its walls
#[derive(Debug, Clone)]
pub struct WallGeometry {
    pub room: String,
    pub direction: WallDirection,
    pub segments: Vec<SegmentGeometry>,
}

/// A rendered opening: its hole, placement and, when no material was
/// removed for it, an overlay mesh
#[derive(Debug, Clone)]
pub struct OpeningGeometry {
    pub room: String,
    pub direction: WallDirection,
    pub hole: Hole,
    pub center: Point3<f64>,
    pub swing: Option<DoorSwing>,
    pub overlay: Option<Mesh>,
}

/// Everything emitted for one floor
#[derive(Debug, Clone)]
pub struct FloorGeometry {
    pub floor: String,
    pub walls: Vec<WallGeometry>,
    pub openings: Vec<OpeningGeometry>,
    /// Name of the backend that built the solids
    pub backend: &'static str,
    /// Segments that fell back to a plain solid after a failed cut
    pub fallback_segments: usize,
}

impl FloorGeometry {
    pub fn segment_count(&self) -> usize {
        self.walls.iter().map(|w| w.segments.len()).sum()
    }

    pub fn triangle_count(&self) -> usize {
        let walls: usize = self
            .walls
            .iter()
            .flat_map(|w| &w.segments)
            .map(|s| s.solid.triangle_count())
            .sum();
        let overlays: usize = self
            .openings
            .iter()
            .filter_map(|o| o.overlay.as_ref())
            .map(|m| m.triangle_count())
            .sum();
        walls + overlays
    }
}

/// One room wall after analysis
struct WallPlan<'r> {
    room: &'r Room,
    direction: WallDirection,
    ownership: WallOwnership,
}

/// Assembles the walls of one floor
///
/// Holds only borrowed, read-only inputs; build one per floor.
pub struct WallAssembler<'a> {
    rooms: &'a [Room],
    connections: &'a [Connection],
    defaults: &'a FloorDefaults,
    resolver: &'a dyn FinishResolver,
    backend: &'a dyn WallBackend,
    margin: f64,
}

impl<'a> WallAssembler<'a> {
    pub fn new(
        rooms: &'a [Room],
        connections: &'a [Connection],
        defaults: &'a FloorDefaults,
        resolver: &'a dyn FinishResolver,
        backend: &'a dyn WallBackend,
        margin: f64,
    ) -> Self {
        Self {
            rooms,
            connections,
            defaults,
            resolver,
            backend,
            margin,
        }
    }

    /// Every hole rendered on this floor, without building any mesh
    pub fn holes(&self) -> Vec<Hole> {
        let builder = HoleBuilder::new(self.defaults, self.margin);
        let (rooms, connections) = (self.rooms, self.connections);
        let mut holes = Vec::new();
        for room in rooms {
            for direction in WallDirection::ALL {
                holes.extend(builder.holes_for_wall(room, direction, rooms, connections));
            }
        }
        holes
    }

    /// Build the geometry for the whole floor
    pub fn assemble(&self, floor: &str) -> FloorGeometry {
        let holes = self.holes();
        let (rooms, connections, resolver) = (self.rooms, self.connections, self.resolver);
        let plans: Vec<WallPlan> = rooms
            .iter()
            .flat_map(|room| {
                WallDirection::ALL.into_iter().map(move |direction| WallPlan {
                    room,
                    direction,
                    ownership: analyze(room, direction, rooms, connections, resolver),
                })
            })
            .collect();

        let mut subtracted: FxHashSet<OpeningKey> = FxHashSet::default();
        let mut kept: FxHashSet<OpeningKey> = FxHashSet::default();
        let mut fallback_segments = 0usize;
        let mut walls = Vec::new();

        for plan in plans.iter().filter(|p| p.ownership.should_render) {
            let mut segments = Vec::new();
            for (index, segment) in plan.ownership.owned_segments() {
                let crossing: Vec<&Hole> = self.crossing_holes(plan, segment, &holes);
                let solid = self.segment_box(plan, segment);

                let (kind, mesh) = if crossing.is_empty() || !self.backend.removes_material() {
                    kept.extend(crossing.iter().map(|h| h.key.clone()));
                    (SolidKind::Plain, solid)
                } else {
                    let cutters: Vec<CutterBox> =
                        crossing.iter().map(|h| h.cutter_box(self.margin)).collect();
                    match self.backend.cut(&solid, &cutters) {
                        Ok(cut) => {
                            subtracted.extend(crossing.iter().map(|h| h.key.clone()));
                            (SolidKind::Holed, cut)
                        }
                        Err(e) => {
                            warn!(
                                room = %plan.room.name,
                                wall = %plan.direction,
                                segment = index,
                                error = %e,
                                "Hole subtraction failed, keeping plain segment"
                            );
                            fallback_segments += 1;
                            kept.extend(crossing.iter().map(|h| h.key.clone()));
                            (SolidKind::Plain, solid)
                        }
                    }
                };

                segments.push(SegmentGeometry {
                    index,
                    segment: segment.clone(),
                    solid: WallSolid {
                        kind,
                        parts: assign_finishes(&mesh, segment, plan.direction),
                    },
                    hole_count: crossing.len(),
                });
            }

            debug!(
                room = %plan.room.name,
                wall = %plan.direction,
                segments = segments.len(),
                "Assembled wall"
            );
            walls.push(WallGeometry {
                room: plan.room.name.clone(),
                direction: plan.direction,
                segments,
            });
        }

        let openings = holes
            .into_iter()
            .map(|hole| {
                let cut = subtracted.contains(&hole.key) && !kept.contains(&hole.key);
                OpeningGeometry {
                    room: hole.room.clone(),
                    direction: hole.wall,
                    center: hole.world_center(),
                    swing: door_swing(&hole),
                    overlay: if cut { None } else { opening_overlay(&hole) },
                    hole,
                }
            })
            .collect();

        FloorGeometry {
            floor: floor.to_string(),
            walls,
            openings,
            backend: self.backend.name(),
            fallback_segments,
        }
    }

    /// Holes on the segment's wall line that overlap it along the wall and
    /// vertically
    fn crossing_holes<'h>(
        &self,
        plan: &WallPlan<'_>,
        segment: &WallSegment,
        holes: &'h [Hole],
    ) -> Vec<&'h Hole> {
        let orientation = plan.direction.orientation();
        let plane = plan.room.bounds.wall_plane(plan.direction);
        let y0 = plan.room.elevation();
        let y1 = y0 + plan.room.wall_height(plan.direction, self.defaults);
        let span = segment.span();

        holes
            .iter()
            .filter(|h| h.shares_line(orientation, plane))
            .filter(|h| h.range().intersects(&span))
            .filter(|h| {
                let bottom = h.elevation + h.bottom;
                bottom.max(y0) < (h.elevation + h.top()).min(y1)
            })
            .collect()
    }

    /// Closed box for one segment, centered on the wall line
    ///
    /// Horizontal walls reach half a thickness past a run end unless a
    /// collinear solid wall continues it. Vertical segments stop half a
    /// thickness short of any solid horizontal wall they meet, so corners and
    /// junctions are filled exactly once.
    fn segment_box(&self, plan: &WallPlan<'_>, segment: &WallSegment) -> Mesh {
        let half = self.defaults.wall_thickness * 0.5;
        let plane = plan.room.bounds.wall_plane(plan.direction);
        let y0 = plan.room.elevation();
        let y1 = y0 + plan.room.wall_height(plan.direction, self.defaults);

        match plan.direction.orientation() {
            WallOrientation::Horizontal => {
                let (run_start, run_end) = plan.room.bounds.wall_run(plan.direction);
                let runs: Vec<(f64, f64)> = solid_horizontal_runs(self.rooms, plane).collect();
                let continued_before = runs.iter().any(|&(s, e)| {
                    s < run_start - ADJACENCY_EPSILON && e >= run_start - ADJACENCY_EPSILON
                });
                let continued_after = runs.iter().any(|&(s, e)| {
                    s <= run_end + ADJACENCY_EPSILON && e > run_end + ADJACENCY_EPSILON
                });

                let start = if segment.start <= run_start && !continued_before {
                    segment.start - half
                } else {
                    segment.start
                };
                let end = if segment.end >= run_end && !continued_after {
                    segment.end + half
                } else {
                    segment.end
                };
                aabb_to_mesh(
                    Point3::new(start, y0, plane - half),
                    Point3::new(end, y1, plane + half),
                )
            }
            WallOrientation::Vertical => {
                let meets = |z: f64| {
                    solid_horizontal_runs(self.rooms, z).any(|(s, e)| {
                        plane >= s - ADJACENCY_EPSILON && plane <= e + ADJACENCY_EPSILON
                    })
                };
                let mut start = segment.start;
                let mut end = segment.end;
                if meets(segment.start) {
                    start += half;
                }
                if meets(segment.end) {
                    end -= half;
                }
                if end <= start {
                    (start, end) = (segment.start, segment.end);
                }
                aabb_to_mesh(
                    Point3::new(plane - half, y0, start),
                    Point3::new(plane + half, y1, end),
                )
            }
        }
    }
}

/// Runs of the solid top and bottom walls of `rooms` lying on the line `z = plane`
fn solid_horizontal_runs(rooms: &[Room], plane: f64) -> impl Iterator<Item = (f64, f64)> + '_ {
    rooms.iter().flat_map(move |room| {
        [WallDirection::Top, WallDirection::Bottom]
            .into_iter()
            .filter(move |&d| room.wall_type(d).kind() == WallKind::Solid)
            .filter(move |&d| (room.bounds.wall_plane(d) - plane).abs() <= ADJACENCY_EPSILON)
            .map(move |d| room.bounds.wall_run(d))
    })
}

/// Split a segment mesh by finish
///
/// Triangles facing the neighbor get its finish, every other face keeps the
/// segment's own finish. Without a neighbor the whole mesh is one part.
pub fn assign_finishes(mesh: &Mesh, segment: &WallSegment, direction: WallDirection) -> Vec<SurfacePart> {
    match &segment.neighbor_finish {
        Some(neighbor_finish) => {
            let (facing, rest) = partition_by_direction(mesh, AxisDirection::outward_of(direction));
            let mut parts = Vec::with_capacity(2);
            if !rest.is_empty() {
                parts.push(SurfacePart {
                    role: FinishRole::Own,
                    finish: segment.finish.clone(),
                    mesh: rest,
                });
            }
            if !facing.is_empty() {
                parts.push(SurfacePart {
                    role: FinishRole::Neighbor,
                    finish: neighbor_finish.clone(),
                    mesh: facing,
                });
            }
            parts
        }
        None => vec![SurfacePart {
            role: FinishRole::Own,
            finish: segment.finish.clone(),
            mesh: mesh.clone(),
        }],
    }
}
