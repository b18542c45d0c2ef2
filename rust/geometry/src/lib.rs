// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Floorplan Wall Geometry
//!
//! Adjacency-aware wall and opening geometry for floorplans, using csgrs for
//! hole subtraction and nalgebra for the math.
//!
//! - **Overlap**: shared runs between facing walls, positions along them
//! - **Connections**: which endpoint of a connection renders its opening
//! - **Ownership**: which room emits each stretch of a shared wall
//! - **Holes**: opening rectangles in wall coordinates
//! - **Assembler**: per-segment solids, hole cutting, finishes and overlays
//!
//! ```no_run
//! use floorplan_core::FloorPlan;
//! use floorplan_geometry::FloorPlanner;
//!
//! let plan = FloorPlan::from_path("house.json")?;
//! let floors = FloorPlanner::from_plan(&plan).render_floors(&plan.floors);
//! # Ok::<(), floorplan_core::Error>(())
//! ```

pub mod assembler;
pub mod backend;
pub mod config;
pub mod connections;
pub mod csg;
pub mod error;
pub mod faces;
pub mod floor;
pub mod holes;
pub mod mesh;
pub mod overlap;
pub mod overlay;
pub mod ownership;
pub mod swing;
#[cfg(feature = "csg")]
pub mod triangulation;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Point3, Vector3};

pub use assembler::{
    assign_finishes, FinishRole, FloorGeometry, OpeningGeometry, SegmentGeometry, SolidKind,
    SurfacePart, WallAssembler, WallGeometry, WallSolid,
};
pub use backend::{default_backend, select_backend, CutterBox, OverlayBackend, WallBackend};
#[cfg(feature = "csg")]
pub use backend::CsgBackend;
pub use config::EngineConfig;
pub use connections::{
    find_matches, render_precedence, should_render, ConnectionMatch, MatchedSide,
};
pub use csg::{aabb_to_mesh, Triangle};
#[cfg(feature = "csg")]
pub use csg::CsgProcessor;
pub use error::{Error, Result};
pub use faces::AxisDirection;
pub use floor::FloorPlanner;
pub use holes::{Hole, HoleBuilder, OpeningKey};
pub use mesh::Mesh;
pub use overlap::{overlap, position_on_overlap, position_with_fallback, Span};
pub use overlay::opening_overlay;
pub use ownership::{analyze, WallOwnership, WallSegment};
pub use swing::{door_swing, DoorSwing};
