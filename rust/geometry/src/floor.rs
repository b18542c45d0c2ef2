// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Floor-level entry points

use crate::assembler::{FloorGeometry, WallAssembler};
use crate::backend::{default_backend, select_backend, WallBackend};
use crate::config::EngineConfig;
use crate::holes::Hole;
use floorplan_core::{Connection, Floor, FloorDefaults, FloorPlan, FinishResolver};
use rayon::prelude::*;
use std::sync::Arc;
use tracing::info;

/// Renders floors of one floorplan
///
/// Read-only once built; floors can be rendered from several threads.
pub struct FloorPlanner<'a> {
    defaults: &'a FloorDefaults,
    resolver: &'a dyn FinishResolver,
    connections: &'a [Connection],
    backend: Arc<dyn WallBackend>,
    margin: f64,
}

impl<'a> FloorPlanner<'a> {
    /// Planner on the process-wide backend
    pub fn new(
        defaults: &'a FloorDefaults,
        resolver: &'a dyn FinishResolver,
        connections: &'a [Connection],
    ) -> Self {
        Self {
            defaults,
            resolver,
            connections,
            backend: default_backend(),
            margin: EngineConfig::from_env().cutter_margin,
        }
    }

    /// Planner for a loaded floorplan, resolving finishes through its style table
    pub fn from_plan(plan: &'a FloorPlan) -> Self {
        Self::new(&plan.defaults, &plan.styles, &plan.connections)
    }

    /// Use an explicit configuration instead of the process-wide backend
    pub fn with_config(mut self, config: &EngineConfig) -> Self {
        self.backend = select_backend(config);
        self.margin = config.cutter_margin;
        self
    }

    pub fn with_backend(mut self, backend: Arc<dyn WallBackend>) -> Self {
        self.backend = backend;
        self
    }

    pub fn backend(&self) -> &dyn WallBackend {
        self.backend.as_ref()
    }

    fn assembler<'f>(&'f self, floor: &'f Floor) -> WallAssembler<'f> {
        WallAssembler::new(
            &floor.rooms,
            self.connections,
            self.defaults,
            self.resolver,
            self.backend.as_ref(),
            self.margin,
        )
    }

    pub fn render_floor(&self, floor: &Floor) -> FloorGeometry {
        let geometry = self.assembler(floor).assemble(&floor.name);
        info!(
            floor = %floor.name,
            rooms = floor.rooms.len(),
            walls = geometry.walls.len(),
            segments = geometry.segment_count(),
            openings = geometry.openings.len(),
            fallbacks = geometry.fallback_segments,
            backend = geometry.backend,
            "Rendered floor"
        );
        geometry
    }

    /// Render several floors in parallel, one assembler per floor
    ///
    /// Results keep the order of `floors`.
    pub fn render_floors(&self, floors: &[Floor]) -> Vec<FloorGeometry> {
        floors.par_iter().map(|floor| self.render_floor(floor)).collect()
    }

    /// Resolved hole rectangles of one floor, for consumers that need no solids
    pub fn holes(&self, floor: &Floor) -> Vec<Hole> {
        self.assembler(floor).holes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::OverlayBackend;

    const PLAN: &str = r#"{
        "floors": [
            {"name": "ground", "rooms": [
                {"name": "a", "x": 0, "z": 0, "width": 10, "depth": 10},
                {"name": "b", "x": 5, "z": 10, "width": 10, "depth": 10}
            ]},
            {"name": "upper", "rooms": [
                {"name": "c", "x": 0, "z": 0, "width": 4, "depth": 4, "elevation": 3.0}
            ]}
        ],
        "connections": [
            {"from": {"room": "a", "wall": "bottom"}, "to": {"room": "b", "wall": "top"}, "type": "door"},
            {"from": {"room": "c", "wall": "left"}, "to": {"room": "a", "wall": "left"}, "type": "window"}
        ]
    }"#;

    #[test]
    fn test_render_floors_in_order() {
        let plan = FloorPlan::from_json(PLAN).unwrap();
        let planner = FloorPlanner::from_plan(&plan).with_backend(Arc::new(OverlayBackend));

        let floors = planner.render_floors(&plan.floors);
        assert_eq!(floors.len(), 2);
        assert_eq!(floors[0].floor, "ground");
        assert_eq!(floors[1].floor, "upper");
        assert_eq!(floors[1].walls.len(), 4);
    }

    #[test]
    fn test_holes_per_floor() {
        let plan = FloorPlan::from_json(PLAN).unwrap();
        let planner = FloorPlanner::from_plan(&plan).with_backend(Arc::new(OverlayBackend));

        let ground = planner.holes(plan.floor("ground").unwrap());
        assert_eq!(ground.len(), 1);
        assert!((ground[0].center() - 7.5).abs() < 1e-9);

        // "c" started the window and "a" is on another floor
        let upper = planner.holes(plan.floor("upper").unwrap());
        assert_eq!(upper.len(), 1);
        assert_eq!(upper[0].room, "c");
        assert_eq!(upper[0].elevation, 3.0);
    }

    #[test]
    fn test_planner_is_sync() {
        fn assert_sync<T: Sync>() {}
        assert_sync::<FloorPlanner<'static>>();
    }
}
