// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Floorplan document: floors of rooms, connections, defaults and styles

use crate::defaults::FloorDefaults;
use crate::error::{Error, Result};
use crate::finish::StyleTable;
use crate::model::{Connection, Room};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Rooms sharing one elevation band
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Floor {
    pub name: String,
    #[serde(default)]
    pub rooms: Vec<Room>,
}

impl Floor {
    pub fn new(name: impl Into<String>, rooms: Vec<Room>) -> Self {
        Self {
            name: name.into(),
            rooms,
        }
    }

    pub fn room(&self, name: &str) -> Option<&Room> {
        self.rooms.iter().find(|r| r.name == name)
    }
}

/// A resolved floorplan, as produced by the parser and position resolver
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FloorPlan {
    #[serde(default)]
    pub defaults: FloorDefaults,
    #[serde(default)]
    pub styles: StyleTable,
    #[serde(default)]
    pub floors: Vec<Floor>,
    /// Connections across all floors
    #[serde(default)]
    pub connections: Vec<Connection>,
}

impl FloorPlan {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn floor(&self, name: &str) -> Result<&Floor> {
        self.floors
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| Error::UnknownFloor(name.to_string()))
    }

    /// Connections with at least one endpoint on `floor`
    pub fn connections_for<'a>(&'a self, floor: &'a Floor) -> impl Iterator<Item = &'a Connection> {
        self.connections
            .iter()
            .filter(move |c| floor.rooms.iter().any(|r| c.touches(&r.name)))
    }

    pub fn room_count(&self) -> usize {
        self.floors.iter().map(|f| f.rooms.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{OpeningType, WallDirection};
    use crate::FinishResolver;

    const PLAN: &str = r#"{
        "defaults": {"wall_height": 2.8},
        "styles": {
            "fallback": {"name": "plaster", "color": [1.0, 1.0, 1.0, 1.0]},
            "styles": {"wood": {"name": "wood", "color": [0.6, 0.4, 0.2, 1.0]}}
        },
        "floors": [
            {"name": "ground", "rooms": [
                {"name": "a", "x": 0, "z": 0, "width": 10, "depth": 10, "style": "wood"},
                {"name": "b", "x": 5, "z": 10, "width": 10, "depth": 10}
            ]},
            {"name": "upper", "rooms": [
                {"name": "c", "x": 0, "z": 0, "width": 4, "depth": 4}
            ]}
        ],
        "connections": [
            {"from": {"room": "a", "wall": "bottom"}, "to": {"room": "b", "wall": "top"}, "type": "door"}
        ]
    }"#;

    #[test]
    fn test_load_plan() {
        let plan = FloorPlan::from_json(PLAN).unwrap();
        assert_eq!(plan.floors.len(), 2);
        assert_eq!(plan.room_count(), 3);
        assert_eq!(plan.defaults.wall_height, 2.8);
        assert_eq!(plan.defaults.wall_thickness, 0.2);
        assert_eq!(plan.connections[0].opening_type, OpeningType::Door);
        assert_eq!(plan.connections[0].from.wall, WallDirection::Bottom);

        let ground = plan.floor("ground").unwrap();
        assert!(ground.room("b").is_some());
        assert!(ground.room("c").is_none());

        assert_eq!(plan.styles.resolve(Some("wood")).name, "wood");
        assert_eq!(plan.styles.resolve(None).name, "plaster");
    }

    #[test]
    fn test_connections_for_floor() {
        let plan = FloorPlan::from_json(PLAN).unwrap();
        let ground = plan.floor("ground").unwrap();
        let upper = plan.floor("upper").unwrap();
        assert_eq!(plan.connections_for(ground).count(), 1);
        assert_eq!(plan.connections_for(upper).count(), 0);
    }

    #[test]
    fn test_unknown_floor() {
        let plan = FloorPlan::from_json(PLAN).unwrap();
        assert!(matches!(plan.floor("attic"), Err(Error::UnknownFloor(_))));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(FloorPlan::from_json("{"), Err(Error::Json(_))));
    }
}
