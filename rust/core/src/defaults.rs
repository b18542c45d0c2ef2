// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Floor-level dimension defaults

use serde::{Deserialize, Serialize};

/// Default wall and opening dimensions for one floorplan
///
/// Any field missing from a JSON document takes its default value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FloorDefaults {
    /// Wall thickness, centered on the room boundary line
    pub wall_thickness: f64,
    /// Wall height when neither the wall nor the room overrides it
    pub wall_height: f64,
    pub door_width: f64,
    pub door_height: f64,
    pub double_door_width: f64,
    pub window_width: f64,
    pub window_height: f64,
    /// Height of the window sill above the floor
    pub window_sill: f64,
    pub opening_width: f64,
    pub opening_height: f64,
}

impl Default for FloorDefaults {
    fn default() -> Self {
        Self {
            wall_thickness: 0.2,
            wall_height: 3.0,
            door_width: 0.9,
            door_height: 2.1,
            double_door_width: 1.8,
            window_width: 1.2,
            window_height: 1.2,
            window_sill: 0.9,
            opening_width: 1.0,
            opening_height: 2.1,
        }
    }
}
