// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core floorplan model: rooms, their walls and the connections between them
//!
//! Plan coordinates are `x` (east) and `z` (south, screen-down). A room's
//! `top` wall sits at its minimum `z`, `bottom` at its maximum `z`, `left` at
//! its minimum `x` and `right` at its maximum `x`. All dimensions are in one
//! base length unit.

use crate::defaults::FloorDefaults;
use serde::{Deserialize, Serialize};

/// Axis-aligned room rectangle in plan coordinates
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Bounds {
    pub x: f64,
    pub z: f64,
    pub width: f64,
    pub depth: f64,
}

impl Bounds {
    pub fn new(x: f64, z: f64, width: f64, depth: f64) -> Self {
        Self { x, z, width, depth }
    }

    #[inline]
    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    #[inline]
    pub fn max_z(&self) -> f64 {
        self.z + self.depth
    }

    /// Project the rectangle onto the axis a wall of `orientation` runs along
    ///
    /// Horizontal walls run along X, vertical walls along Z.
    #[inline]
    pub fn span(&self, orientation: WallOrientation) -> (f64, f64) {
        match orientation {
            WallOrientation::Horizontal => (self.x, self.max_x()),
            WallOrientation::Vertical => (self.z, self.max_z()),
        }
    }

    /// Start and end of the wall run on `direction`, along the wall's axis
    #[inline]
    pub fn wall_run(&self, direction: WallDirection) -> (f64, f64) {
        self.span(direction.orientation())
    }

    /// Full length of the wall on `direction`
    #[inline]
    pub fn wall_length(&self, direction: WallDirection) -> f64 {
        let (start, end) = self.wall_run(direction);
        end - start
    }

    /// Coordinate of the boundary line the wall on `direction` sits on
    ///
    /// A `z` value for horizontal walls, an `x` value for vertical walls.
    #[inline]
    pub fn wall_plane(&self, direction: WallDirection) -> f64 {
        match direction {
            WallDirection::Top => self.z,
            WallDirection::Bottom => self.max_z(),
            WallDirection::Left => self.x,
            WallDirection::Right => self.max_x(),
        }
    }
}

/// Which side of a room a wall is on
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum WallDirection {
    Top,
    Bottom,
    Left,
    Right,
}

impl WallDirection {
    pub const ALL: [WallDirection; 4] = [
        WallDirection::Top,
        WallDirection::Bottom,
        WallDirection::Left,
        WallDirection::Right,
    ];

    #[inline]
    pub fn orientation(self) -> WallOrientation {
        match self {
            WallDirection::Top | WallDirection::Bottom => WallOrientation::Horizontal,
            WallDirection::Left | WallDirection::Right => WallOrientation::Vertical,
        }
    }

    /// The wall of an adjacent room that faces this one
    #[inline]
    pub fn opposite(self) -> WallDirection {
        match self {
            WallDirection::Top => WallDirection::Bottom,
            WallDirection::Bottom => WallDirection::Top,
            WallDirection::Left => WallDirection::Right,
            WallDirection::Right => WallDirection::Left,
        }
    }

    /// Unit plan vector `(x, z)` pointing out of the room through this wall
    #[inline]
    pub fn outward(self) -> (f64, f64) {
        match self {
            WallDirection::Top => (0.0, -1.0),
            WallDirection::Bottom => (0.0, 1.0),
            WallDirection::Left => (-1.0, 0.0),
            WallDirection::Right => (1.0, 0.0),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WallDirection::Top => "top",
            WallDirection::Bottom => "bottom",
            WallDirection::Left => "left",
            WallDirection::Right => "right",
        }
    }
}

impl std::fmt::Display for WallDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Plan orientation of a wall run
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum WallOrientation {
    /// Runs along X (top and bottom walls)
    Horizontal,
    /// Runs along Z (left and right walls)
    Vertical,
}

/// Declared type of one room wall
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum WallType {
    #[default]
    Solid,
    Open,
    Door,
    Window,
}

/// Rendering class of a wall type: either it carries material or it doesn't
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WallKind {
    Open,
    Solid,
}

impl WallType {
    #[inline]
    pub fn kind(self) -> WallKind {
        match self {
            WallType::Open => WallKind::Open,
            WallType::Solid | WallType::Door | WallType::Window => WallKind::Solid,
        }
    }

    /// Opening implied by the wall type itself
    #[inline]
    pub fn opening(self) -> Option<OpeningType> {
        match self {
            WallType::Door => Some(OpeningType::Door),
            WallType::Window => Some(OpeningType::Window),
            WallType::Solid | WallType::Open => None,
        }
    }
}

/// Kind of opening carried by a connection or a wall
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum OpeningType {
    Door,
    DoubleDoor,
    Window,
    /// Plain passage without a door leaf or glazing
    Opening,
}

impl OpeningType {
    #[inline]
    pub fn is_door(self) -> bool {
        matches!(self, OpeningType::Door | OpeningType::DoubleDoor)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OpeningType::Door => "door",
            OpeningType::DoubleDoor => "double-door",
            OpeningType::Window => "window",
            OpeningType::Opening => "opening",
        }
    }
}

/// Horizontal placement override for an explicit wall opening
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum OpeningPosition {
    /// Percentage of the wall run, measured from the wall start
    Percent(f64),
    /// Distance of the opening center from the wall start
    Absolute(f64),
}

/// Hinge side of a door, as seen from the room it swings into
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SwingSide {
    #[default]
    Left,
    Right,
}

/// Declaration of one room wall
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WallSpec {
    pub direction: WallDirection,
    #[serde(rename = "type", default)]
    pub wall_type: WallType,
    /// Opening width override (door/window walls)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// Opening height override (door/window walls)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<OpeningPosition>,
    /// Wall height for this wall only, overriding the room height
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wall_height: Option<f64>,
}

impl WallSpec {
    pub fn new(direction: WallDirection, wall_type: WallType) -> Self {
        Self {
            direction,
            wall_type,
            width: None,
            height: None,
            position: None,
            wall_height: None,
        }
    }

    pub fn with_opening_size(mut self, width: Option<f64>, height: Option<f64>) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_position(mut self, position: OpeningPosition) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_wall_height(mut self, height: f64) -> Self {
        self.wall_height = Some(height);
        self
    }
}

/// A named rectangular room with one wall declaration per side
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Room {
    pub name: String,
    #[serde(flatten)]
    pub bounds: Bounds,
    #[serde(default)]
    pub walls: Vec<WallSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation: Option<f64>,
    /// Finish style name, resolved through a `FinishResolver`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

impl Room {
    /// Create a room whose four walls are solid
    pub fn new(name: impl Into<String>, bounds: Bounds) -> Self {
        Self {
            name: name.into(),
            bounds,
            walls: WallDirection::ALL
                .iter()
                .map(|&direction| WallSpec::new(direction, WallType::Solid))
                .collect(),
            height: None,
            elevation: None,
            style: None,
        }
    }

    /// Replace the declaration for one wall
    pub fn with_wall_spec(mut self, spec: WallSpec) -> Self {
        self.walls.retain(|w| w.direction != spec.direction);
        self.walls.push(spec);
        self
    }

    pub fn with_wall(self, direction: WallDirection, wall_type: WallType) -> Self {
        self.with_wall_spec(WallSpec::new(direction, wall_type))
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    pub fn with_height(mut self, height: f64) -> Self {
        self.height = Some(height);
        self
    }

    pub fn with_elevation(mut self, elevation: f64) -> Self {
        self.elevation = Some(elevation);
        self
    }

    #[inline]
    pub fn wall(&self, direction: WallDirection) -> Option<&WallSpec> {
        self.walls.iter().find(|w| w.direction == direction)
    }

    /// Declared type of the wall on `direction`; an undeclared wall is solid
    #[inline]
    pub fn wall_type(&self, direction: WallDirection) -> WallType {
        self.wall(direction).map(|w| w.wall_type).unwrap_or_default()
    }

    #[inline]
    pub fn elevation(&self) -> f64 {
        self.elevation.unwrap_or(0.0)
    }

    /// Wall height: per-wall override, then room height, then floor default
    pub fn wall_height(&self, direction: WallDirection, defaults: &FloorDefaults) -> f64 {
        self.wall(direction)
            .and_then(|w| w.wall_height)
            .or(self.height)
            .unwrap_or(defaults.wall_height)
    }
}

/// One endpoint of a connection: a room and one of its walls
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct WallRef {
    pub room: String,
    pub wall: WallDirection,
}

impl WallRef {
    pub fn new(room: impl Into<String>, wall: WallDirection) -> Self {
        Self {
            room: room.into(),
            wall,
        }
    }

    #[inline]
    pub fn is(&self, room: &str, wall: WallDirection) -> bool {
        self.room == room && self.wall == wall
    }
}

fn default_position() -> f64 {
    50.0
}

/// A door, window or passage joining two room walls
///
/// Neither room owns a connection up front; which side renders it is decided
/// at render time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Connection {
    pub from: WallRef,
    pub to: WallRef,
    #[serde(rename = "type")]
    pub opening_type: OpeningType,
    /// Percentage along the shared wall run
    #[serde(default = "default_position")]
    pub position: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swing: Option<SwingSide>,
    /// Name of the room the door swings into
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opens_into: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// Opening spans the whole wall height; any height override is ignored
    #[serde(default)]
    pub full_height: bool,
}

impl Connection {
    pub fn new(from: WallRef, to: WallRef, opening_type: OpeningType) -> Self {
        Self {
            from,
            to,
            opening_type,
            position: default_position(),
            swing: None,
            opens_into: None,
            width: None,
            height: None,
            full_height: false,
        }
    }

    pub fn at(mut self, percent: f64) -> Self {
        self.position = percent;
        self
    }

    pub fn with_size(mut self, width: Option<f64>, height: Option<f64>) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_swing(mut self, side: SwingSide, opens_into: Option<String>) -> Self {
        self.swing = Some(side);
        self.opens_into = opens_into;
        self
    }

    pub fn full_height(mut self) -> Self {
        self.full_height = true;
        self
    }

    /// True if either endpoint names `room`
    #[inline]
    pub fn touches(&self, room: &str) -> bool {
        self.from.room == room || self.to.room == room
    }
}
