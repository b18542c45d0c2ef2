// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Hole geometry
//!
//! Turns the openings a room wall is responsible for (an opening implied by
//! the wall's own type, or a connection this side renders) into axis-aligned
//! hole rectangles. Holes are placed in wall-local coordinates and carry the
//! world line of the wall so that a neighbor's solid on the same line can be
//! cut by the same hole.

use crate::connections::{find_matches, render_precedence, should_render, ConnectionMatch};
use crate::overlap::{position_with_fallback, Span};
use crate::ownership::{adjacent_rooms, wins_tie, ADJACENCY_EPSILON};
use floorplan_core::{
    Connection, FloorDefaults, OpeningPosition, OpeningType, Room, SwingSide, WallDirection,
    WallOrientation,
};
use nalgebra::Point3;
use tracing::debug;

/// Bottom/top within this distance of the floor/wall top count as touching it
const FLUSH_EPSILON: f64 = 1e-6;

/// Identity of the opening a hole came from
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OpeningKey {
    /// Opening implied by a door or window wall type
    WallSpec { room: String, wall: WallDirection },
    /// Index into the floorplan's connection list
    Connection(usize),
}

/// Axis-aligned cut through a wall
#[derive(Debug, Clone, PartialEq)]
pub struct Hole {
    pub key: OpeningKey,
    pub kind: OpeningType,
    /// Room and wall the hole was resolved for
    pub room: String,
    pub wall: WallDirection,
    pub orientation: WallOrientation,
    /// World coordinate of the wall line (z for horizontal walls, x for vertical)
    pub plane: f64,
    /// World coordinate where the wall run starts
    pub wall_start: f64,
    /// Hole center along the wall, from `wall_start`
    pub offset: f64,
    pub width: f64,
    pub height: f64,
    /// Vertical offset of the hole bottom from the floor
    pub bottom: f64,
    pub wall_height: f64,
    pub wall_thickness: f64,
    /// Cutter thickness across the wall
    pub depth: f64,
    /// Floor elevation of the room
    pub elevation: f64,
    pub swing_side: SwingSide,
    /// True if a door leaf swings into `room`
    pub opens_into_current: bool,
}

impl Hole {
    /// World coordinate of the hole center along the wall axis
    #[inline]
    pub fn center(&self) -> f64 {
        self.wall_start + self.offset
    }

    /// World range along the wall axis
    #[inline]
    pub fn range(&self) -> Span {
        let half = self.width * 0.5;
        Span::new(self.center() - half, self.center() + half)
    }

    #[inline]
    pub fn top(&self) -> f64 {
        self.bottom + self.height
    }

    #[inline]
    pub fn is_full_height(&self) -> bool {
        self.top() >= self.wall_height - FLUSH_EPSILON
    }

    /// World point at the middle of the hole, on the wall line
    pub fn world_center(&self) -> Point3<f64> {
        let y = self.elevation + self.bottom + self.height * 0.5;
        match self.orientation {
            WallOrientation::Horizontal => Point3::new(self.center(), y, self.plane),
            WallOrientation::Vertical => Point3::new(self.plane, y, self.center()),
        }
    }

    /// True if the hole lies on the wall line `plane` running along `orientation`
    pub fn shares_line(&self, orientation: WallOrientation, plane: f64) -> bool {
        self.orientation == orientation && (self.plane - plane).abs() <= ADJACENCY_EPSILON
    }

    /// Box removed from a wall solid, as world min/max corners
    ///
    /// A hole flush with the floor or the wall top is extended past it by
    /// `margin` so that no sliver face is left behind.
    pub fn cutter_box(&self, margin: f64) -> (Point3<f64>, Point3<f64>) {
        let range = self.range();
        let half_depth = self.depth * 0.5;

        let mut y0 = self.elevation + self.bottom;
        let mut y1 = self.elevation + self.top();
        if self.bottom <= FLUSH_EPSILON {
            y0 -= margin;
        }
        if self.is_full_height() {
            y1 += margin;
        }

        match self.orientation {
            WallOrientation::Horizontal => (
                Point3::new(range.start, y0, self.plane - half_depth),
                Point3::new(range.end, y1, self.plane + half_depth),
            ),
            WallOrientation::Vertical => (
                Point3::new(self.plane - half_depth, y0, range.start),
                Point3::new(self.plane + half_depth, y1, range.end),
            ),
        }
    }
}

/// Builds holes for one floor's rooms
pub struct HoleBuilder<'a> {
    defaults: &'a FloorDefaults,
    margin: f64,
}

impl<'a> HoleBuilder<'a> {
    pub fn new(defaults: &'a FloorDefaults, margin: f64) -> Self {
        Self { defaults, margin }
    }

    fn default_size(&self, kind: OpeningType) -> (f64, f64) {
        let d = self.defaults;
        match kind {
            OpeningType::Door => (d.door_width, d.door_height),
            OpeningType::DoubleDoor => (d.double_door_width, d.door_height),
            OpeningType::Window => (d.window_width, d.window_height),
            OpeningType::Opening => (d.opening_width, d.opening_height),
        }
    }

    /// Doors and passages stand on the floor, windows sit on the sill
    fn bottom_for(&self, kind: OpeningType, height: f64, wall_height: f64) -> f64 {
        match kind {
            OpeningType::Window => self
                .defaults
                .window_sill
                .min(wall_height - height)
                .max(0.0),
            _ => 0.0,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn hole(
        &self,
        key: OpeningKey,
        kind: OpeningType,
        room: &Room,
        wall: WallDirection,
        offset: f64,
        width: f64,
        height: f64,
        bottom: f64,
    ) -> Hole {
        let (wall_start, _) = room.bounds.wall_run(wall);
        let thickness = self.defaults.wall_thickness;
        Hole {
            key,
            kind,
            room: room.name.clone(),
            wall,
            orientation: wall.orientation(),
            plane: room.bounds.wall_plane(wall),
            wall_start,
            offset,
            width,
            height,
            bottom,
            wall_height: room.wall_height(wall, self.defaults),
            wall_thickness: thickness,
            depth: thickness + 2.0 * self.margin,
            elevation: room.elevation(),
            swing_side: SwingSide::default(),
            opens_into_current: true,
        }
    }

    /// Hole for the opening implied by the wall's own type, if any
    pub fn wall_spec_hole(&self, room: &Room, wall: WallDirection) -> Option<Hole> {
        let kind = room.wall_type(wall).opening()?;
        let spec = room.wall(wall);
        let length = room.bounds.wall_length(wall);
        let wall_height = room.wall_height(wall, self.defaults);
        let (default_width, default_height) = self.default_size(kind);

        let width = spec
            .and_then(|s| s.width)
            .unwrap_or(default_width)
            .min(length);
        let height = spec
            .and_then(|s| s.height)
            .unwrap_or(default_height)
            .min(wall_height);

        let offset = match spec.and_then(|s| s.position) {
            Some(OpeningPosition::Percent(p)) => length * p / 100.0,
            Some(OpeningPosition::Absolute(d)) => d,
            None => length * 0.5,
        };
        let half = width * 0.5;
        let offset = offset.min(length - half).max(half);

        Some(self.hole(
            OpeningKey::WallSpec {
                room: room.name.clone(),
                wall,
            },
            kind,
            room,
            wall,
            offset,
            width,
            height,
            self.bottom_for(kind, height, wall_height),
        ))
    }

    /// Hole for a connection matched on `room`'s `wall`
    ///
    /// The position is taken on the run shared with the other room when that
    /// room is on this floor, otherwise on the full wall.
    pub fn connection_hole(
        &self,
        room: &Room,
        wall: WallDirection,
        m: &ConnectionMatch<'_>,
        rooms: &[Room],
    ) -> Hole {
        let connection = m.connection;
        let kind = connection.opening_type;
        let length = room.bounds.wall_length(wall);
        let wall_height = room.wall_height(wall, self.defaults);
        let (default_width, default_height) = self.default_size(kind);

        let width = connection.width.unwrap_or(default_width).min(length);
        let (height, bottom) = if connection.full_height {
            (wall_height, 0.0)
        } else {
            let height = connection.height.unwrap_or(default_height).min(wall_height);
            (height, self.bottom_for(kind, height, wall_height))
        };

        let other = rooms.iter().find(|r| r.name == m.other_room);
        let center = position_with_fallback(
            &room.bounds,
            other.map(|r| &r.bounds),
            wall.orientation(),
            connection.position,
        );
        let (wall_start, _) = room.bounds.wall_run(wall);

        let mut hole = self.hole(
            OpeningKey::Connection(m.index),
            kind,
            room,
            wall,
            center - wall_start,
            width,
            height,
            bottom,
        );
        hole.swing_side = connection.swing.unwrap_or_default();
        hole.opens_into_current = connection
            .opens_into
            .as_deref()
            .map_or(true, |target| target == room.name);
        hole
    }

    /// Every hole `room`'s `wall` renders: its own opening plus the
    /// connections this side is responsible for
    pub fn holes_for_wall(
        &self,
        room: &Room,
        wall: WallDirection,
        rooms: &[Room],
        connections: &[Connection],
    ) -> Vec<Hole> {
        let wall_type = room.wall_type(wall);
        let mut holes: Vec<Hole> = self
            .wall_spec_hole(room, wall)
            .filter(|hole| !yields_to_neighbor(room, wall, hole, rooms, connections))
            .into_iter()
            .collect();

        let matches = find_matches(&room.name, wall, connections);
        let mut skipped = 0usize;
        for m in &matches {
            if should_render(m, wall_type, rooms) {
                holes.push(self.connection_hole(room, wall, m, rooms));
            } else {
                skipped += 1;
            }
        }

        if !holes.is_empty() || skipped > 0 {
            debug!(
                room = %room.name,
                wall = %wall,
                holes = holes.len(),
                skipped,
                "Resolved wall openings"
            );
        }
        holes
    }
}

/// True if a neighbor sharing the run under `hole` declares an opening on
/// its facing wall and takes precedence over `room` there
///
/// Two rooms declaring a door on the same shared wall describe one door.
fn yields_to_neighbor(
    room: &Room,
    wall: WallDirection,
    hole: &Hole,
    rooms: &[Room],
    connections: &[Connection],
) -> bool {
    let own_kind = room.wall_type(wall).kind();
    let center = hole.center();

    adjacent_rooms(room, wall, rooms)
        .into_iter()
        .any(|(neighbor, span)| {
            let facing = neighbor.wall_type(wall.opposite());
            facing.opening().is_some()
                && center >= span.start - ADJACENCY_EPSILON
                && center <= span.end + ADJACENCY_EPSILON
                && !render_precedence(
                    own_kind,
                    facing.kind(),
                    wins_tie(room, wall, neighbor, connections),
                )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use floorplan_core::{Bounds, WallRef, WallSpec, WallType};

    fn door(from: (&str, WallDirection), to: (&str, WallDirection)) -> Connection {
        Connection::new(
            WallRef::new(from.0, from.1),
            WallRef::new(to.0, to.1),
            OpeningType::Door,
        )
    }

    fn floor() -> Vec<Room> {
        vec![
            Room::new("a", Bounds::new(0.0, 0.0, 10.0, 10.0)),
            Room::new("b", Bounds::new(5.0, 10.0, 10.0, 10.0)),
        ]
    }

    #[test]
    fn test_connection_on_shared_run() {
        let defaults = FloorDefaults::default();
        let builder = HoleBuilder::new(&defaults, 0.05);
        let rooms = floor();
        let connections = vec![door(("a", WallDirection::Bottom), ("b", WallDirection::Top))];

        let holes = builder.holes_for_wall(&rooms[0], WallDirection::Bottom, &rooms, &connections);
        assert_eq!(holes.len(), 1);

        let hole = &holes[0];
        assert_eq!(hole.key, OpeningKey::Connection(0));
        assert!((hole.center() - 7.5).abs() < 1e-9);
        assert!((hole.offset - 7.5).abs() < 1e-9);
        assert_eq!(hole.plane, 10.0);
        assert_eq!(hole.orientation, WallOrientation::Horizontal);
        assert_eq!(hole.width, defaults.door_width);
        assert_eq!(hole.height, defaults.door_height);
        assert_eq!(hole.bottom, 0.0);
        assert!((hole.depth - (defaults.wall_thickness + 0.1)).abs() < 1e-9);

        // The other endpoint does not render it
        let from_b = builder.holes_for_wall(&rooms[1], WallDirection::Top, &rooms, &connections);
        assert!(from_b.is_empty());
    }

    #[test]
    fn test_connection_without_overlap_falls_back() {
        let defaults = FloorDefaults::default();
        let builder = HoleBuilder::new(&defaults, 0.05);
        let rooms = vec![
            Room::new("a", Bounds::new(0.0, 0.0, 10.0, 10.0)),
            Room::new("b", Bounds::new(20.0, 10.0, 10.0, 10.0)),
        ];
        let connections = vec![door(("a", WallDirection::Bottom), ("b", WallDirection::Top))];

        let holes = builder.holes_for_wall(&rooms[0], WallDirection::Bottom, &rooms, &connections);
        assert!((holes[0].center() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_double_door_and_full_height() {
        let defaults = FloorDefaults::default();
        let builder = HoleBuilder::new(&defaults, 0.05);
        let rooms = vec![Room::new("a", Bounds::new(0.0, 0.0, 10.0, 10.0)).with_height(2.6)];
        let mut connection = door(("a", WallDirection::Left), ("garden", WallDirection::Right));
        connection.opening_type = OpeningType::DoubleDoor;
        let connection = connection.with_size(None, Some(2.0)).full_height();

        let holes = builder.holes_for_wall(&rooms[0], WallDirection::Left, &rooms, &[connection]);
        assert_eq!(holes.len(), 1);
        assert_eq!(holes[0].width, defaults.double_door_width);
        assert_eq!(holes[0].height, 2.6);
        assert_eq!(holes[0].bottom, 0.0);
        assert!(holes[0].is_full_height());
        assert_eq!(holes[0].orientation, WallOrientation::Vertical);
    }

    #[test]
    fn test_window_wall_spec() {
        let defaults = FloorDefaults::default();
        let builder = HoleBuilder::new(&defaults, 0.05);
        let room = Room::new("a", Bounds::new(2.0, 0.0, 8.0, 6.0)).with_wall_spec(
            WallSpec::new(WallDirection::Top, WallType::Window)
                .with_position(OpeningPosition::Percent(25.0)),
        );

        let hole = builder.wall_spec_hole(&room, WallDirection::Top).unwrap();
        assert_eq!(hole.kind, OpeningType::Window);
        assert_eq!(hole.bottom, defaults.window_sill);
        assert_eq!(hole.width, defaults.window_width);
        assert!((hole.offset - 2.0).abs() < 1e-9);
        assert!((hole.center() - 4.0).abs() < 1e-9);
        assert_eq!(
            hole.key,
            OpeningKey::WallSpec {
                room: "a".into(),
                wall: WallDirection::Top
            }
        );

        assert!(builder.wall_spec_hole(&room, WallDirection::Left).is_none());
    }

    #[test]
    fn test_wall_spec_door_defaults_to_midpoint() {
        let defaults = FloorDefaults::default();
        let builder = HoleBuilder::new(&defaults, 0.05);
        let room = Room::new("a", Bounds::new(0.0, 0.0, 4.0, 6.0))
            .with_wall_spec(
                WallSpec::new(WallDirection::Right, WallType::Door)
                    .with_opening_size(Some(1.0), None),
            );

        let hole = builder.wall_spec_hole(&room, WallDirection::Right).unwrap();
        assert_eq!(hole.offset, 3.0);
        assert_eq!(hole.plane, 4.0);
        assert_eq!(hole.width, 1.0);
        assert_eq!(hole.bottom, 0.0);
        assert_eq!(hole.range(), Span::new(2.5, 3.5));
    }

    #[test]
    fn test_shared_wall_spec_door_emitted_once() {
        let defaults = FloorDefaults::default();
        let builder = HoleBuilder::new(&defaults, 0.05);
        let rooms = vec![
            Room::new("a", Bounds::new(0.0, 0.0, 10.0, 10.0))
                .with_wall(WallDirection::Bottom, WallType::Door),
            Room::new("b", Bounds::new(0.0, 10.0, 20.0, 10.0))
                .with_wall(WallDirection::Top, WallType::Door),
        ];

        let from_a = builder.holes_for_wall(&rooms[0], WallDirection::Bottom, &rooms, &[]);
        assert_eq!(from_a.len(), 1);
        assert!((from_a[0].center() - 5.0).abs() < 1e-9);

        // b's door sits at x = 10, on the end of the run shared with a
        let from_b = builder.holes_for_wall(&rooms[1], WallDirection::Top, &rooms, &[]);
        assert!(from_b.is_empty());
    }

    #[test]
    fn test_wall_spec_door_past_shared_run_is_kept() {
        let defaults = FloorDefaults::default();
        let builder = HoleBuilder::new(&defaults, 0.05);
        let rooms = vec![
            Room::new("a", Bounds::new(0.0, 0.0, 10.0, 10.0))
                .with_wall(WallDirection::Bottom, WallType::Door),
            Room::new("b", Bounds::new(0.0, 10.0, 30.0, 10.0))
                .with_wall(WallDirection::Top, WallType::Door)
                .with_wall(WallDirection::Bottom, WallType::Door),
            Room::new("alcove", Bounds::new(10.0, 20.0, 10.0, 10.0)),
        ];

        let top = builder.holes_for_wall(&rooms[1], WallDirection::Top, &rooms, &[]);
        assert_eq!(top.len(), 1);
        assert!((top[0].center() - 15.0).abs() < 1e-9);

        // The alcove wins the tie but its facing wall has no door
        let bottom = builder.holes_for_wall(&rooms[1], WallDirection::Bottom, &rooms, &[]);
        assert_eq!(bottom.len(), 1);
        assert!((bottom[0].center() - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_window_sill_fits_low_wall() {
        let defaults = FloorDefaults::default();
        let builder = HoleBuilder::new(&defaults, 0.05);
        let room = Room::new("a", Bounds::new(0.0, 0.0, 4.0, 4.0))
            .with_height(1.5)
            .with_wall(WallDirection::Top, WallType::Window);

        let hole = builder.wall_spec_hole(&room, WallDirection::Top).unwrap();
        assert!(hole.top() <= 1.5 + 1e-9);
        assert!((hole.bottom - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_cutter_extends_past_floor_and_top() {
        let defaults = FloorDefaults::default();
        let builder = HoleBuilder::new(&defaults, 0.05);
        let rooms = vec![Room::new("a", Bounds::new(0.0, 0.0, 10.0, 10.0)).with_elevation(3.0)];
        let connection =
            door(("a", WallDirection::Bottom), ("b", WallDirection::Top)).full_height();

        let holes = builder.holes_for_wall(&rooms[0], WallDirection::Bottom, &rooms, &[connection]);
        let (min, max) = holes[0].cutter_box(0.05);
        assert!((min.y - 2.95).abs() < 1e-9);
        assert!((max.y - 6.05).abs() < 1e-9);
        assert!((min.z - 9.85).abs() < 1e-9);
        assert!((max.z - 10.15).abs() < 1e-9);
        assert!((min.x - 4.55).abs() < 1e-9);
    }

    #[test]
    fn test_opens_into() {
        let defaults = FloorDefaults::default();
        let builder = HoleBuilder::new(&defaults, 0.05);
        let rooms = floor();
        let connections = vec![door(("a", WallDirection::Bottom), ("b", WallDirection::Top))
            .with_swing(SwingSide::Right, Some("b".into()))];

        let holes = builder.holes_for_wall(&rooms[0], WallDirection::Bottom, &rooms, &connections);
        assert_eq!(holes[0].swing_side, SwingSide::Right);
        assert!(!holes[0].opens_into_current);
    }
}
