// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Connection matching and render deduplication
//!
//! Every connection is seen from both of its endpoints. Exactly one of them
//! is responsible for the opening, decided by the precedence table in
//! [`render_precedence`].

use floorplan_core::{Connection, Room, WallDirection, WallKind, WallType};
use smallvec::SmallVec;

/// Which endpoint of a connection matched the queried wall
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchedSide {
    From,
    To,
}

/// A connection touching one (room, wall) pair
#[derive(Debug, Clone, Copy)]
pub struct ConnectionMatch<'a> {
    /// Index into the connection slice the match was found in
    pub index: usize,
    pub connection: &'a Connection,
    pub side: MatchedSide,
    pub other_room: &'a str,
    pub other_wall: WallDirection,
}

impl ConnectionMatch<'_> {
    #[inline]
    pub fn is_from(&self) -> bool {
        self.side == MatchedSide::From
    }
}

/// Matches per wall rarely exceed a handful
pub type Matches<'a> = SmallVec<[ConnectionMatch<'a>; 4]>;

/// Every connection naming `room`/`wall` as its from or to endpoint
pub fn find_matches<'a>(
    room: &str,
    wall: WallDirection,
    connections: &'a [Connection],
) -> Matches<'a> {
    connections
        .iter()
        .enumerate()
        .filter_map(|(index, connection)| {
            if connection.from.is(room, wall) {
                Some(ConnectionMatch {
                    index,
                    connection,
                    side: MatchedSide::From,
                    other_room: &connection.to.room,
                    other_wall: connection.to.wall,
                })
            } else if connection.to.is(room, wall) {
                Some(ConnectionMatch {
                    index,
                    connection,
                    side: MatchedSide::To,
                    other_room: &connection.from.room,
                    other_wall: connection.from.wall,
                })
            } else {
                None
            }
        })
        .collect()
}

/// Does the current side of a shared run take responsibility for it?
///
/// | current | other | current renders      |
/// |---------|-------|----------------------|
/// | open    | open  | only on the tie side |
/// | open    | solid | no                   |
/// | solid   | open  | yes                  |
/// | solid   | solid | only on the tie side |
///
/// Swapping current/other and flipping `wins_tie` always flips the answer,
/// so exactly one of two facing sides renders.
#[inline]
pub fn render_precedence(current: WallKind, other: WallKind, wins_tie: bool) -> bool {
    match (current, other) {
        (WallKind::Open, WallKind::Open) => wins_tie,
        (WallKind::Open, WallKind::Solid) => false,
        (WallKind::Solid, WallKind::Open) => true,
        (WallKind::Solid, WallKind::Solid) => wins_tie,
    }
}

/// Type of the wall on the other end of a match
///
/// When the other room is not on this floor the from side is assumed solid
/// and the to side open, so the initiating side always renders.
pub fn other_wall_type(m: &ConnectionMatch<'_>, rooms: &[Room]) -> WallType {
    match rooms.iter().find(|r| r.name == m.other_room) {
        Some(room) => room.wall_type(m.other_wall),
        None => match m.side {
            // The other end is the to side
            MatchedSide::From => WallType::Open,
            MatchedSide::To => WallType::Solid,
        },
    }
}

/// Whether the opening for `m` is emitted on the current wall
pub fn should_render(m: &ConnectionMatch<'_>, current: WallType, rooms: &[Room]) -> bool {
    let other = other_wall_type(m, rooms);
    render_precedence(current.kind(), other.kind(), m.is_from())
}

#[cfg(test)]
mod tests {
    use super::*;
    use floorplan_core::{Bounds, OpeningType, WallRef};

    fn conn(from: (&str, WallDirection), to: (&str, WallDirection)) -> Connection {
        Connection::new(
            WallRef::new(from.0, from.1),
            WallRef::new(to.0, to.1),
            OpeningType::Door,
        )
    }

    fn rooms(a_bottom: WallType, b_top: WallType) -> Vec<Room> {
        vec![
            Room::new("a", Bounds::new(0.0, 0.0, 10.0, 10.0))
                .with_wall(WallDirection::Bottom, a_bottom),
            Room::new("b", Bounds::new(0.0, 10.0, 10.0, 10.0)).with_wall(WallDirection::Top, b_top),
        ]
    }

    #[test]
    fn test_find_matches_both_sides() {
        let connections = vec![
            conn(("a", WallDirection::Bottom), ("b", WallDirection::Top)),
            conn(("c", WallDirection::Left), ("a", WallDirection::Bottom)),
            conn(("a", WallDirection::Right), ("d", WallDirection::Left)),
        ];

        let matches = find_matches("a", WallDirection::Bottom, &connections);
        assert_eq!(matches.len(), 2);

        assert_eq!(matches[0].index, 0);
        assert_eq!(matches[0].side, MatchedSide::From);
        assert_eq!(matches[0].other_room, "b");
        assert_eq!(matches[0].other_wall, WallDirection::Top);

        assert_eq!(matches[1].index, 1);
        assert_eq!(matches[1].side, MatchedSide::To);
        assert_eq!(matches[1].other_room, "c");
        assert_eq!(matches[1].other_wall, WallDirection::Left);

        assert!(find_matches("a", WallDirection::Top, &connections).is_empty());
    }

    #[test]
    fn test_precedence_table() {
        use WallKind::{Open, Solid};
        assert!(render_precedence(Open, Open, true));
        assert!(!render_precedence(Open, Open, false));
        assert!(!render_precedence(Open, Solid, true));
        assert!(!render_precedence(Open, Solid, false));
        assert!(render_precedence(Solid, Open, true));
        assert!(render_precedence(Solid, Open, false));
        assert!(render_precedence(Solid, Solid, true));
        assert!(!render_precedence(Solid, Solid, false));
    }

    #[test]
    fn test_precedence_is_antisymmetric() {
        use WallKind::{Open, Solid};
        for current in [Open, Solid] {
            for other in [Open, Solid] {
                for tie in [true, false] {
                    assert_ne!(
                        render_precedence(current, other, tie),
                        render_precedence(other, current, !tie),
                        "{:?}/{:?} tie={}",
                        current,
                        other,
                        tie
                    );
                }
            }
        }
    }

    #[test]
    fn test_exactly_one_endpoint_renders() {
        let types = [WallType::Solid, WallType::Open, WallType::Door, WallType::Window];
        let connections = vec![conn(("a", WallDirection::Bottom), ("b", WallDirection::Top))];

        for a_type in types {
            for b_type in types {
                let floor = rooms(a_type, b_type);
                let from = find_matches("a", WallDirection::Bottom, &connections);
                let to = find_matches("b", WallDirection::Top, &connections);

                let rendered = [
                    should_render(&from[0], a_type, &floor),
                    should_render(&to[0], b_type, &floor),
                ];
                assert_eq!(
                    rendered.iter().filter(|&&r| r).count(),
                    1,
                    "a={:?} b={:?}",
                    a_type,
                    b_type
                );
            }
        }
    }

    #[test]
    fn test_cross_floor_from_side_renders() {
        let connections = vec![conn(("a", WallDirection::Bottom), ("stairs", WallDirection::Top))];
        let floor = rooms(WallType::Open, WallType::Solid);

        let from = find_matches("a", WallDirection::Bottom, &connections);
        assert_eq!(other_wall_type(&from[0], &floor), WallType::Open);
        assert!(should_render(&from[0], WallType::Open, &floor));
        assert!(should_render(&from[0], WallType::Solid, &floor));
    }

    #[test]
    fn test_cross_floor_to_side_never_renders() {
        let connections = vec![conn(("lobby", WallDirection::Right), ("b", WallDirection::Top))];
        let floor = rooms(WallType::Solid, WallType::Solid);

        let to = find_matches("b", WallDirection::Top, &connections);
        assert_eq!(other_wall_type(&to[0], &floor), WallType::Solid);
        assert!(!should_render(&to[0], WallType::Open, &floor));
        assert!(!should_render(&to[0], WallType::Solid, &floor));
    }
}
