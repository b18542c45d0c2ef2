// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wall ownership analysis
//!
//! Splits one room wall into contiguous segments, one per neighbor sharing
//! the run plus the stretches with no neighbor, and decides for every segment
//! whether this room or the neighbor emits the solid. A shared run is emitted
//! by exactly one of the two rooms.

use crate::connections::render_precedence;
use crate::overlap::{overlap, Span};
use floorplan_core::{Connection, Finish, FinishResolver, Room, WallDirection, WallKind};
use tracing::debug;

/// Tolerance for two boundary lines to count as the same line
pub const ADJACENCY_EPSILON: f64 = 1e-6;

/// Segments shorter than this are merged away
const MIN_SEGMENT: f64 = 1e-9;

/// A contiguous piece of one wall run
///
/// `start`/`end` are world coordinates along the wall's axis (X for
/// horizontal walls, Z for vertical ones).
#[derive(Debug, Clone, PartialEq)]
pub struct WallSegment {
    pub start: f64,
    pub end: f64,
    /// This room's finish
    pub finish: Finish,
    pub has_adjacent_room: bool,
    pub neighbor: Option<String>,
    /// Finish for the face pointing into the neighbor
    pub neighbor_finish: Option<Finish>,
    /// True if this room emits the solid for this segment
    pub owned: bool,
}

impl WallSegment {
    #[inline]
    pub fn length(&self) -> f64 {
        self.end - self.start
    }

    #[inline]
    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }
}

/// Result of analyzing one room wall
#[derive(Debug, Clone, PartialEq)]
pub struct WallOwnership {
    /// True if any segment is owned by this room
    pub should_render: bool,
    pub segments: Vec<WallSegment>,
}

impl WallOwnership {
    pub fn owned_segments(&self) -> impl Iterator<Item = (usize, &WallSegment)> {
        self.segments.iter().enumerate().filter(|(_, s)| s.owned)
    }
}

struct Adjacency<'a> {
    room: &'a Room,
    span: Span,
}

/// Rooms whose facing wall lies on the same line as `room`'s `wall` and
/// shares a positive-length run with it
pub fn adjacent_rooms<'a>(
    room: &Room,
    wall: WallDirection,
    rooms: &'a [Room],
) -> Vec<(&'a Room, Span)> {
    let plane = room.bounds.wall_plane(wall);
    let facing = wall.opposite();

    rooms
        .iter()
        .filter(|other| other.name != room.name)
        .filter(|other| (other.bounds.wall_plane(facing) - plane).abs() <= ADJACENCY_EPSILON)
        .filter_map(|other| {
            overlap(&room.bounds, &other.bounds, wall.orientation()).map(|span| (other, span))
        })
        .collect()
}

/// Does `room` win a tie against `neighbor` on the shared run?
///
/// A connection joining the two facing walls decides in favor of its "from"
/// room. Without one, the room whose name sorts first wins.
pub fn wins_tie(room: &Room, wall: WallDirection, neighbor: &Room, connections: &[Connection]) -> bool {
    let facing = wall.opposite();
    let linking = connections.iter().find(|c| {
        (c.from.is(&room.name, wall) && c.to.is(&neighbor.name, facing))
            || (c.from.is(&neighbor.name, facing) && c.to.is(&room.name, wall))
    });

    match linking {
        Some(c) => c.from.room == room.name,
        None => room.name < neighbor.name,
    }
}

/// Partition `room`'s `wall` into ownership segments
pub fn analyze(
    room: &Room,
    wall: WallDirection,
    rooms: &[Room],
    connections: &[Connection],
    resolver: &dyn FinishResolver,
) -> WallOwnership {
    let (run_start, run_end) = room.bounds.wall_run(wall);
    let own_kind = room.wall_type(wall).kind();
    let own_finish = resolver.resolve(room.style.as_deref());

    let mut adjacent: Vec<Adjacency> = adjacent_rooms(room, wall, rooms)
        .into_iter()
        .map(|(room, span)| Adjacency { room, span })
        .collect();
    adjacent.sort_by(|a, b| {
        a.span
            .start
            .total_cmp(&b.span.start)
            .then_with(|| a.room.name.cmp(&b.room.name))
    });

    // Elementary intervals between every adjacency boundary
    let mut cuts: Vec<f64> = Vec::with_capacity(adjacent.len() * 2 + 2);
    cuts.push(run_start);
    cuts.push(run_end);
    for adj in &adjacent {
        cuts.push(adj.span.start.clamp(run_start, run_end));
        cuts.push(adj.span.end.clamp(run_start, run_end));
    }
    cuts.sort_by(f64::total_cmp);
    cuts.dedup_by(|a, b| (*a - *b).abs() <= MIN_SEGMENT);

    // (start, end, index into `adjacent`)
    let mut pieces: Vec<(f64, f64, Option<usize>)> = Vec::with_capacity(cuts.len());
    for window in cuts.windows(2) {
        let (start, end) = (window[0], window[1]);
        if end - start <= MIN_SEGMENT {
            continue;
        }
        let mid = (start + end) * 0.5;
        let owner = adjacent
            .iter()
            .position(|adj| adj.span.start <= mid && mid <= adj.span.end);

        match pieces.last_mut() {
            Some(last) if last.2 == owner => last.1 = end,
            _ => pieces.push((start, end, owner)),
        }
    }
    // Keep the run endpoints exact
    if let Some(first) = pieces.first_mut() {
        first.0 = run_start;
    }
    if let Some(last) = pieces.last_mut() {
        last.1 = run_end;
    }
    if pieces.is_empty() {
        pieces.push((run_start, run_end, None));
    }

    let segments: Vec<WallSegment> = pieces
        .into_iter()
        .map(|(start, end, owner)| match owner.map(|i| adjacent[i].room) {
            Some(neighbor) => {
                let other_kind = neighbor.wall_type(wall.opposite()).kind();
                let owned = own_kind == WallKind::Solid
                    && render_precedence(
                        own_kind,
                        other_kind,
                        wins_tie(room, wall, neighbor, connections),
                    );
                WallSegment {
                    start,
                    end,
                    finish: own_finish.clone(),
                    has_adjacent_room: true,
                    neighbor: Some(neighbor.name.clone()),
                    neighbor_finish: Some(resolver.resolve(neighbor.style.as_deref())),
                    owned,
                }
            }
            None => WallSegment {
                start,
                end,
                finish: own_finish.clone(),
                has_adjacent_room: false,
                neighbor: None,
                neighbor_finish: None,
                owned: own_kind == WallKind::Solid,
            },
        })
        .collect();

    let should_render = segments.iter().any(|s| s.owned);
    debug!(
        room = %room.name,
        wall = %wall,
        segments = segments.len(),
        neighbors = adjacent.len(),
        should_render,
        "Analyzed wall ownership"
    );

    WallOwnership {
        should_render,
        segments,
    }
}
