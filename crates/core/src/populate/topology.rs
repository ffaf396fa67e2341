//! Room topology index: which corridor cells enter which room, and which
//! rooms neighbour each other directly or along a corridor.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::grid::Grid;
use crate::types::Pos;

/// Room name to the corridor cells bordering that room, in ascending order.
pub type RoomEntryPoints = BTreeMap<String, Vec<Pos>>;

pub fn find_room_entry_points(grid: &Grid) -> RoomEntryPoints {
    let mut entries: BTreeMap<String, BTreeSet<Pos>> = BTreeMap::new();
    for cell in grid.cells().filter(|cell| cell.is_corridor()) {
        for neighbor in grid.neighbors(cell.pos) {
            if neighbor.is_named_room() {
                entries.entry(neighbor.room_name.clone()).or_default().insert(cell.pos);
            }
        }
    }
    entries.into_iter().map(|(room, cells)| (room, cells.into_iter().collect())).collect()
}

/// Room-side cells touching one of `entries`.
pub fn doorway_cells(grid: &Grid, room: &str, entries: &[Pos]) -> BTreeSet<Pos> {
    entries
        .iter()
        .flat_map(|&entry| grid.neighbors(entry))
        .filter(|cell| cell.belongs_to(room))
        .map(|cell| cell.pos)
        .collect()
}

/// Cells through which a player moves between `room` and the rest of the
/// station: the doorways, plus room cells sharing a wall with a different
/// named room.
pub fn passage_cells(grid: &Grid, room: &str, entries: &[Pos]) -> BTreeSet<Pos> {
    let mut passages = doorway_cells(grid, room, entries);
    for pos in grid.room_cells(room) {
        let touches_other_room = grid
            .neighbors(pos)
            .any(|neighbor| neighbor.is_named_room() && !neighbor.belongs_to(room));
        if touches_other_room {
            passages.insert(pos);
        }
    }
    passages
}

/// `room` itself plus every room sharing a wall with it or joined to it by a
/// run of corridor cells. Sorted.
pub fn adjacent_room_names(grid: &Grid, room: &str) -> Vec<String> {
    let mut adjacent = BTreeSet::from([room.to_string()]);
    let mut corridor_seen = BTreeSet::new();
    let mut queue = VecDeque::new();

    for pos in grid.room_cells(room) {
        for neighbor in grid.neighbors(pos) {
            if neighbor.is_corridor() {
                if corridor_seen.insert(neighbor.pos) {
                    queue.push_back(neighbor.pos);
                }
            } else if neighbor.is_named_room() {
                adjacent.insert(neighbor.room_name.clone());
            }
        }
    }

    while let Some(current) = queue.pop_front() {
        for neighbor in grid.neighbors(current) {
            if neighbor.is_corridor() {
                if corridor_seen.insert(neighbor.pos) {
                    queue.push_back(neighbor.pos);
                }
            } else if neighbor.is_named_room() {
                adjacent.insert(neighbor.room_name.clone());
            }
        }
    }

    adjacent.into_iter().collect()
}
