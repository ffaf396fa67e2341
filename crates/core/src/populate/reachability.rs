//! Breadth-first reachability over room cells under a pluggable blocking
//! predicate. Every placement proof in the planner is built from these.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::grid::{Cell, Grid};
use crate::types::Pos;

/// Room cells reachable from `start` without stepping on a cell for which
/// `is_blocked` holds. An out-of-bounds, non-room or blocked start yields an
/// empty set.
pub fn reachable<F>(grid: &Grid, start: Pos, is_blocked: F) -> BTreeSet<Pos>
where
    F: Fn(&Cell) -> bool,
{
    reachable_distances(grid, start, is_blocked).into_keys().collect()
}

/// Same traversal as [`reachable`], keeping the BFS step count to each cell.
pub fn reachable_distances<F>(grid: &Grid, start: Pos, is_blocked: F) -> BTreeMap<Pos, u32>
where
    F: Fn(&Cell) -> bool,
{
    let mut distances = BTreeMap::new();
    let Some(start_cell) = grid.cell(start) else {
        return distances;
    };
    if !start_cell.is_room || is_blocked(start_cell) {
        return distances;
    }

    let mut queue = VecDeque::from([start]);
    distances.insert(start, 0);
    while let Some(current) = queue.pop_front() {
        let next_distance = distances[&current] + 1;
        for neighbor in grid.neighbors(current) {
            if !neighbor.is_room || distances.contains_key(&neighbor.pos) || is_blocked(neighbor) {
                continue;
            }
            distances.insert(neighbor.pos, next_distance);
            queue.push_back(neighbor.pos);
        }
    }
    distances
}

/// Reachable set with every cell in `locked` impassable.
pub fn reachable_with_locked(grid: &Grid, start: Pos, locked: &BTreeSet<Pos>) -> BTreeSet<Pos> {
    reachable(grid, start, |cell| locked.contains(&cell.pos))
}

/// Reachable set with `locked` and one extra cell impassable.
pub fn reachable_excluding(
    grid: &Grid,
    start: Pos,
    locked: &BTreeSet<Pos>,
    excluded: Pos,
) -> BTreeSet<Pos> {
    reachable(grid, start, |cell| cell.pos == excluded || locked.contains(&cell.pos))
}

/// Reachable set when the player cannot yet enter `room`: every door leading
/// into it is impassable whether or not it is locked.
pub fn reachable_without_entering(
    grid: &Grid,
    start: Pos,
    locked: &BTreeSet<Pos>,
    room: &str,
) -> BTreeSet<Pos> {
    reachable(grid, start, |cell| {
        locked.contains(&cell.pos) || cell.door().is_some_and(|door| door.room == room)
    })
}
