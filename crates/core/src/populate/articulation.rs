//! Chokepoint and room-connectivity checks built on the reachability engine.
//!
//! The exact articulation test serves hazards, hazard controls and puzzles.
//! Generators use the coarser room-loss heuristic in [`is_chokepoint`].

use std::collections::BTreeSet;

use crate::entities::Entity;
use crate::grid::Grid;
use crate::types::Pos;

use super::reachability::{reachable, reachable_excluding, reachable_with_locked};
use super::topology::passage_cells;

/// Whether blocking `cell` loses more of the reachable map than `cell` itself.
/// Cells outside the current reachable set are never articulation points.
pub fn is_articulation_point(
    grid: &Grid,
    start: Pos,
    locked: &BTreeSet<Pos>,
    cell: Pos,
) -> bool {
    let full = reachable_with_locked(grid, start, locked);
    if !full.contains(&cell) {
        return false;
    }
    let without_cell = reachable_excluding(grid, start, locked, cell);
    without_cell.len() + 1 < full.len()
}

/// Coarse generator-placement test: blocking `cell` cuts off more than a
/// tenth of the named rooms the player can currently reach.
pub fn is_chokepoint(grid: &Grid, start: Pos, locked: &BTreeSet<Pos>, cell: Pos) -> bool {
    let full = reachable_with_locked(grid, start, locked);
    if !full.contains(&cell) {
        return false;
    }
    let rooms_before = reached_room_names(grid, &full).len();
    let rooms_after =
        reached_room_names(grid, &reachable_excluding(grid, start, locked, cell)).len();
    let lost = rooms_before.saturating_sub(rooms_after);
    lost * 10 > rooms_before
}

fn reached_room_names<'a>(grid: &'a Grid, reached: &BTreeSet<Pos>) -> BTreeSet<&'a str> {
    reached.iter().filter_map(|&pos| grid.room_of(pos)).collect()
}

/// Whether the doorways of `room` stay mutually walkable through the room
/// when every cell holding an entity, plus `candidate`, is blocked.
///
/// Cells on a wall shared with another named room count as doorways too,
/// since the player can cross there. A doorway that is itself blocked drops
/// out of the requirement; the check is about the doorways that are still
/// usable reaching each other.
pub fn room_still_connected_if_block(
    grid: &Grid,
    room: &str,
    entries: &[Pos],
    candidate: Option<Pos>,
) -> bool {
    let doorways = passage_cells(grid, room, entries);
    if doorways.is_empty() {
        return true;
    }
    let blocked = room_blockers(grid, room, candidate);
    let required: BTreeSet<Pos> = doorways.difference(&blocked).copied().collect();
    let Some(&first) = required.first() else {
        return true;
    };
    let walked = walk_room(grid, room, first, &blocked);
    required.is_subset(&walked)
}

/// Whether, with `candidate` blocked, the room's anchors stay usable from
/// its doorways: pickups and the start/exit cells must be walkable, and
/// every interactive entity, the candidate included, must keep a walkable
/// neighbour.
pub fn room_access_kept_if_block(
    grid: &Grid,
    room: &str,
    entries: &[Pos],
    candidate: Option<Pos>,
) -> bool {
    if passage_cells(grid, room, entries).is_empty() {
        return true;
    }
    let walked = walkable_from_doorways(grid, room, entries, candidate);
    let has_walked_neighbor =
        |pos: Pos| grid.neighbors(pos).any(|neighbor| walked.contains(&neighbor.pos));
    if candidate.is_some_and(|pos| !has_walked_neighbor(pos)) {
        return false;
    }

    let endpoints = [grid.start(), grid.exit()];
    for pos in grid.room_cells(room) {
        let Some(cell) = grid.cell(pos) else {
            continue;
        };
        let must_walk = !cell.items.is_empty() || endpoints.contains(&Some(pos));
        if must_walk && !walked.contains(&pos) {
            return false;
        }
        let interactive =
            cell.content.as_ref().is_some_and(|entity| !matches!(entity, Entity::Furniture(_)));
        if interactive && !has_walked_neighbor(pos) {
            return false;
        }
    }
    true
}

/// Room cells a player entering through any usable doorway can stand on,
/// with entity cells and `candidate` blocked.
pub fn walkable_from_doorways(
    grid: &Grid,
    room: &str,
    entries: &[Pos],
    candidate: Option<Pos>,
) -> BTreeSet<Pos> {
    let blocked = room_blockers(grid, room, candidate);
    let mut walked = BTreeSet::new();
    for doorway in passage_cells(grid, room, entries) {
        if !blocked.contains(&doorway) && !walked.contains(&doorway) {
            walked.extend(walk_room(grid, room, doorway, &blocked));
        }
    }
    walked
}

fn room_blockers(grid: &Grid, room: &str, candidate: Option<Pos>) -> BTreeSet<Pos> {
    let mut blocked: BTreeSet<Pos> = grid
        .cells()
        .filter(|cell| cell.belongs_to(room) && cell.has_entity())
        .map(|cell| cell.pos)
        .collect();
    blocked.extend(candidate);
    blocked
}

fn walk_room(grid: &Grid, room: &str, from: Pos, blocked: &BTreeSet<Pos>) -> BTreeSet<Pos> {
    reachable(grid, from, |cell| !cell.belongs_to(room) || blocked.contains(&cell.pos))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{CctvTerminal, Furniture, FurnitureKind, Item};
    use crate::populate::topology::find_room_entry_points;

    fn desk() -> Entity {
        Entity::Furniture(Furniture { kind: FurnitureKind::Desk })
    }

    // Two corridor rows flank a three-cell room, so all three cells are doorways.
    fn flanked_room() -> (Grid, Vec<Pos>) {
        let grid = Grid::from_ascii(&["...", "LLL", "..."], &[('L', "Lab")]);
        let entries = find_room_entry_points(&grid)["Lab"].clone();
        (grid, entries)
    }

    #[test]
    fn blocking_the_middle_of_a_flanked_room_splits_its_doorways() {
        let (grid, entries) = flanked_room();
        assert!(!room_still_connected_if_block(&grid, "Lab", &entries, Some(Pos { y: 1, x: 1 })));
    }

    #[test]
    fn blocking_either_end_of_a_flanked_room_keeps_it_connected() {
        let (grid, entries) = flanked_room();
        assert!(room_still_connected_if_block(&grid, "Lab", &entries, Some(Pos { y: 1, x: 0 })));
        assert!(room_still_connected_if_block(&grid, "Lab", &entries, Some(Pos { y: 1, x: 2 })));
        assert!(room_still_connected_if_block(&grid, "Lab", &entries, None));
    }

    #[test]
    fn existing_entities_count_as_blockers() {
        let (mut grid, entries) = flanked_room();
        assert!(grid.place_entity(Pos { y: 1, x: 1 }, desk()));
        assert!(!room_still_connected_if_block(&grid, "Lab", &entries, None));
    }

    #[test]
    fn room_without_doorways_is_trivially_connected() {
        let grid = Grid::from_ascii(&["###", "#V#", "###"], &[('V', "Vault")]);
        assert!(room_still_connected_if_block(&grid, "Vault", &[], Some(Pos { y: 1, x: 1 })));
        assert!(room_access_kept_if_block(&grid, "Vault", &[], Some(Pos { y: 1, x: 1 })));
    }

    fn tee() -> Grid {
        Grid::from_ascii(
            &["#########", "#AA...BB#", "####.####", "####C####"],
            &[('A', "Airlock"), ('B', "Bridge"), ('C', "Cargo Bay")],
        )
    }

    #[test]
    fn junction_cell_is_an_articulation_point() {
        let grid = tee();
        let start = Pos { y: 1, x: 1 };
        let locked = BTreeSet::new();
        assert!(is_articulation_point(&grid, start, &locked, Pos { y: 1, x: 4 }));
        assert!(is_articulation_point(&grid, start, &locked, Pos { y: 2, x: 4 }));
    }

    #[test]
    fn dead_end_cell_is_not_an_articulation_point() {
        let grid = tee();
        let start = Pos { y: 1, x: 1 };
        let locked = BTreeSet::new();
        assert!(!is_articulation_point(&grid, start, &locked, Pos { y: 3, x: 4 }));
        assert!(!is_articulation_point(&grid, start, &locked, Pos { y: 1, x: 7 }));
    }

    #[test]
    fn unreachable_cell_is_never_an_articulation_point() {
        let grid = tee();
        let start = Pos { y: 1, x: 1 };
        let locked = BTreeSet::from([Pos { y: 1, x: 3 }]);
        assert!(!is_articulation_point(&grid, start, &locked, Pos { y: 1, x: 4 }));
        assert!(!is_articulation_point(&grid, start, &locked, Pos { y: 0, x: 0 }));
    }

    #[test]
    fn chokepoint_heuristic_counts_lost_rooms_not_cells() {
        let grid = tee();
        let start = Pos { y: 1, x: 1 };
        let locked = BTreeSet::new();
        // Cutting (2,4) loses Cargo Bay: one room of three.
        assert!(is_chokepoint(&grid, start, &locked, Pos { y: 2, x: 4 }));
        // (1,2) is an articulation point of the Airlock but loses no room.
        assert!(is_articulation_point(&grid, start, &locked, Pos { y: 1, x: 2 }));
        assert!(!is_chokepoint(&grid, start, &locked, Pos { y: 1, x: 2 }));
    }

    #[test]
    fn access_check_keeps_pickups_and_terminals_reachable() {
        let mut grid = Grid::from_ascii(&["#####", "#LLL#", "#LLL#", "##.##"], &[('L', "Lab")]);
        let entries = find_room_entry_points(&grid)["Lab"].clone();
        assert!(grid.add_item(Pos { y: 1, x: 1 }, Item::Battery));
        assert!(grid.place_entity(
            Pos { y: 1, x: 3 },
            Entity::Cctv(CctvTerminal { room: "Lab".to_string() })
        ));

        // Walling off (1,1) from the doorway at (2,2) strands the battery.
        assert!(grid.place_entity(Pos { y: 2, x: 1 }, desk()));
        assert!(!room_access_kept_if_block(&grid, "Lab", &entries, Some(Pos { y: 1, x: 2 })));
        // The terminal at (1,3) still has (2,3) next to it.
        assert!(room_access_kept_if_block(&grid, "Lab", &entries, None));
        // Blocking (2,3) leaves the terminal's only open neighbour (1,2) walkable.
        assert!(room_access_kept_if_block(&grid, "Lab", &entries, Some(Pos { y: 2, x: 3 })));
    }
}
