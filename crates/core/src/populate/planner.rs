//! Placement pipeline. Every stage selects candidates, proves the placement
//! keeps the level solvable, and only then commits it to the grid and the
//! placement sets. Later stages see everything earlier stages committed.

mod doors;
mod furniture;
mod hazards;
mod locks;
mod power;
mod puzzles;
mod terminals;
#[cfg(test)]
mod test_support;

use std::collections::BTreeSet;

use rand_chacha::{ChaCha8Rng, rand_core::Rng};

use crate::config::Difficulty;
use crate::entities::{Entity, EntityKind, Item};
use crate::grid::Grid;
use crate::types::Pos;

use super::articulation::{
    room_access_kept_if_block, room_still_connected_if_block, walkable_from_doorways,
};
use super::model::{PlacementSets, PlacementSummary};
use super::reachability::reachable_with_locked;
use super::topology::{RoomEntryPoints, passage_cells};

/// Rooms with more entry cells than this are not practically doorable.
const MAX_DOORABLE_ENTRIES: usize = 3;

pub(super) struct PlacementContext<'a> {
    pub(super) grid: &'a mut Grid,
    pub(super) sets: &'a mut PlacementSets,
    pub(super) summary: &'a mut PlacementSummary,
    pub(super) hints: &'a mut Vec<String>,
    pub(super) rng: &'a mut ChaCha8Rng,
    pub(super) entry_points: &'a RoomEntryPoints,
    pub(super) level: u8,
    pub(super) difficulty: Difficulty,
    pub(super) start: Pos,
    pub(super) exit: Pos,
}

pub(super) fn run_pipeline(context: &mut PlacementContext<'_>) {
    power::place_spawn_generator(context);
    locks::place_locked_rooms(context);
    doors::place_power_doors(context);
    hazards::place_hazards(context);
    power::place_generators(context);
    puzzles::place_puzzles(context);
    terminals::place_maintenance_terminals(context);
    terminals::place_cctv_terminals(context);
    furniture::furnish_rooms(context);
}

fn is_doorable(entries: &[Pos]) -> bool {
    (1..=MAX_DOORABLE_ENTRIES).contains(&entries.len())
}

impl PlacementContext<'_> {
    fn reachable_now(&self) -> BTreeSet<Pos> {
        reachable_with_locked(self.grid, self.start, &self.sets.locked_cells)
    }

    /// Uniform index in `0..len`. `len` must be non-zero. Draws past the
    /// last whole multiple of `len` are redrawn so no index is favoured.
    fn roll(&mut self, len: usize) -> usize {
        let len = len as u64;
        let zone = u64::MAX - (u64::MAX % len);
        loop {
            let draw = self.rng.next_u64();
            if draw < zone {
                return (draw % len) as usize;
            }
        }
    }

    fn pick<T: Copy>(&mut self, options: &[T]) -> Option<T> {
        if options.is_empty() {
            return None;
        }
        Some(options[self.roll(options.len())])
    }

    fn shuffle<T>(&mut self, items: &mut [T]) {
        for index in (1..items.len()).rev() {
            let other = self.roll(index + 1);
            items.swap(index, other);
        }
    }

    fn entries(&self, room: &str) -> &[Pos] {
        self.entry_points.get(room).map(Vec::as_slice).unwrap_or_default()
    }

    fn start_room(&self) -> Option<String> {
        self.grid.room_of(self.start).map(str::to_string)
    }

    /// Room cell with no content that no stage has claimed, and neither the
    /// start nor the exit.
    fn is_free(&self, pos: Pos) -> bool {
        pos != self.start
            && pos != self.exit
            && !self.sets.avoid.contains(&pos)
            && !self.sets.locked_cells.contains(&pos)
            && self.grid.cell(pos).is_some_and(|cell| cell.is_room && cell.is_vacant())
    }

    fn passes_room_checks(&self, room: &str, pos: Pos) -> bool {
        let entries = self.entries(room);
        room_still_connected_if_block(self.grid, room, entries, Some(pos))
            && room_access_kept_if_block(self.grid, room, entries, Some(pos))
    }

    /// Free cells of `room` that can take a blocking entity without failing
    /// the room checks. Doorways and shared-wall cells are never offered.
    /// Ascending order.
    fn room_spots(&self, room: &str) -> Vec<Pos> {
        let doorways = passage_cells(self.grid, room, self.entries(room));
        self.grid
            .room_cells(room)
            .into_iter()
            .filter(|pos| !doorways.contains(pos) && self.is_free(*pos))
            .filter(|&pos| self.passes_room_checks(room, pos))
            .collect()
    }

    /// Free cells in `reachable` a pickup can go on: corridor cells, or room
    /// cells a player entering the room can actually stand on.
    fn item_spots(&self, reachable: &BTreeSet<Pos>) -> Vec<Pos> {
        let mut walkable_rooms = BTreeSet::new();
        for room in self.reached_rooms(reachable) {
            let entries = self.entries(&room);
            if passage_cells(self.grid, &room, entries).is_empty() {
                walkable_rooms.extend(self.grid.room_cells(&room));
            } else {
                walkable_rooms.extend(walkable_from_doorways(self.grid, &room, entries, None));
            }
        }
        reachable
            .iter()
            .copied()
            .filter(|&pos| self.is_free(pos))
            .filter(|&pos| match self.grid.room_of(pos) {
                Some(_) => walkable_rooms.contains(&pos),
                None => true,
            })
            .collect()
    }

    /// Named rooms with at least one cell in `reachable`, sorted.
    fn reached_rooms(&self, reachable: &BTreeSet<Pos>) -> Vec<String> {
        let names: BTreeSet<&str> =
            reachable.iter().filter_map(|&pos| self.grid.room_of(pos)).collect();
        names.into_iter().map(str::to_string).collect()
    }

    fn room_has(&self, room: &str, kind: EntityKind) -> bool {
        self.grid
            .cells()
            .filter(|cell| cell.belongs_to(room))
            .any(|cell| cell.content.as_ref().is_some_and(|entity| entity.kind() == kind))
    }

    fn place(&mut self, pos: Pos, entity: Entity) -> bool {
        if !self.grid.place_entity(pos, entity) {
            return false;
        }
        self.sets.avoid.insert(pos);
        true
    }

    fn drop_item(&mut self, pos: Pos, item: Item) -> bool {
        if !self.grid.add_item(pos, item) {
            return false;
        }
        self.sets.avoid.insert(pos);
        true
    }

    fn place_label(&self, pos: Pos) -> String {
        match self.grid.room_of(pos) {
            Some(room) => format!("the {room}"),
            None => "a corridor".to_string(),
        }
    }

    fn hint(&mut self, text: String) {
        self.hints.push(text);
    }
}
