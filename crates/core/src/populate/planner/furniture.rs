//! Room furnishing. Pieces block movement, so each one passes the same room
//! checks as any other blocking entity.

use crate::entities::{Entity, Furniture, FurnitureKind};
use crate::populate::progression;

use super::PlacementContext;

const QUARTERS_PALETTE: &[FurnitureKind] =
    &[FurnitureKind::Bunk, FurnitureKind::Locker, FurnitureKind::Desk];
const STORAGE_PALETTE: &[FurnitureKind] =
    &[FurnitureKind::Crate, FurnitureKind::Shelf, FurnitureKind::Locker];
const CONTROL_PALETTE: &[FurnitureKind] = &[FurnitureKind::Console, FurnitureKind::Desk];
const LAB_PALETTE: &[FurnitureKind] =
    &[FurnitureKind::Shelf, FurnitureKind::Desk, FurnitureKind::Console];
const DEFAULT_PALETTE: &[FurnitureKind] =
    &[FurnitureKind::Desk, FurnitureKind::Locker, FurnitureKind::Crate, FurnitureKind::Shelf];

pub(super) fn furnish_rooms(context: &mut PlacementContext<'_>) {
    for room in context.grid.room_names() {
        let pieces = progression::furniture_for_room(context.grid.room_cells(&room).len());
        let palette = palette_for(&room);
        for _ in 0..pieces {
            let spots = context.room_spots(&room);
            let Some(pos) = context.pick(&spots) else {
                log::debug!("{room}: no space left for furniture");
                break;
            };
            let kind = palette[context.roll(palette.len())];
            if context.place(pos, Entity::Furniture(Furniture { kind })) {
                context.summary.furniture += 1;
            }
        }
    }
}

fn palette_for(room: &str) -> &'static [FurnitureKind] {
    let name = room.to_ascii_lowercase();
    let has = |words: &[&str]| words.iter().any(|word| name.contains(word));
    if has(&["quarters", "bunk", "dorm"]) {
        QUARTERS_PALETTE
    } else if has(&["cargo", "storage", "armory", "hangar"]) {
        STORAGE_PALETTE
    } else if has(&["bridge", "comms", "server", "control", "reactor", "engineering"]) {
        CONTROL_PALETTE
    } else if has(&["lab", "medbay", "hydroponics"]) {
        LAB_PALETTE
    } else {
        DEFAULT_PALETTE
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{hub_station, shared_wall_station};
    use super::*;
    use crate::populate::articulation::{room_access_kept_if_block, room_still_connected_if_block};
    use crate::populate::audit::reachable_past_content;
    use crate::types::Pos;

    #[test]
    fn furniture_never_splits_a_room() {
        for seed in 0..16 {
            let mut fixture = hub_station().with_seed(seed);
            furnish_rooms(&mut fixture.context());

            assert!(fixture.summary.furniture > 0);
            for (room, entries) in &fixture.entry_points {
                assert!(room_still_connected_if_block(&fixture.grid, room, entries, None));
                assert!(room_access_kept_if_block(&fixture.grid, room, entries, None));
            }
            assert!(fixture.grid.cell(Pos { y: 2, x: 2 }).is_some_and(|cell| cell.is_vacant()));
        }
    }

    #[test]
    fn furniture_never_walls_off_a_room_behind_a_shared_wall() {
        let exit = Pos { y: 1, x: 9 };
        for seed in 0..64 {
            let mut fixture = shared_wall_station().with_seed(seed);
            furnish_rooms(&mut fixture.context());

            assert_eq!(fixture.summary.furniture, 1, "seed {seed}");
            assert!(fixture.grid.cell(Pos { y: 1, x: 8 }).is_some_and(|cell| cell.is_vacant()));
            let start = Pos { y: 1, x: 1 };
            let reached = reachable_past_content(&fixture.grid, start, &fixture.sets.locked_cells);
            assert!(reached.contains(&exit), "seed {seed}");
        }
    }

    #[test]
    fn pieces_follow_the_room_theme() {
        let mut fixture = hub_station();
        furnish_rooms(&mut fixture.context());
        for cell in fixture.grid.cells() {
            let Some(Entity::Furniture(piece)) = &cell.content else {
                continue;
            };
            let room = fixture.grid.room_of(cell.pos).expect("furniture sits in a room");
            assert!(palette_for(room).contains(&piece.kind), "{:?} in {room}", piece.kind);
        }
    }

    #[test]
    fn palettes_match_room_names() {
        assert_eq!(palette_for("Crew Quarters"), QUARTERS_PALETTE);
        assert_eq!(palette_for("Cargo Bay 2"), STORAGE_PALETTE);
        assert_eq!(palette_for("Bridge"), CONTROL_PALETTE);
        assert_eq!(palette_for("Laboratory"), LAB_PALETTE);
        assert_eq!(palette_for("Observation Deck"), DEFAULT_PALETTE);
    }
}
