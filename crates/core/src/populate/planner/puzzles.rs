//! Puzzle terminals, at most one per room.

use crate::entities::{Entity, EntityKind, PuzzleKind, PuzzleTerminal};
use crate::populate::articulation::is_articulation_point;
use crate::populate::progression;
use crate::types::Pos;

use super::PlacementContext;

pub(super) fn place_puzzles(context: &mut PlacementContext<'_>) {
    let target = progression::puzzle_count(context.level, context.difficulty);
    let difficulty = progression::puzzle_difficulty(context.level, context.difficulty);
    let reachable = context.reachable_now();
    let mut rooms: Vec<String> = context
        .reached_rooms(&reachable)
        .into_iter()
        .filter(|room| !context.room_has(room, EntityKind::Puzzle))
        .collect();
    context.shuffle(&mut rooms);

    let mut placed = 0;
    for room in rooms {
        if placed >= target {
            break;
        }
        let spots: Vec<Pos> = context
            .room_spots(&room)
            .into_iter()
            .filter(|&pos| {
                !is_articulation_point(context.grid, context.start, &context.sets.locked_cells, pos)
            })
            .collect();
        let Some(pos) = context.pick(&spots) else {
            log::debug!("{room}: no safe cell for a puzzle terminal");
            continue;
        };
        let kind = PuzzleKind::ALL[context.roll(PuzzleKind::ALL.len())];
        let terminal = PuzzleTerminal { kind, room: room.clone(), difficulty, solved: false };
        if context.place(pos, Entity::Puzzle(terminal)) {
            placed += 1;
            context.summary.puzzles += 1;
            context.hint(format!("A {} puzzle terminal waits in the {room}.", kind.label()));
        }
    }
    if placed < target {
        log::debug!("placed {placed} of {target} puzzle terminals");
    }
}
