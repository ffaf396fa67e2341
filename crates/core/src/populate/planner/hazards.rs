//! Corridor hazards and their shutoff controls.

use std::collections::BTreeSet;

use crate::entities::{Entity, Hazard, HazardControl, HazardKind};
use crate::populate::articulation::is_articulation_point;
use crate::populate::progression;
use crate::populate::reachability::reachable_with_locked;
use crate::types::Pos;

use super::PlacementContext;

pub(super) fn place_hazards(context: &mut PlacementContext<'_>) {
    let target = progression::hazard_count(context.level, context.difficulty);
    for hazard_index in 0..target {
        if !place_one_hazard(context) {
            log::debug!("no corridor chokepoint left for hazard {hazard_index}; stopping");
            return;
        }
    }
}

fn place_one_hazard(context: &mut PlacementContext<'_>) -> bool {
    let reachable = context.reachable_now();
    let mut candidates: Vec<Pos> = reachable
        .iter()
        .copied()
        .filter(|&pos| context.grid.cell(pos).is_some_and(|cell| cell.is_corridor()))
        .filter(|&pos| context.is_free(pos))
        .collect();
    context.shuffle(&mut candidates);

    for pos in candidates {
        if !is_articulation_point(context.grid, context.start, &context.sets.locked_cells, pos) {
            continue;
        }
        let mut blocked = context.sets.locked_cells.clone();
        blocked.insert(pos);
        let after = reachable_with_locked(context.grid, context.start, &blocked);
        if !after.contains(&context.exit) {
            continue;
        }
        let Some(control_pos) = control_spot(context, &after, &blocked) else {
            continue;
        };

        let kind = HazardKind::ALL[context.roll(HazardKind::ALL.len())];
        if !context.place(pos, Entity::Hazard(Hazard::new(kind))) {
            continue;
        }
        context.sets.locked_cells.insert(pos);
        context.place(control_pos, Entity::HazardControl(HazardControl { kind, hazard_pos: pos }));
        context.summary.hazards.push(pos);
        context.hint(format!(
            "{} blocks a corridor. The {} is in {}.",
            kind.label(),
            kind.control_label(),
            context.place_label(control_pos)
        ));
        return true;
    }
    false
}

/// A named-room cell on the near side of the hazard that is not itself a
/// chokepoint and passes the room checks.
fn control_spot(
    context: &mut PlacementContext<'_>,
    after: &BTreeSet<Pos>,
    blocked: &BTreeSet<Pos>,
) -> Option<Pos> {
    let mut rooms = context.reached_rooms(after);
    context.shuffle(&mut rooms);
    for room in rooms {
        let spots: Vec<Pos> = context
            .room_spots(&room)
            .into_iter()
            .filter(|pos| after.contains(pos))
            .filter(|&pos| !is_articulation_point(context.grid, context.start, blocked, pos))
            .collect();
        if let Some(pos) = context.pick(&spots) {
            return Some(pos);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{hub_station, side_room_station};
    use super::*;
    use crate::config::Difficulty;
    use crate::grid::Grid;

    fn control_for(grid: &Grid, hazard: Pos) -> Option<Pos> {
        grid.cells()
            .find(|cell| match &cell.content {
                Some(Entity::HazardControl(control)) => control.hazard_pos == hazard,
                _ => false,
            })
            .map(|cell| cell.pos)
    }

    #[test]
    fn hazard_seals_the_dead_end_branch_only() {
        for seed in 0..12 {
            let mut fixture =
                side_room_station().with_seed(seed).with_progress(3, Difficulty::Normal);
            place_hazards(&mut fixture.context());

            assert_eq!(fixture.summary.hazards.len(), 1, "seed {seed}");
            let hazard = fixture.summary.hazards[0];
            assert!(hazard == Pos { y: 2, x: 5 } || hazard == Pos { y: 3, x: 5 });
            assert!(fixture.sets.locked_cells.contains(&hazard));

            let control = control_for(&fixture.grid, hazard).expect("control placed");
            let room = fixture.grid.room_of(control);
            assert!(room == Some("Airlock") || room == Some("Cargo Bay"), "seed {seed}");
            let locked = &fixture.sets.locked_cells;
            let reachable = reachable_with_locked(&fixture.grid, Pos { y: 1, x: 1 }, locked);
            assert!(reachable.contains(&control));
            assert!(reachable.contains(&Pos { y: 1, x: 9 }));
        }
    }

    #[test]
    fn hazards_skip_when_level_calls_for_none() {
        let mut fixture = side_room_station().with_progress(1, Difficulty::Normal);
        place_hazards(&mut fixture.context());
        assert!(fixture.summary.hazards.is_empty());
        assert!(fixture.sets.locked_cells.is_empty());
    }

    #[test]
    fn hazards_keep_the_exit_reachable_on_a_larger_station() {
        for seed in 0..12 {
            let mut fixture = hub_station().with_seed(seed).with_progress(6, Difficulty::Hard);
            place_hazards(&mut fixture.context());

            assert!(!fixture.summary.hazards.is_empty(), "seed {seed}");
            let locked = &fixture.sets.locked_cells;
            let reachable = reachable_with_locked(&fixture.grid, Pos { y: 2, x: 2 }, locked);
            assert!(reachable.contains(&Pos { y: 7, x: 16 }), "seed {seed}");
            for &hazard in &fixture.summary.hazards {
                assert!(fixture.grid.cell(hazard).is_some_and(|cell| cell.is_corridor()));
                let control = control_for(&fixture.grid, hazard).expect("control placed");
                assert!(reachable.contains(&control));
            }
        }
    }
}
