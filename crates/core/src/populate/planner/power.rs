//! Generators and the batteries that feed them.

use std::collections::BTreeSet;

use crate::entities::{Entity, EntityKind, Generator, Item};
use crate::populate::articulation::{is_chokepoint, walkable_from_doorways};
use crate::populate::progression;
use crate::populate::reachability::reachable_distances;
use crate::types::Pos;

use super::PlacementContext;

/// The start room always gets a running generator so the player can leave it.
pub(super) fn place_spawn_generator(context: &mut PlacementContext<'_>) {
    let Some(start_room) = context.start_room() else {
        log::debug!("start cell is not inside a named room; no spawn generator");
        return;
    };
    let spots = generator_spots(context, &start_room);
    let Some(pos) = context.pick(&spots) else {
        log::debug!("no room for a generator in the {start_room}");
        return;
    };

    let batteries = progression::spawn_generator_batteries(context.level);
    if context.place(pos, Entity::Generator(Generator::pre_powered(&start_room, batteries))) {
        context.summary.spawn_generator = Some(pos);
        context.hint(format!("The generator in the {start_room} is already running."));
    }
}

pub(super) fn place_generators(context: &mut PlacementContext<'_>) {
    let generator_count = progression::generator_count(context.level, context.difficulty);
    let batteries_required =
        progression::batteries_per_generator(context.level, context.difficulty);
    let start_room = context.start_room();

    for generator_index in 0..generator_count {
        let reachable = context.reachable_now();
        let mut rooms: Vec<String> = context
            .reached_rooms(&reachable)
            .into_iter()
            .filter(|room| Some(room) != start_room.as_ref())
            .filter(|room| !context.room_has(room, EntityKind::Generator))
            .collect();
        context.shuffle(&mut rooms);

        let mut chosen = None;
        for room in rooms {
            let spots = generator_spots(context, &room);
            if let Some(pos) = context.pick(&spots) {
                chosen = Some((room, pos));
                break;
            }
        }
        let Some((room, pos)) = chosen else {
            log::debug!("no room can take generator {generator_index}; skipping the rest");
            return;
        };

        let battery_spots = battery_spots(context, pos, batteries_required as usize);
        if battery_spots.is_empty() {
            log::debug!("no battery can be placed for a generator in the {room}; skipped");
            continue;
        }
        let required = battery_spots.len() as u32;
        if required < batteries_required {
            log::debug!(
                "generator in the {room} lowered to {required} of {batteries_required} batteries"
            );
        }
        if !context.place(pos, Entity::Generator(Generator::new(&room, required))) {
            continue;
        }
        for &battery in &battery_spots {
            context.drop_item(battery, Item::Battery);
        }
        context.summary.generators.push(pos);
        context.summary.batteries += battery_spots.len();
        let noun = if required == 1 { "battery" } else { "batteries" };
        context.hint(format!(
            "The generator in the {room} needs {required} {noun}; one is in {}.",
            context.place_label(battery_spots[0])
        ));
    }
}

/// Cells of `room` that take a generator without cutting off part of the
/// station or failing the room checks.
fn generator_spots(context: &PlacementContext<'_>, room: &str) -> Vec<Pos> {
    context
        .room_spots(room)
        .into_iter()
        .filter(|&pos| {
            !is_chokepoint(context.grid, context.start, &context.sets.locked_cells, pos)
        })
        .collect()
}

/// Up to `wanted` battery cells for a generator at `generator`, drawn from
/// the difficulty's distance band. Nearest first.
fn battery_spots(context: &mut PlacementContext<'_>, generator: Pos, wanted: usize) -> Vec<Pos> {
    let locked = &context.sets.locked_cells;
    let distances =
        reachable_distances(context.grid, context.start, |cell| locked.contains(&cell.pos));
    let reachable: BTreeSet<Pos> = distances.keys().copied().collect();
    // The generator is not on the grid yet, so re-walk its own room with it.
    let generator_room = context.grid.room_of(generator);
    let walkable = generator_room.map(|room| {
        walkable_from_doorways(context.grid, room, context.entries(room), Some(generator))
    });
    let mut candidates: Vec<(u32, Pos)> = context
        .item_spots(&reachable)
        .into_iter()
        .filter(|&pos| pos != generator)
        .filter(|&pos| {
            let same_room = context.grid.room_of(pos) == generator_room;
            match &walkable {
                Some(walkable) if same_room && !walkable.is_empty() => walkable.contains(&pos),
                _ => true,
            }
        })
        .filter_map(|pos| distances.get(&pos).map(|&distance| (distance, pos)))
        .collect();
    candidates.sort_unstable();

    let band = progression::battery_band(context.difficulty, candidates.len());
    let mut pool: Vec<(u32, Pos)> = candidates[band].to_vec();
    if pool.is_empty() {
        pool = candidates;
    }
    context.shuffle(&mut pool);
    pool.truncate(wanted);
    pool.sort_unstable();
    pool.into_iter().map(|(_, pos)| pos).collect()
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{hub_station, side_room_station};
    use super::*;
    use crate::config::Difficulty;
    use crate::grid::Grid;

    fn generator_at(grid: &Grid, pos: Pos) -> Option<&Generator> {
        match grid.cell(pos).and_then(|cell| cell.content.as_ref()) {
            Some(Entity::Generator(generator)) => Some(generator),
            _ => None,
        }
    }

    fn battery_count(grid: &Grid) -> usize {
        grid.cells()
            .flat_map(|cell| cell.items.iter())
            .filter(|item| **item == Item::Battery)
            .count()
    }

    #[test]
    fn spawn_generator_runs_from_the_start() {
        let mut fixture = side_room_station();
        place_spawn_generator(&mut fixture.context());

        let pos = fixture.summary.spawn_generator.expect("spawn generator placed");
        assert_eq!(fixture.grid.room_of(pos), Some("Airlock"));
        let generator = generator_at(&fixture.grid, pos).expect("generator entity");
        assert!(generator.is_powered());
        assert!(fixture.sets.avoid.contains(&pos));
        assert_eq!(fixture.hints.len(), 1);
    }

    #[test]
    fn spawn_generator_is_skipped_when_start_is_a_corridor() {
        let mut fixture = side_room_station();
        fixture.grid.set_start(Pos { y: 1, x: 5 });
        place_spawn_generator(&mut fixture.context());
        assert!(fixture.summary.spawn_generator.is_none());
        assert!(fixture.hints.is_empty());
    }

    #[test]
    fn generators_need_exactly_the_batteries_that_were_placed() {
        for seed in 0..16 {
            let mut fixture = hub_station().with_seed(seed).with_progress(4, Difficulty::Hard);
            place_generators(&mut fixture.context());

            assert!(!fixture.summary.generators.is_empty(), "seed {seed}");
            let required: u32 = fixture
                .summary
                .generators
                .iter()
                .filter_map(|&pos| generator_at(&fixture.grid, pos))
                .map(|generator| {
                    assert!(!generator.is_powered());
                    assert_ne!(generator.room, "Airlock");
                    generator.batteries_required
                })
                .sum();
            assert_eq!(required as usize, battery_count(&fixture.grid), "seed {seed}");
            assert_eq!(fixture.summary.batteries, battery_count(&fixture.grid));
        }
    }

    #[test]
    fn batteries_are_never_behind_locks() {
        let mut fixture = hub_station();
        fixture.sets.locked_cells.insert(Pos { y: 9, x: 7 });
        fixture.sets.locked_cells.insert(Pos { y: 5, x: 8 });
        place_generators(&mut fixture.context());

        for cell in fixture.grid.cells().filter(|cell| !cell.items.is_empty()) {
            let room = fixture.grid.room_of(cell.pos);
            assert_ne!(room, Some("Laboratory"));
            assert_ne!(room, Some("Cargo Bay"));
        }
    }

    #[test]
    fn hard_batteries_sit_farther_out_than_easy_ones() {
        let farthest = |difficulty| {
            let mut fixture = hub_station().with_progress(1, difficulty);
            let mut context = fixture.context();
            let spots = battery_spots(&mut context, Pos { y: 1, x: 14 }, 1);
            let distances = reachable_distances(context.grid, context.start, |_| false);
            spots.iter().map(|pos| distances[pos]).max().unwrap_or(0)
        };
        assert!(farthest(Difficulty::Hard) > farthest(Difficulty::Easy));
    }
}
