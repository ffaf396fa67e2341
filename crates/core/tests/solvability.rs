use derelict::populate::audit::reachable_past_content;
use derelict::populate::reachability::reachable_with_locked;
use derelict::{
    Difficulty, Entity, Grid, LevelConfig, Pos, PopulatedLevel, audit_level, generate_level,
    populate_level,
};
use proptest::{
    arbitrary::any,
    test_runner::{Config as ProptestConfig, TestCaseError, TestRunner},
};

fn check_level(level: &PopulatedLevel) -> Result<(), String> {
    let failures = audit_level(level);
    if !failures.is_empty() {
        let messages: Vec<String> = failures.iter().map(ToString::to_string).collect();
        return Err(format!("seed {}: {}", level.seed, messages.join("; ")));
    }

    let grid = &level.grid;
    let start = grid.start().ok_or("populated level lost its start")?;
    let exit = grid.exit().ok_or("populated level lost its exit")?;
    if !reachable_with_locked(grid, start, &level.sets.locked_cells).contains(&exit) {
        return Err(format!("seed {}: exit unreachable", level.seed));
    }
    if !reachable_past_content(grid, start, &level.sets.locked_cells).contains(&exit) {
        return Err(format!("seed {}: placed content walls off the exit", level.seed));
    }

    for lock in &level.summary.locked_rooms {
        if !lock.gates_anything() {
            return Err(format!("seed {}: lock on {} changed nothing", level.seed, lock.room));
        }
    }

    for cell in grid.cells() {
        if cell.content.is_some() && !cell.items.is_empty() {
            return Err(format!("seed {}: pickup under an entity at {:?}", level.seed, cell.pos));
        }
        if cell.content.is_some() && !level.sets.avoid.contains(&cell.pos) {
            return Err(format!("seed {}: {:?} missing from the avoid set", level.seed, cell.pos));
        }
    }
    for pos in [start, exit] {
        if grid.cell(pos).is_some_and(|cell| cell.content.is_some()) {
            return Err(format!("seed {}: entity placed on {pos:?}", level.seed));
        }
    }

    if let Some(spawn) = level.summary.spawn_generator {
        match grid.cell(spawn).and_then(|cell| cell.content.as_ref()) {
            Some(Entity::Generator(generator)) if generator.is_powered() => {}
            _ => return Err(format!("seed {}: spawn generator is not running", level.seed)),
        }
    }
    Ok(())
}

#[test]
fn generated_levels_pass_the_audit() {
    let mut runner = TestRunner::new(ProptestConfig::with_cases(24));
    let inputs = (any::<u64>(), 1u8..=8, 0usize..Difficulty::ALL.len());

    runner
        .run(&inputs, |(seed, level, difficulty_index)| {
            let config = LevelConfig {
                level,
                difficulty: Difficulty::ALL[difficulty_index],
                ..LevelConfig::default()
            };
            let populated = generate_level(seed, &config).map_err(|err| {
                TestCaseError::fail(format!("seed {seed}: layout rejected: {err}"))
            })?;
            check_level(&populated).map_err(TestCaseError::fail)?;
            Ok(())
        })
        .expect("generated levels should stay solvable");
}

#[test]
fn small_stations_stay_solvable() {
    for seed in 0..12 {
        for difficulty in Difficulty::ALL {
            let config = LevelConfig { level: 6, difficulty, width: 16, height: 12 };
            let populated = generate_level(seed, &config).expect("small layout validates");
            if let Err(message) = check_level(&populated) {
                panic!("{message}");
            }
        }
    }
}

/// Rooms sharing walls: Airlock/Bridge in the north, Laboratory, Crew
/// Quarters and Medbay chained together in the south.
fn shared_wall_station() -> Grid {
    let mut grid = Grid::from_ascii(
        &[
            "####################",
            "#AAAABBBB#####CCCC##",
            "#AAAABBBB.....CCCC##",
            "#AAAABBBB#####CCCC##",
            "#####.#########.####",
            "#####.#########.####",
            "###LLLLL####MMMMMMM#",
            "###LLLLL####MMMMMMM#",
            "###LLLLLQQQQMMMMMMM#",
            "###LLLLLQQQQ########",
            "####################",
        ],
        &[
            ('A', "Airlock"),
            ('B', "Bridge"),
            ('C', "Cargo Bay"),
            ('L', "Laboratory"),
            ('Q', "Crew Quarters"),
            ('M', "Medbay"),
        ],
    );
    grid.set_start(Pos { y: 2, x: 1 });
    grid.set_exit(Pos { y: 7, x: 15 });
    grid
}

#[test]
fn stations_with_shared_walls_stay_solvable() {
    for seed in 0..16 {
        for level in [1, 4, 8] {
            for difficulty in Difficulty::ALL {
                let config = LevelConfig { level, difficulty, width: 20, height: 11 };
                let populated =
                    populate_level(shared_wall_station(), seed, &config).expect("grid validates");
                if let Err(message) = check_level(&populated) {
                    panic!("level {level} {difficulty:?}: {message}");
                }
                let locks = &populated.summary.locked_rooms;
                assert!(locks.iter().all(|lock| lock.room != "Bridge"), "seed {seed}");
            }
        }
    }
}

#[test]
fn later_levels_carry_more_gating_content() {
    let content = |level| {
        (0..10)
            .map(|seed| {
                let config =
                    LevelConfig { level, difficulty: Difficulty::Hard, ..LevelConfig::default() };
                let populated = generate_level(seed, &config).expect("layout validates");
                populated.summary.locked_rooms.len() + populated.summary.hazards.len()
            })
            .sum::<usize>()
    };
    assert!(content(8) > content(1));
}
