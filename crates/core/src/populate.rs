//! Level population engine: fills a carved station with gated progression
//! content while keeping the exit reachable and every room walkable.

pub mod articulation;
pub mod audit;
pub mod model;
pub mod power_solver;
pub(crate) mod progression;
pub mod reachability;
pub mod topology;

mod planner;

use rand_chacha::{ChaCha8Rng, rand_core::SeedableRng};

use crate::config::LevelConfig;
use crate::grid::{Grid, GridError};
use crate::layout::build_station_layout;
use crate::seed::{derive_layout_seed, derive_level_seed};

pub use audit::{AuditFailure, audit_level};
pub use model::{LockedRoom, PlacementSets, PlacementSummary, PopulatedLevel};
pub use topology::RoomEntryPoints;

use planner::{PlacementContext, run_pipeline};
use power_solver::resolve_power_deadlocks;
use topology::find_room_entry_points;

/// Populates `grid` for one level of the run seeded with `seed`.
///
/// Fails only when the grid breaks a structural precondition. Content that
/// finds no safe cell is skipped, so a valid grid always yields a level.
pub fn populate_level(
    mut grid: Grid,
    seed: u64,
    config: &LevelConfig,
) -> Result<PopulatedLevel, GridError> {
    grid.validate()?;
    let start = grid.start().ok_or(GridError::MissingStart)?;
    let exit = grid.exit().ok_or(GridError::MissingExit)?;

    let entry_points = find_room_entry_points(&grid);
    let mut sets = PlacementSets::default();
    let mut summary = PlacementSummary::default();
    let mut hints = Vec::new();
    let mut rng =
        ChaCha8Rng::seed_from_u64(derive_level_seed(seed, config.level, config.difficulty));

    run_pipeline(&mut PlacementContext {
        grid: &mut grid,
        sets: &mut sets,
        summary: &mut summary,
        hints: &mut hints,
        rng: &mut rng,
        entry_points: &entry_points,
        level: config.level,
        difficulty: config.difficulty,
        start,
        exit,
    });

    let report = resolve_power_deadlocks(&mut grid, &sets.locked_cells);
    for (room, via) in &report.powered_via {
        hints.push(format!("The maintenance terminal in the {via} can power the {room} doors."));
    }
    for room in &report.forced {
        hints.push(format!("The {room} doors were left powered: no terminal could reach them."));
    }
    summary.powered_via = report.powered_via;
    summary.pre_powered_rooms = report.forced;

    log::info!(
        "populated level {} ({:?}, seed {seed}): {} locked rooms, {} hazards, {} generators, \
         {} puzzles, {} pre-powered rooms",
        config.level,
        config.difficulty,
        summary.locked_rooms.len(),
        summary.hazards.len(),
        summary.generators.len(),
        summary.puzzles,
        summary.pre_powered_rooms.len(),
    );

    Ok(PopulatedLevel { seed, config: *config, grid, sets, entry_points, hints, summary })
}

/// Builds the reference station layout for this level and populates it.
pub fn generate_level(run_seed: u64, config: &LevelConfig) -> Result<PopulatedLevel, GridError> {
    let layout_seed = derive_layout_seed(run_seed, config.level);
    let grid = build_station_layout(layout_seed, config.width, config.height);
    populate_level(grid, run_seed, config)
}
