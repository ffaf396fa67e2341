//! Level and difficulty scaling rules used by the placement planner.

use std::ops::Range;

use crate::config::Difficulty;

pub const STARTING_LEVEL: u8 = 1;

const LOCKED_ROOMS_BY_LEVEL: [usize; 6] = [1, 1, 2, 2, 3, 3];
const HAZARDS_BY_LEVEL: [usize; 6] = [0, 1, 1, 2, 2, 3];
const GENERATORS_BY_LEVEL: [usize; 6] = [1, 1, 1, 2, 2, 3];
const PUZZLES_BY_LEVEL: [usize; 6] = [1, 1, 2, 2, 2, 3];
const MAX_BATTERIES_PER_GENERATOR: u32 = 5;
const MAX_PUZZLE_DIFFICULTY: u8 = 10;
const MAX_FURNITURE_PER_ROOM: usize = 4;

pub(crate) fn locked_room_count(level: u8, difficulty: Difficulty) -> usize {
    by_level(&LOCKED_ROOMS_BY_LEVEL, level) + hard_bonus(difficulty)
}

pub(crate) fn hazard_count(level: u8, difficulty: Difficulty) -> usize {
    match by_level(&HAZARDS_BY_LEVEL, level) {
        0 => 0,
        base if difficulty == Difficulty::Easy => base,
        base => base + 1,
    }
}

pub(crate) fn generator_count(level: u8, difficulty: Difficulty) -> usize {
    by_level(&GENERATORS_BY_LEVEL, level) + hard_bonus(difficulty)
}

pub(crate) fn batteries_per_generator(level: u8, difficulty: Difficulty) -> u32 {
    let scaled = 1 + (level_slot(level) / 2) as u32 + difficulty.tier() as u32;
    scaled.min(MAX_BATTERIES_PER_GENERATOR)
}

/// The spawn generator starts powered; the count only sets how many
/// batteries it reports as inserted.
pub(crate) fn spawn_generator_batteries(level: u8) -> u32 {
    1 + (level_slot(level) / 3) as u32
}

pub(crate) fn puzzle_count(level: u8, difficulty: Difficulty) -> usize {
    by_level(&PUZZLES_BY_LEVEL, level) + hard_bonus(difficulty)
}

pub(crate) fn puzzle_difficulty(level: u8, difficulty: Difficulty) -> u8 {
    let scaled = 1 + level_slot(level).min(usize::from(MAX_PUZZLE_DIFFICULTY)) as u8
        + 2 * difficulty.tier() as u8;
    scaled.min(MAX_PUZZLE_DIFFICULTY)
}

pub(crate) fn maintenance_terminal_count(level: u8, difficulty: Difficulty) -> usize {
    let base = match difficulty {
        Difficulty::Easy => 3,
        Difficulty::Normal | Difficulty::Hard => 2,
    };
    base + level_slot(level) / 3
}

pub(crate) fn cctv_terminal_count(level: u8, difficulty: Difficulty) -> usize {
    let base = match difficulty {
        Difficulty::Easy => 2,
        Difficulty::Normal | Difficulty::Hard => 1,
    };
    base + level_slot(level) / 4
}

pub(crate) fn furniture_for_room(room_area: usize) -> usize {
    (room_area / 8).min(MAX_FURNITURE_PER_ROOM)
}

/// Slice of distance-sorted battery candidates the difficulty draws from:
/// the nearest third on Easy, the middle third on Normal, the farthest on
/// Hard. Empty only when there are no candidates.
pub(crate) fn battery_band(difficulty: Difficulty, candidate_count: usize) -> Range<usize> {
    if candidate_count < 3 {
        return 0..candidate_count;
    }
    let third = candidate_count / 3;
    match difficulty {
        Difficulty::Easy => 0..third,
        Difficulty::Normal => third..candidate_count - third,
        Difficulty::Hard => candidate_count - third..candidate_count,
    }
}

fn hard_bonus(difficulty: Difficulty) -> usize {
    usize::from(difficulty == Difficulty::Hard)
}

fn by_level(table: &[usize], level: u8) -> usize {
    table[level_slot(level).min(table.len() - 1)]
}

fn level_slot(level: u8) -> usize {
    level.saturating_sub(STARTING_LEVEL) as usize
}
