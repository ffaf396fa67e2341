use rand_chacha::{ChaCha8Rng, rand_core::SeedableRng};

use crate::config::Difficulty;
use crate::grid::Grid;
use crate::populate::model::{PlacementSets, PlacementSummary};
use crate::populate::topology::{RoomEntryPoints, find_room_entry_points};
use crate::types::Pos;

use super::PlacementContext;

pub(super) struct Fixture {
    pub(super) grid: Grid,
    pub(super) sets: PlacementSets,
    pub(super) summary: PlacementSummary,
    pub(super) hints: Vec<String>,
    pub(super) rng: ChaCha8Rng,
    pub(super) entry_points: RoomEntryPoints,
    pub(super) level: u8,
    pub(super) difficulty: Difficulty,
}

impl Fixture {
    pub(super) fn new(rows: &[&str], legend: &[(char, &str)], start: Pos, exit: Pos) -> Self {
        let mut grid = Grid::from_ascii(rows, legend);
        grid.set_start(start);
        grid.set_exit(exit);
        let entry_points = find_room_entry_points(&grid);
        Self {
            grid,
            sets: PlacementSets::default(),
            summary: PlacementSummary::default(),
            hints: Vec::new(),
            rng: ChaCha8Rng::seed_from_u64(7),
            entry_points,
            level: 1,
            difficulty: Difficulty::Normal,
        }
    }

    pub(super) fn with_progress(mut self, level: u8, difficulty: Difficulty) -> Self {
        self.level = level;
        self.difficulty = difficulty;
        self
    }

    pub(super) fn with_seed(mut self, seed: u64) -> Self {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
        self
    }

    pub(super) fn context(&mut self) -> PlacementContext<'_> {
        let origin = Pos { y: 0, x: 0 };
        let start = self.grid.start().unwrap_or(origin);
        let exit = self.grid.exit().unwrap_or(origin);
        PlacementContext {
            grid: &mut self.grid,
            sets: &mut self.sets,
            summary: &mut self.summary,
            hints: &mut self.hints,
            rng: &mut self.rng,
            entry_points: &self.entry_points,
            level: self.level,
            difficulty: self.difficulty,
            start,
            exit,
        }
    }
}

/// Airlock (start) and Cargo Bay (exit) joined by a corridor, with a
/// Laboratory hanging off a dead-end branch.
///
/// ```text
///  ###########
///  #AAA...CCC#
///  #AAA#.#CCC#
///  #####.#####
///  ####LLL####
///  ####LLL####
///  ###########
/// ```
pub(super) fn side_room_station() -> Fixture {
    Fixture::new(
        &[
            "###########",
            "#AAA...CCC#",
            "#AAA#.#CCC#",
            "#####.#####",
            "####LLL####",
            "####LLL####",
            "###########",
        ],
        &[('A', "Airlock"), ('C', "Cargo Bay"), ('L', "Laboratory")],
        Pos { y: 1, x: 1 },
        Pos { y: 1, x: 9 },
    )
}

/// Larger station: Airlock (start) in the west, Bridge (exit) in the east, a
/// Crew Quarters and a Laboratory off the main corridor and a Cargo Bay
/// behind the Laboratory.
///
/// ```text
///  ###################
///  #AAAA#######QQQQQ##
///  #AAAA#######QQQQQ##
///  #AAAA.........QQQ##
///  #AAAA###.###.#QQQ##
///  ########.###.######
///  ######LLLL##.#BBBB#
///  ######LLLL##...BBB#
///  ######LLLL#####BBB#
///  #######.###########
///  #####KKKKKK########
///  #####KKKKKK########
///  ###################
/// ```
pub(super) fn hub_station() -> Fixture {
    Fixture::new(
        &[
            "###################",
            "#AAAA#######QQQQQ##",
            "#AAAA#######QQQQQ##",
            "#AAAA.........QQQ##",
            "#AAAA###.###.#QQQ##",
            "########.###.######",
            "######LLLL##.#BBBB#",
            "######LLLL##...BBB#",
            "######LLLL#####BBB#",
            "#######.###########",
            "#####KKKKKK########",
            "#####KKKKKK########",
            "###################",
        ],
        &[
            ('A', "Airlock"),
            ('Q', "Crew Quarters"),
            ('L', "Laboratory"),
            ('B', "Bridge"),
            ('K', "Cargo Bay"),
        ],
        Pos { y: 2, x: 2 },
        Pos { y: 7, x: 16 },
    )
}

/// Airlock (start) across a corridor from a long Bridge whose far end shares
/// a wall with a one-cell Cargo Bay (exit). The Bridge cell beside the Cargo
/// Bay is the only way in.
///
/// ```text
///  ###########
///  #AA.BBBBBC#
///  #AA#BBBBB##
///  ###########
/// ```
pub(super) fn shared_wall_station() -> Fixture {
    Fixture::new(
        &["###########", "#AA.BBBBBC#", "#AA#BBBBB##", "###########"],
        &[('A', "Airlock"), ('B', "Bridge"), ('C', "Cargo Bay")],
        Pos { y: 1, x: 1 },
        Pos { y: 1, x: 9 },
    )
}
