//! Level configuration: which level of the run, at which difficulty, on how
//! large a station.

use serde::{Deserialize, Serialize};

pub const DEFAULT_WIDTH: usize = 40;
pub const DEFAULT_HEIGHT: usize = 25;
pub const MIN_WIDTH: usize = 12;
pub const MIN_HEIGHT: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
}

impl Difficulty {
    pub const ALL: [Self; 3] = [Self::Easy, Self::Normal, Self::Hard];

    pub fn tier(self) -> usize {
        match self {
            Self::Easy => 0,
            Self::Normal => 1,
            Self::Hard => 2,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub level: u8,
    pub difficulty: Difficulty,
    pub width: usize,
    pub height: usize,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            level: 1,
            difficulty: Difficulty::Normal,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

impl LevelConfig {
    /// Describes the first out-of-range field, if any.
    pub fn check(&self) -> Result<(), String> {
        if self.level == 0 {
            return Err("level must be at least 1".to_string());
        }
        if self.width < MIN_WIDTH {
            return Err(format!("width {} is below the minimum of {MIN_WIDTH}", self.width));
        }
        if self.height < MIN_HEIGHT {
            return Err(format!("height {} is below the minimum of {MIN_HEIGHT}", self.height));
        }
        Ok(())
    }
}
