pub mod config;
pub mod config_file;
pub mod entities;
pub mod grid;
pub mod layout;
pub mod populate;
pub mod seed;
pub mod types;

pub use config::{Difficulty, LevelConfig};
pub use config_file::{ConfigLoadError, LevelConfigFile};
pub use entities::*;
pub use grid::{CORRIDOR, Cell, Grid, GridError};
pub use layout::build_station_layout;
pub use populate::{
    AuditFailure, LockedRoom, PlacementSets, PlacementSummary, PopulatedLevel, RoomEntryPoints,
    audit_level, generate_level, populate_level,
};
pub use types::*;
