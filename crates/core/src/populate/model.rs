//! Values the population engine hands back to the caller.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use xxhash_rust::xxh3::xxh3_64;

use crate::config::LevelConfig;
use crate::entities::{Entity, Item};
use crate::grid::Grid;
use crate::types::Pos;

use super::topology::RoomEntryPoints;

/// The two sets every placement stage reads and grows.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PlacementSets {
    /// Cells already carrying content. Only ever grows.
    pub avoid: BTreeSet<Pos>,
    /// Cells the player cannot currently pass: locked doors and live hazards.
    pub locked_cells: BTreeSet<Pos>,
}

/// An accepted lock together with the reachability numbers that justified it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LockedRoom {
    pub room: String,
    pub entries: Vec<Pos>,
    pub keycard_pos: Pos,
    pub reachable_before: usize,
    pub reachable_after: usize,
}

impl LockedRoom {
    /// Whether the lock cuts off more than its own entry cells, which leave
    /// the reachable set whenever they are locked.
    pub fn gates_anything(&self) -> bool {
        self.reachable_after + self.entries.len() < self.reachable_before
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PlacementSummary {
    pub spawn_generator: Option<Pos>,
    pub locked_rooms: Vec<LockedRoom>,
    pub power_door_rooms: Vec<String>,
    pub hazards: Vec<Pos>,
    pub generators: Vec<Pos>,
    pub batteries: usize,
    pub puzzles: usize,
    pub maintenance_terminals: usize,
    pub cctv_terminals: usize,
    pub furniture: usize,
    /// Gatekeeper room to the adjacent room whose maintenance terminal powers it.
    pub powered_via: BTreeMap<String, String>,
    /// Gatekeeper rooms whose doors were forced to start powered.
    pub pre_powered_rooms: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PopulatedLevel {
    pub seed: u64,
    pub config: LevelConfig,
    pub grid: Grid,
    pub sets: PlacementSets,
    pub entry_points: RoomEntryPoints,
    /// Human-readable placement notes, in placement order.
    pub hints: Vec<String>,
    pub summary: PlacementSummary,
}

impl PopulatedLevel {
    /// Order-stable encoding of everything placed on the grid plus the hints.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&self.seed.to_le_bytes());
        bytes.extend_from_slice(&(self.grid.width() as u32).to_le_bytes());
        bytes.extend_from_slice(&(self.grid.height() as u32).to_le_bytes());
        for cell in self.grid.cells() {
            bytes.push(u8::from(cell.is_room));
            if let Some(entity) = &cell.content {
                encode_entity(&mut bytes, entity);
            } else {
                bytes.push(0);
            }
            bytes.extend_from_slice(&(cell.items.len() as u32).to_le_bytes());
            for item in &cell.items {
                match item {
                    Item::Keycard(name) => {
                        bytes.push(1);
                        push_str(&mut bytes, name);
                    }
                    Item::Battery => bytes.push(2),
                }
            }
        }
        for hint in &self.hints {
            push_str(&mut bytes, hint);
        }
        bytes
    }

    pub fn fingerprint(&self) -> u64 {
        xxh3_64(&self.canonical_bytes())
    }
}

fn encode_entity(bytes: &mut Vec<u8>, entity: &Entity) {
    match entity {
        Entity::Door(door) => {
            bytes.extend_from_slice(&[1, u8::from(door.locked), u8::from(door.powered)]);
            push_str(bytes, &door.room);
        }
        Entity::Generator(generator) => {
            bytes.push(2);
            bytes.extend_from_slice(&generator.batteries_required.to_le_bytes());
            bytes.extend_from_slice(&generator.batteries_inserted.to_le_bytes());
        }
        Entity::Hazard(hazard) => bytes.extend_from_slice(&[3, hazard.kind as u8]),
        Entity::HazardControl(control) => {
            bytes.extend_from_slice(&[4, control.kind as u8]);
            bytes.extend_from_slice(&control.hazard_pos.y.to_le_bytes());
            bytes.extend_from_slice(&control.hazard_pos.x.to_le_bytes());
        }
        Entity::Puzzle(puzzle) => {
            bytes.extend_from_slice(&[5, puzzle.kind as u8, puzzle.difficulty]);
        }
        Entity::Maintenance(_) => bytes.push(6),
        Entity::Cctv(_) => bytes.push(7),
        Entity::Furniture(furniture) => bytes.extend_from_slice(&[8, furniture.kind as u8]),
    }
}

fn push_str(bytes: &mut Vec<u8>, text: &str) {
    bytes.extend_from_slice(&(text.len() as u32).to_le_bytes());
    bytes.extend_from_slice(text.as_bytes());
}
