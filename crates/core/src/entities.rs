//! Entity values placed into cells during population.
//!
//! The population engine only constructs these and writes them into cells.
//! The runtime mutation points (`Door::unlock`, `Generator::insert_batteries`,
//! `HazardControl::shut_off`) belong to game logic and are exposed for it.

use serde::{Deserialize, Serialize};

use crate::types::Pos;

/// The single blocking or interactive entity a cell may hold.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Entity {
    Door(Door),
    Generator(Generator),
    Hazard(Hazard),
    HazardControl(HazardControl),
    Puzzle(PuzzleTerminal),
    Maintenance(MaintenanceTerminal),
    Cctv(CctvTerminal),
    Furniture(Furniture),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Door,
    Generator,
    Hazard,
    HazardControl,
    Puzzle,
    Maintenance,
    Cctv,
    Furniture,
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Door(_) => EntityKind::Door,
            Self::Generator(_) => EntityKind::Generator,
            Self::Hazard(_) => EntityKind::Hazard,
            Self::HazardControl(_) => EntityKind::HazardControl,
            Self::Puzzle(_) => EntityKind::Puzzle,
            Self::Maintenance(_) => EntityKind::Maintenance,
            Self::Cctv(_) => EntityKind::Cctv,
            Self::Furniture(_) => EntityKind::Furniture,
        }
    }

    pub fn as_door(&self) -> Option<&Door> {
        match self {
            Self::Door(door) => Some(door),
            _ => None,
        }
    }

    pub fn as_door_mut(&mut self) -> Option<&mut Door> {
        match self {
            Self::Door(door) => Some(door),
            _ => None,
        }
    }
}

/// Non-blocking pickups. Several may share a cell with nothing else on it.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Item {
    Keycard(String),
    Battery,
}

pub fn keycard_name(room: &str) -> String {
    format!("{room} Keycard")
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Door {
    pub room: String,
    pub locked: bool,
    pub powered: bool,
}

impl Door {
    pub fn locked(room: &str) -> Self {
        Self { room: room.to_string(), locked: true, powered: false }
    }

    pub fn unlocked(room: &str) -> Self {
        Self { room: room.to_string(), locked: false, powered: false }
    }

    pub fn keycard_name(&self) -> String {
        keycard_name(&self.room)
    }

    /// Unlocks the door if `keycard` is the one cut for its room.
    pub fn unlock(&mut self, keycard: &str) -> bool {
        if keycard != self.keycard_name() {
            return false;
        }
        self.locked = false;
        true
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Generator {
    pub room: String,
    pub batteries_required: u32,
    pub batteries_inserted: u32,
}

impl Generator {
    pub fn new(room: &str, batteries_required: u32) -> Self {
        Self { room: room.to_string(), batteries_required, batteries_inserted: 0 }
    }

    pub fn pre_powered(room: &str, batteries_required: u32) -> Self {
        Self {
            room: room.to_string(),
            batteries_required,
            batteries_inserted: batteries_required,
        }
    }

    pub fn is_powered(&self) -> bool {
        self.batteries_inserted >= self.batteries_required
    }

    /// Takes up to `offered` batteries and returns how many were used.
    pub fn insert_batteries(&mut self, offered: u32) -> u32 {
        let missing = self.batteries_required.saturating_sub(self.batteries_inserted);
        let taken = offered.min(missing);
        self.batteries_inserted += taken;
        taken
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HazardKind {
    Fire,
    ToxicGas,
    Radiation,
    Electrical,
    Flooding,
}

impl HazardKind {
    pub const ALL: [Self; 5] =
        [Self::Fire, Self::ToxicGas, Self::Radiation, Self::Electrical, Self::Flooding];

    pub fn label(self) -> &'static str {
        match self {
            Self::Fire => "fire",
            Self::ToxicGas => "toxic gas",
            Self::Radiation => "radiation",
            Self::Electrical => "arcing cable",
            Self::Flooding => "flooding",
        }
    }

    pub fn control_label(self) -> &'static str {
        match self {
            Self::Fire => "fire suppression panel",
            Self::ToxicGas => "ventilation control",
            Self::Radiation => "shielding switch",
            Self::Electrical => "breaker panel",
            Self::Flooding => "pump control",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hazard {
    pub kind: HazardKind,
    pub active: bool,
}

impl Hazard {
    pub fn new(kind: HazardKind) -> Self {
        Self { kind, active: true }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HazardControl {
    pub kind: HazardKind,
    pub hazard_pos: Pos,
}

impl HazardControl {
    /// Deactivates `hazard` when it is the kind this control is wired to.
    pub fn shut_off(&self, hazard: &mut Hazard) -> bool {
        if hazard.kind != self.kind {
            return false;
        }
        hazard.active = false;
        true
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PuzzleKind {
    Sequence,
    Wiring,
    Cipher,
}

impl PuzzleKind {
    pub const ALL: [Self; 3] = [Self::Sequence, Self::Wiring, Self::Cipher];

    pub fn label(self) -> &'static str {
        match self {
            Self::Sequence => "sequence",
            Self::Wiring => "wiring",
            Self::Cipher => "cipher",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleTerminal {
    pub kind: PuzzleKind,
    pub room: String,
    pub difficulty: u8,
    pub solved: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceTerminal {
    pub room: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CctvTerminal {
    pub room: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FurnitureKind {
    Desk,
    Locker,
    Crate,
    Shelf,
    Bunk,
    Console,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Furniture {
    pub kind: FurnitureKind,
}
