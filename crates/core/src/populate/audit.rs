//! Post-generation audit. Re-checks a finished level against the guarantees
//! the planner is supposed to uphold and reports every violation found.

use std::collections::BTreeSet;
use std::error::Error;
use std::fmt;

use crate::entities::{Entity, Item};
use crate::grid::Grid;
use crate::types::Pos;

use super::articulation::room_still_connected_if_block;
use super::model::PopulatedLevel;
use super::power_solver::{GatekeeperStatus, gatekeeper_status, unpowered_door_rooms};
use super::reachability::{reachable, reachable_with_locked};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuditFailure {
    ExitUnreachable,
    /// The exit is only reachable by walking through placed content.
    ExitBlockedByContent,
    RoomDisconnected { room: String },
    LockWithoutEffect { room: String },
    /// Collecting every reachable keycard never opens this room.
    ProgressionStuck { room: String },
    /// No reachable shutoff control ever clears this hazard.
    HazardStuck { pos: Pos },
    PowerDeadlock { room: String },
}

impl fmt::Display for AuditFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExitUnreachable => write!(f, "exit is not reachable from start"),
            Self::ExitBlockedByContent => {
                write!(f, "placed content blocks every route to the exit")
            }
            Self::RoomDisconnected { room } => {
                write!(f, "doorways of {room} are not mutually reachable")
            }
            Self::LockWithoutEffect { room } => {
                write!(f, "locking {room} does not seal it off")
            }
            Self::ProgressionStuck { room } => {
                write!(f, "{room} stays locked: its keycard is never reachable")
            }
            Self::HazardStuck { pos } => {
                write!(f, "hazard at ({}, {}) has no reachable shutoff", pos.y, pos.x)
            }
            Self::PowerDeadlock { room } => {
                write!(f, "{room} gates the exit but can never be powered")
            }
        }
    }
}

impl Error for AuditFailure {}

/// Every failure found on `level`, empty for a sound level.
pub fn audit_level(level: &PopulatedLevel) -> Vec<AuditFailure> {
    let grid = &level.grid;
    let locked = &level.sets.locked_cells;
    let (Some(start), Some(exit)) = (grid.start(), grid.exit()) else {
        return vec![AuditFailure::ExitUnreachable];
    };

    let mut failures = Vec::new();
    let reached = reachable_with_locked(grid, start, locked);
    if !reached.contains(&exit) {
        failures.push(AuditFailure::ExitUnreachable);
    } else if !reachable_past_content(grid, start, locked).contains(&exit) {
        failures.push(AuditFailure::ExitBlockedByContent);
    }

    for room in grid.room_names() {
        let entries = level.entry_points.get(&room).map(Vec::as_slice).unwrap_or_default();
        if !room_still_connected_if_block(grid, &room, entries, None) {
            failures.push(AuditFailure::RoomDisconnected { room });
        }
    }

    for lock in &level.summary.locked_rooms {
        let leaks = grid.room_cells(&lock.room).iter().any(|pos| reached.contains(pos));
        if leaks || !lock.gates_anything() {
            failures.push(AuditFailure::LockWithoutEffect { room: lock.room.clone() });
        }
    }

    let still_locked = solve_progression(grid, start, locked);
    for lock in &level.summary.locked_rooms {
        if lock.entries.iter().any(|entry| still_locked.contains(entry)) {
            failures.push(AuditFailure::ProgressionStuck { room: lock.room.clone() });
        }
    }
    for &pos in &level.summary.hazards {
        if still_locked.contains(&pos) {
            failures.push(AuditFailure::HazardStuck { pos });
        }
    }

    for room in unpowered_door_rooms(grid) {
        if gatekeeper_status(grid, start, exit, locked, &room) == GatekeeperStatus::Deadlocked {
            failures.push(AuditFailure::PowerDeadlock { room });
        }
    }

    failures
}

/// Cells reachable when, besides `locked`, every cell holding something
/// other than a door is impassable.
pub fn reachable_past_content(
    grid: &Grid,
    start: Pos,
    locked: &BTreeSet<Pos>,
) -> BTreeSet<Pos> {
    reachable(grid, start, |cell| {
        locked.contains(&cell.pos)
            || cell.content.as_ref().is_some_and(|entity| !matches!(entity, Entity::Door(_)))
    })
}

/// Plays the level forward: picks up every reachable keycard, opens the
/// doors it fits, trips every reachable hazard shutoff, and repeats until
/// nothing changes. Returns the cells that stay impassable.
pub fn solve_progression(grid: &Grid, start: Pos, locked: &BTreeSet<Pos>) -> BTreeSet<Pos> {
    let mut locked = locked.clone();
    loop {
        let reachable = reachable_with_locked(grid, start, &locked);
        let mut keycards = BTreeSet::new();
        let mut cleared = BTreeSet::new();
        for &pos in &reachable {
            let Some(cell) = grid.cell(pos) else {
                continue;
            };
            for item in &cell.items {
                if let Item::Keycard(name) = item {
                    keycards.insert(name.as_str());
                }
            }
            if let Some(Entity::HazardControl(control)) = &cell.content {
                cleared.insert(control.hazard_pos);
            }
        }

        let opened: Vec<Pos> = locked
            .iter()
            .copied()
            .filter(|&pos| {
                cleared.contains(&pos)
                    || grid
                        .cell(pos)
                        .and_then(|cell| cell.door())
                        .is_some_and(|door| keycards.contains(door.keycard_name().as_str()))
            })
            .collect();
        if opened.is_empty() {
            return locked;
        }
        for pos in opened {
            locked.remove(&pos);
        }
    }
}
