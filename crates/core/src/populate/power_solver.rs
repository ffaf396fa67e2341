//! Power-dependency check run once every door and terminal is in place.
//!
//! A gatekeeper is a room with doors that every start-to-exit path crosses.
//! Its doors need power from a maintenance terminal in an adjacent room the
//! player can reach without entering the gatekeeper first. When no such
//! terminal exists the level would deadlock, so the gatekeeper's doors are
//! switched on from the start.

use std::collections::{BTreeMap, BTreeSet};

use crate::entities::Entity;
use crate::grid::Grid;
use crate::types::Pos;

use super::reachability::reachable_without_entering;
use super::topology::adjacent_room_names;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GatekeeperStatus {
    /// The exit stays reachable with the room's doors shut.
    NotGatekeeper,
    /// Powerable from the maintenance terminal in `via`.
    Powerable { via: String },
    Deadlocked,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PowerReport {
    pub powered_via: BTreeMap<String, String>,
    /// Rooms whose doors were forced on, sorted.
    pub forced: Vec<String>,
}

pub fn gatekeeper_status(
    grid: &Grid,
    start: Pos,
    exit: Pos,
    locked: &BTreeSet<Pos>,
    room: &str,
) -> GatekeeperStatus {
    let restricted = reachable_without_entering(grid, start, locked, room);
    if restricted.contains(&exit) {
        return GatekeeperStatus::NotGatekeeper;
    }

    let adjacent: BTreeSet<String> = adjacent_room_names(grid, room).into_iter().collect();
    let via = restricted
        .iter()
        .filter_map(|&pos| grid.cell(pos))
        .filter(|cell| matches!(cell.content, Some(Entity::Maintenance(_))))
        .filter_map(|cell| adjacent.get(&cell.room_name))
        .min();
    match via {
        Some(room) => GatekeeperStatus::Powerable { via: room.clone() },
        None => GatekeeperStatus::Deadlocked,
    }
}

/// Rooms owning at least one unpowered door, excluding the start room.
pub fn unpowered_door_rooms(grid: &Grid) -> BTreeSet<String> {
    let start_room = grid.start().and_then(|start| grid.room_of(start));
    grid.cells()
        .filter_map(|cell| cell.door())
        .filter(|door| !door.powered && Some(door.room.as_str()) != start_room)
        .map(|door| door.room.clone())
        .collect()
}

/// Forces every deadlocked gatekeeper's doors on. Reachability ignores
/// power, so the order rooms are handled in never changes the outcome.
pub fn resolve_power_deadlocks(grid: &mut Grid, locked: &BTreeSet<Pos>) -> PowerReport {
    let mut report = PowerReport::default();
    let (Some(start), Some(exit)) = (grid.start(), grid.exit()) else {
        return report;
    };

    for room in unpowered_door_rooms(grid) {
        match gatekeeper_status(grid, start, exit, locked, &room) {
            GatekeeperStatus::NotGatekeeper => {}
            GatekeeperStatus::Powerable { via } => {
                report.powered_via.insert(room, via);
            }
            GatekeeperStatus::Deadlocked => {
                power_doors(grid, &room);
                log::warn!(
                    "{room} gates the exit with no reachable maintenance terminal; \
                     pre-powering its doors"
                );
                report.forced.push(room);
            }
        }
    }
    report
}

fn power_doors(grid: &mut Grid, room: &str) {
    for pos in grid.door_cells(room) {
        let door = grid.cell_mut(pos).and_then(|cell| cell.content.as_mut());
        if let Some(door) = door.and_then(Entity::as_door_mut) {
            door.powered = true;
        }
    }
}
