//! Unlocked power doors on every remaining doorable room.

use crate::entities::{Door, Entity};

use super::{PlacementContext, is_doorable};

pub(super) fn place_power_doors(context: &mut PlacementContext<'_>) {
    let start_room = context.start_room();
    let entry_points = context.entry_points;

    for (room, entries) in entry_points {
        if !is_doorable(entries) {
            continue;
        }
        if !entries.iter().all(|&entry| context.is_free(entry)) {
            log::debug!("{room}: entries already in use; no power doors");
            continue;
        }

        let powered = start_room.as_ref() == Some(room);
        for &entry in entries {
            context.place(entry, Entity::Door(Door { powered, ..Door::unlocked(room) }));
        }
        context.summary.power_door_rooms.push(room.clone());
        if !powered {
            context.hint(format!("The doors into the {room} need power."));
        }
    }
}
