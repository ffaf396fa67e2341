//! Locked rooms and their keycards.
//!
//! A room is only locked when sealing its entries takes the whole room out of
//! reach, and more than the entries themselves, while leaving the exit
//! reachable. Its keycard always lands on the near side of the lock.

use std::collections::BTreeSet;

use crate::entities::{Door, Entity, Item, keycard_name};
use crate::populate::model::LockedRoom;
use crate::populate::progression;
use crate::populate::reachability::reachable_with_locked;
use crate::types::Pos;

use super::{PlacementContext, is_doorable};

pub(super) fn place_locked_rooms(context: &mut PlacementContext<'_>) {
    let target = progression::locked_room_count(context.level, context.difficulty);
    let start_room = context.start_room();
    let mut candidates: Vec<String> = context
        .entry_points
        .iter()
        .filter(|(room, entries)| is_doorable(entries) && Some(*room) != start_room.as_ref())
        .map(|(room, _)| room.clone())
        .collect();
    context.shuffle(&mut candidates);

    for room in candidates {
        if context.summary.locked_rooms.len() >= target {
            break;
        }
        try_lock_room(context, &room);
    }
    if context.summary.locked_rooms.len() < target {
        log::debug!(
            "locked {} of {target} rooms; no other room gates anything",
            context.summary.locked_rooms.len()
        );
    }
}

fn try_lock_room(context: &mut PlacementContext<'_>, room: &str) -> bool {
    let entries = context.entries(room).to_vec();
    let before = context.reachable_now();
    if !entries.iter().all(|&entry| context.is_free(entry) && before.contains(&entry)) {
        log::debug!("{room}: an entry is already used or out of reach");
        return false;
    }

    let mut locked = context.sets.locked_cells.clone();
    locked.extend(entries.iter().copied());
    let after = reachable_with_locked(context.grid, context.start, &locked);
    let leaks = context.grid.room_cells(room).into_iter().any(|pos| after.contains(&pos));
    if leaks || after.len() + entries.len() >= before.len() {
        log::debug!("{room}: locking its entries would not seal it off");
        return false;
    }
    if !after.contains(&context.exit) {
        log::debug!("{room}: locking it would cut off the exit");
        return false;
    }
    let Some(keycard_pos) = keycard_spot(context, &after) else {
        log::debug!("{room}: nowhere to put its keycard");
        return false;
    };

    for &entry in &entries {
        context.place(entry, Entity::Door(Door::locked(room)));
    }
    context.sets.locked_cells.extend(entries.iter().copied());
    let keycard = keycard_name(room);
    context.drop_item(keycard_pos, Item::Keycard(keycard.clone()));
    context.hint(format!(
        "The {room} is sealed. The {keycard} is in {}.",
        context.place_label(keycard_pos)
    ));
    context.summary.locked_rooms.push(LockedRoom {
        room: room.to_string(),
        entries,
        keycard_pos,
        reachable_before: before.len(),
        reachable_after: after.len(),
    });
    true
}

/// A free cell in the post-lock reachable set, preferring named rooms over
/// corridors.
fn keycard_spot(context: &mut PlacementContext<'_>, after: &BTreeSet<Pos>) -> Option<Pos> {
    let spots = context.item_spots(after);
    let in_rooms: Vec<Pos> =
        spots.iter().copied().filter(|&pos| context.grid.room_of(pos).is_some()).collect();
    if in_rooms.is_empty() { context.pick(&spots) } else { context.pick(&in_rooms) }
}
