//! Maintenance and CCTV terminals, at most one of each kind per room.

use crate::entities::{CctvTerminal, Entity, EntityKind, MaintenanceTerminal};
use crate::populate::progression;

use super::PlacementContext;

pub(super) fn place_maintenance_terminals(context: &mut PlacementContext<'_>) {
    let target = progression::maintenance_terminal_count(context.level, context.difficulty);
    let placed = place_terminals(context, EntityKind::Maintenance, target, |room| {
        Entity::Maintenance(MaintenanceTerminal { room: room.to_string() })
    });
    context.summary.maintenance_terminals += placed;
}

pub(super) fn place_cctv_terminals(context: &mut PlacementContext<'_>) {
    let target = progression::cctv_terminal_count(context.level, context.difficulty);
    let placed = place_terminals(context, EntityKind::Cctv, target, |room| {
        Entity::Cctv(CctvTerminal { room: room.to_string() })
    });
    context.summary.cctv_terminals += placed;
}

fn place_terminals<F>(
    context: &mut PlacementContext<'_>,
    kind: EntityKind,
    target: usize,
    build: F,
) -> usize
where
    F: Fn(&str) -> Entity,
{
    let reachable = context.reachable_now();
    let mut rooms: Vec<String> = context
        .reached_rooms(&reachable)
        .into_iter()
        .filter(|room| !context.room_has(room, kind))
        .collect();
    context.shuffle(&mut rooms);

    let mut placed = 0;
    for room in rooms {
        if placed >= target {
            break;
        }
        let spots = context.room_spots(&room);
        let Some(pos) = context.pick(&spots) else {
            log::debug!("{room}: no free cell for a {kind:?} terminal");
            continue;
        };
        if context.place(pos, build(&room)) {
            placed += 1;
            context.hint(match kind {
                EntityKind::Maintenance => {
                    format!("A maintenance terminal in the {room} can reroute power.")
                }
                _ => format!("A CCTV terminal in the {room} shows the nearby cameras."),
            });
        }
    }
    if placed < target {
        log::debug!("placed {placed} of {target} {kind:?} terminals");
    }
    placed
}
