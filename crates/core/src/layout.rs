//! Reference station topology: non-touching rectangular rooms joined by
//! L-shaped corridors. Supplies grids to the tools and tests; the population
//! engine only ever reads what this produces.

use crate::grid::Grid;
use crate::seed::{mix_seed_stream, random_usize};
use crate::types::Pos;

pub const FIRST_ROOM_NAME: &str = "Airlock";

const STATION_ROOM_NAMES: [&str; 12] = [
    "Bridge",
    "Crew Quarters",
    "Cargo Bay",
    "Laboratory",
    "Medbay",
    "Engineering",
    "Reactor",
    "Hydroponics",
    "Comms",
    "Armory",
    "Server Room",
    "Observation Deck",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct RoomRect {
    x: usize,
    y: usize,
    width: usize,
    height: usize,
}

impl RoomRect {
    fn right(self) -> usize {
        self.x + self.width - 1
    }

    fn bottom(self) -> usize {
        self.y + self.height - 1
    }

    fn center(self) -> Pos {
        Pos { y: (self.y + (self.height / 2)) as i32, x: (self.x + (self.width / 2)) as i32 }
    }

    fn expanded(self, margin: usize) -> Self {
        let expanded_x = self.x.saturating_sub(margin);
        let expanded_y = self.y.saturating_sub(margin);
        Self {
            x: expanded_x,
            y: expanded_y,
            width: self.right() + margin - expanded_x + 1,
            height: self.bottom() + margin - expanded_y + 1,
        }
    }

    fn intersects(self, other: &Self) -> bool {
        self.x <= other.right()
            && self.right() >= other.x
            && self.y <= other.bottom()
            && self.bottom() >= other.y
    }

    fn cells(self) -> impl Iterator<Item = Pos> {
        (self.y..=self.bottom()).flat_map(move |y| {
            (self.x..=self.right()).map(move |x| Pos { y: y as i32, x: x as i32 })
        })
    }
}

/// Builds a station of `width` x `height` cells. Start sits at the centre of
/// the first room (the airlock), the exit at the centre of the room farthest
/// from it. Grids too small for any room come back as solid wall with no
/// endpoints, which `Grid::validate` rejects.
pub fn build_station_layout(seed: u64, width: usize, height: usize) -> Grid {
    let mut grid = Grid::new(width, height);
    let rooms = place_rooms(seed, width, height);
    let names = room_names(seed, rooms.len());
    for (room, name) in rooms.iter().zip(&names) {
        for pos in room.cells() {
            grid.set_room(pos, name);
        }
    }
    connect_rooms(&mut grid, seed, &rooms);

    let Some(first) = rooms.first() else {
        return grid;
    };
    let start = first.center();
    let mut exit = start;
    let mut best_distance = 0_u32;
    for room in &rooms {
        let center = room.center();
        let distance = start.manhattan(center);
        if distance > best_distance || (distance == best_distance && center > exit) {
            exit = center;
            best_distance = distance;
        }
    }
    grid.set_start(start);
    grid.set_exit(exit);
    grid
}

fn place_rooms(seed: u64, width: usize, height: usize) -> Vec<RoomRect> {
    let minimum_room_width = 4usize;
    let maximum_room_width = 8usize;
    let minimum_room_height = 3usize;
    let maximum_room_height = 6usize;
    let area_bonus = (width * height) / 250;
    let target_room_count = 5 + area_bonus.min(6) + random_usize(seed, 1, 0, 2);

    let mut rooms: Vec<RoomRect> = Vec::new();
    for attempt in 0_u64..200 {
        if rooms.len() >= target_room_count {
            break;
        }
        let room_width =
            random_usize(seed, attempt * 8 + 2, minimum_room_width, maximum_room_width);
        let room_height =
            random_usize(seed, attempt * 8 + 3, minimum_room_height, maximum_room_height);
        if room_width + 2 >= width || room_height + 2 >= height {
            continue;
        }

        let x = random_usize(seed, attempt * 8 + 4, 1, width - room_width - 1);
        let y = random_usize(seed, attempt * 8 + 5, 1, height - room_height - 1);
        let candidate = RoomRect { x, y, width: room_width, height: room_height };
        let with_margin = candidate.expanded(1);
        if rooms.iter().any(|existing| existing.expanded(1).intersects(&with_margin)) {
            continue;
        }
        rooms.push(candidate);
    }

    add_fallback_rooms(width, height, &mut rooms);
    rooms.sort_by_key(|room| {
        let center = room.center();
        (center.y, center.x, room.height, room.width)
    });
    rooms
}

fn add_fallback_rooms(width: usize, height: usize, rooms: &mut Vec<RoomRect>) {
    let fallback_width = 4usize;
    let fallback_height = 4usize;
    if fallback_width + 2 >= width || fallback_height + 2 >= height {
        return;
    }

    let corners = [
        (1usize, 1usize),
        (width - fallback_width - 1, 1usize),
        (1usize, height - fallback_height - 1),
        (width - fallback_width - 1, height - fallback_height - 1),
    ];
    for (x, y) in corners {
        if rooms.len() >= 4 {
            break;
        }
        let candidate = RoomRect { x, y, width: fallback_width, height: fallback_height };
        let with_margin = candidate.expanded(1);
        if rooms.iter().any(|existing| existing.expanded(1).intersects(&with_margin)) {
            continue;
        }
        rooms.push(candidate);
    }
}

/// "Airlock" first, then the station table from a seeded offset. A table
/// name used again gets a numeric suffix.
fn room_names(seed: u64, count: usize) -> Vec<String> {
    let table_len = STATION_ROOM_NAMES.len();
    let offset = random_usize(seed, 97, 0, table_len - 1);
    (0..count)
        .map(|index| {
            if index == 0 {
                return FIRST_ROOM_NAME.to_string();
            }
            let slot = index - 1;
            let base = STATION_ROOM_NAMES[(offset + slot) % table_len];
            match slot / table_len {
                0 => base.to_string(),
                round => format!("{base} {}", round + 1),
            }
        })
        .collect()
}

/// Nearest-first spanning connection: repeatedly joins the closest pending
/// room to any connected one.
fn connect_rooms(grid: &mut Grid, seed: u64, rooms: &[RoomRect]) {
    let mut connected = vec![0_usize];
    let mut pending: Vec<usize> = (1..rooms.len()).collect();

    while !pending.is_empty() {
        let mut best: Option<(u32, usize, usize)> = None;
        for &from in &connected {
            for &to in &pending {
                let distance = rooms[from].center().manhattan(rooms[to].center());
                if best.is_none_or(|current| (distance, from, to) < current) {
                    best = Some((distance, from, to));
                }
            }
        }
        let Some((_, from, to)) = best else {
            break;
        };

        let horizontal_first = mix_seed_stream(seed, ((from as u64) << 32) | (to as u64)) & 1 == 0;
        carve_corridor(grid, rooms[from].center(), rooms[to].center(), horizontal_first);
        connected.push(to);
        pending.retain(|&index| index != to);
    }
}

fn carve_corridor(grid: &mut Grid, from: Pos, to: Pos, horizontal_first: bool) {
    let corner =
        if horizontal_first { Pos { y: from.y, x: to.x } } else { Pos { y: to.y, x: from.x } };
    for pos in straight_line(from, corner).chain(straight_line(corner, to)) {
        if grid.cell(pos).is_some_and(|cell| !cell.is_room) {
            grid.set_corridor(pos);
        }
    }
}

/// Cells from `from` to `to` inclusive along one axis.
fn straight_line(from: Pos, to: Pos) -> impl Iterator<Item = Pos> {
    let steps = from.manhattan(to) as i32;
    let dy = (to.y - from.y).signum();
    let dx = (to.x - from.x).signum();
    (0..=steps).map(move |step| Pos { y: from.y + dy * step, x: from.x + dx * step })
}
