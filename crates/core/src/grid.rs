//! Cell grid handed to the population engine: room membership, neighbours,
//! and one content slot per cell.

use std::collections::BTreeSet;
use std::error::Error;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entities::{Door, Entity, Item};
use crate::populate::reachability::reachable;
use crate::types::{Direction, Pos};

pub const CORRIDOR: &str = "Corridor";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub pos: Pos,
    pub is_room: bool,
    /// Empty or [`CORRIDOR`] for corridor cells, otherwise the room label.
    pub room_name: String,
    pub content: Option<Entity>,
    pub items: Vec<Item>,
}

impl Cell {
    fn wall(pos: Pos) -> Self {
        Self { pos, is_room: false, room_name: String::new(), content: None, items: Vec::new() }
    }

    pub fn is_corridor(&self) -> bool {
        self.is_room && (self.room_name.is_empty() || self.room_name == CORRIDOR)
    }

    pub fn is_named_room(&self) -> bool {
        self.is_room && !self.is_corridor()
    }

    pub fn belongs_to(&self, room: &str) -> bool {
        self.is_named_room() && self.room_name == room
    }

    pub fn door(&self) -> Option<&Door> {
        self.content.as_ref().and_then(Entity::as_door)
    }

    pub fn has_entity(&self) -> bool {
        self.content.is_some()
    }

    /// No entity and no pickups.
    pub fn is_vacant(&self) -> bool {
        self.content.is_none() && self.items.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    start: Option<Pos>,
    exit: Option<Pos>,
}

impl Grid {
    /// A grid of walls.
    pub fn new(width: usize, height: usize) -> Self {
        let mut cells = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                cells.push(Cell::wall(Pos { y: y as i32, x: x as i32 }));
            }
        }
        Self { width, height, cells, start: None, exit: None }
    }

    /// Builds a grid from text rows: `.` is corridor, a `legend` character is a
    /// cell of the named room, anything else is wall. Short rows are padded
    /// with wall.
    pub fn from_ascii(rows: &[&str], legend: &[(char, &str)]) -> Self {
        let width = rows.iter().map(|row| row.chars().count()).max().unwrap_or(0);
        let mut grid = Self::new(width, rows.len());
        for (y, row) in rows.iter().enumerate() {
            for (x, symbol) in row.chars().enumerate() {
                let pos = Pos { y: y as i32, x: x as i32 };
                if symbol == '.' {
                    grid.set_corridor(pos);
                } else if let Some((_, name)) = legend.iter().find(|(key, _)| *key == symbol) {
                    grid.set_room(pos, name);
                }
            }
        }
        grid
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    fn index(&self, pos: Pos) -> Option<usize> {
        self.in_bounds(pos).then(|| (pos.y as usize) * self.width + (pos.x as usize))
    }

    pub fn cell(&self, pos: Pos) -> Option<&Cell> {
        self.index(pos).map(|index| &self.cells[index])
    }

    pub fn cell_mut(&mut self, pos: Pos) -> Option<&mut Cell> {
        self.index(pos).map(|index| &mut self.cells[index])
    }

    /// Row-major iteration, so positions come out in ascending order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    pub fn neighbor(&self, pos: Pos, direction: Direction) -> Option<&Cell> {
        self.cell(pos.step(direction))
    }

    pub fn neighbors(&self, pos: Pos) -> impl Iterator<Item = &Cell> {
        Direction::ALL.into_iter().filter_map(move |direction| self.neighbor(pos, direction))
    }

    pub fn set_room(&mut self, pos: Pos, name: &str) {
        if let Some(cell) = self.cell_mut(pos) {
            cell.is_room = true;
            cell.room_name = name.to_string();
        }
    }

    pub fn set_corridor(&mut self, pos: Pos) {
        self.set_room(pos, CORRIDOR);
    }

    pub fn start(&self) -> Option<Pos> {
        self.start
    }

    pub fn exit(&self) -> Option<Pos> {
        self.exit
    }

    pub fn set_start(&mut self, pos: Pos) {
        self.start = Some(pos);
    }

    pub fn set_exit(&mut self, pos: Pos) {
        self.exit = Some(pos);
    }

    pub fn room_names(&self) -> BTreeSet<String> {
        self.cells
            .iter()
            .filter(|cell| cell.is_named_room())
            .map(|cell| cell.room_name.clone())
            .collect()
    }

    pub fn room_cells(&self, room: &str) -> Vec<Pos> {
        self.cells.iter().filter(|cell| cell.belongs_to(room)).map(|cell| cell.pos).collect()
    }

    /// Name of the named room containing `pos`; corridors and walls have none.
    pub fn room_of(&self, pos: Pos) -> Option<&str> {
        self.cell(pos).filter(|cell| cell.is_named_room()).map(|cell| cell.room_name.as_str())
    }

    /// Cells holding a door that leads into `room`.
    pub fn door_cells(&self, room: &str) -> Vec<Pos> {
        self.cells
            .iter()
            .filter(|cell| cell.door().is_some_and(|door| door.room == room))
            .map(|cell| cell.pos)
            .collect()
    }

    /// Puts `entity` in an empty room cell. Returns false when the cell is a
    /// wall, out of bounds, or already holds an entity.
    pub fn place_entity(&mut self, pos: Pos, entity: Entity) -> bool {
        match self.cell_mut(pos) {
            Some(cell) if cell.is_room && cell.content.is_none() => {
                cell.content = Some(entity);
                true
            }
            _ => false,
        }
    }

    pub fn add_item(&mut self, pos: Pos, item: Item) -> bool {
        match self.cell_mut(pos) {
            Some(cell) if cell.is_room => {
                cell.items.push(item);
                true
            }
            _ => false,
        }
    }

    /// Structural preconditions the population engine relies on.
    pub fn validate(&self) -> Result<(), GridError> {
        let start = self.start.ok_or(GridError::MissingStart)?;
        let exit = self.exit.ok_or(GridError::MissingExit)?;
        match self.cell(start) {
            None => return Err(GridError::StartOutOfBounds(start)),
            Some(cell) if !cell.is_room => return Err(GridError::StartNotRoom(start)),
            Some(_) => {}
        }
        match self.cell(exit) {
            None => return Err(GridError::ExitOutOfBounds(exit)),
            Some(cell) if !cell.is_room => return Err(GridError::ExitNotRoom(exit)),
            Some(_) => {}
        }
        if !reachable(self, start, |_| false).contains(&exit) {
            return Err(GridError::ExitUnreachable { start, exit });
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GridError {
    MissingStart,
    MissingExit,
    StartOutOfBounds(Pos),
    ExitOutOfBounds(Pos),
    StartNotRoom(Pos),
    ExitNotRoom(Pos),
    /// The carved topology itself does not connect start and exit.
    ExitUnreachable { start: Pos, exit: Pos },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingStart => write!(f, "grid has no start cell"),
            Self::MissingExit => write!(f, "grid has no exit cell"),
            Self::StartOutOfBounds(pos) => {
                write!(f, "start cell ({}, {}) is outside the grid", pos.y, pos.x)
            }
            Self::ExitOutOfBounds(pos) => {
                write!(f, "exit cell ({}, {}) is outside the grid", pos.y, pos.x)
            }
            Self::StartNotRoom(pos) => {
                write!(f, "start cell ({}, {}) is not a room cell", pos.y, pos.x)
            }
            Self::ExitNotRoom(pos) => {
                write!(f, "exit cell ({}, {}) is not a room cell", pos.y, pos.x)
            }
            Self::ExitUnreachable { start, exit } => write!(
                f,
                "exit ({}, {}) cannot be reached from start ({}, {})",
                exit.y, exit.x, start.y, start.x
            ),
        }
    }
}

impl Error for GridError {}
