//! Bounded battle grid with static walls.
//!
//! Cells are 1-indexed: `(1, 1)` is the top-left corner and
//! `(width, height)` the bottom-right one. Occupancy is not stored here; it
//! is queried through the [`Occupancy`] trait so the same grid can be used
//! against live rosters or an ad hoc set of blocked cells.
mod path;

use std::collections::{BTreeSet, HashSet};

use crate::state::Position;

pub use path::{find_path, reachable_cells};

/// Classification of a single cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellKind {
    Open,
    Wall,
    OutOfBounds,
}

/// Static encounter map: dimensions plus the wall set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: i32,
    height: i32,
    walls: HashSet<Position>,
}

impl Grid {
    pub fn new(width: u32, height: u32, walls: impl IntoIterator<Item = Position>) -> Self {
        let mut grid = Self {
            width: width as i32,
            height: height as i32,
            walls: HashSet::new(),
        };
        for wall in walls {
            grid.add_wall(wall);
        }
        grid
    }

    /// Open grid with no walls.
    pub fn open(width: u32, height: u32) -> Self {
        Self::new(width, height, [])
    }

    pub fn width(&self) -> u32 {
        self.width as u32
    }

    pub fn height(&self) -> u32 {
        self.height as u32
    }

    #[inline]
    pub fn contains(&self, pos: Position) -> bool {
        (1..=self.width).contains(&pos.x) && (1..=self.height).contains(&pos.y)
    }

    #[inline]
    pub fn is_wall(&self, pos: Position) -> bool {
        self.walls.contains(&pos)
    }

    pub fn cell(&self, pos: Position) -> CellKind {
        if !self.contains(pos) {
            CellKind::OutOfBounds
        } else if self.is_wall(pos) {
            CellKind::Wall
        } else {
            CellKind::Open
        }
    }

    /// In bounds and not a wall.
    #[inline]
    pub fn is_passable(&self, pos: Position) -> bool {
        self.cell(pos) == CellKind::Open
    }

    /// Runtime wall edit. Out-of-bounds cells are ignored.
    pub fn add_wall(&mut self, pos: Position) -> bool {
        self.contains(pos) && self.walls.insert(pos)
    }

    pub fn remove_wall(&mut self, pos: Position) -> bool {
        self.walls.remove(&pos)
    }

    /// Walls in a stable order.
    pub fn walls(&self) -> BTreeSet<Position> {
        self.walls.iter().copied().collect()
    }

    /// In-bounds orthogonal neighbours (walls included).
    pub fn neighbors(&self, pos: Position) -> impl Iterator<Item = Position> + '_ {
        pos.neighbors4().into_iter().filter(|p| self.contains(*p))
    }

    /// Every in-bounds cell, row by row.
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        (1..=self.height).flat_map(move |y| (1..=self.width).map(move |x| Position::new(x, y)))
    }
}

/// Dynamic "is a living unit standing here" query.
pub trait Occupancy {
    fn is_occupied(&self, pos: Position) -> bool;
}

impl Occupancy for HashSet<Position> {
    fn is_occupied(&self, pos: Position) -> bool {
        self.contains(&pos)
    }
}

impl Occupancy for BTreeSet<Position> {
    fn is_occupied(&self, pos: Position) -> bool {
        self.contains(&pos)
    }
}

/// Nothing is occupied.
impl Occupancy for () {
    fn is_occupied(&self, _pos: Position) -> bool {
        false
    }
}
