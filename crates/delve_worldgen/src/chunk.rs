//! # Chunk System
//!
//! The world is an unbounded 2D grid split into square chunks of
//! `CHUNK_SIZE` x `CHUNK_SIZE` cells. World `y` is depth and grows
//! downward; row 0 is the top of the sky.
//!
//! Chunk coordinates are `i32`; world cell coordinates are `i64` so every
//! chunk coordinate has a representable world origin.

use std::fmt;

use crate::cell::Cell;

/// Chunk width/height in cells.
pub const CHUNK_SIZE: usize = 32;

/// `CHUNK_SIZE` as a signed world-space stride.
#[allow(clippy::cast_possible_wrap)]
pub const CHUNK_SIZE_I64: i64 = CHUNK_SIZE as i64;

/// Chunk coordinate (identifies a chunk in the world grid).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChunkCoord {
    /// Horizontal chunk index.
    pub x: i32,
    /// Vertical chunk index (grows with depth).
    pub y: i32,
}

impl ChunkCoord {
    /// Creates a new chunk coordinate.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chunk containing the world cell `(world_x, world_y)`.
    ///
    /// Uses floor division, so `-1` lands in chunk `-1`. Positions beyond the
    /// `i32` chunk range saturate to the outermost chunk.
    #[inline]
    #[must_use]
    pub fn from_world_pos(world_x: i64, world_y: i64) -> Self {
        Self {
            x: saturate(world_x.div_euclid(CHUNK_SIZE_I64)),
            y: saturate(world_y.div_euclid(CHUNK_SIZE_I64)),
        }
    }

    /// World X of the chunk's left column.
    #[inline]
    #[must_use]
    pub const fn world_x(self) -> i64 {
        self.x as i64 * CHUNK_SIZE_I64
    }

    /// World Y of the chunk's top row.
    #[inline]
    #[must_use]
    pub const fn world_y(self) -> i64 {
        self.y as i64 * CHUNK_SIZE_I64
    }
}

impl fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[allow(clippy::cast_possible_truncation)]
fn saturate(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Local offset of a world cell inside its chunk.
#[inline]
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn local_offset(world_x: i64, world_y: i64) -> (usize, usize) {
    (
        world_x.rem_euclid(CHUNK_SIZE_I64) as usize,
        world_y.rem_euclid(CHUNK_SIZE_I64) as usize,
    )
}

/// A chunk of world data.
#[derive(Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Chunk position in the world.
    pub coord: ChunkCoord,
    /// Cell data, indexed as `[y][x]`.
    cells: Box<[[Cell; CHUNK_SIZE]; CHUNK_SIZE]>,
    /// Whether gameplay has changed this chunk since it was generated.
    pub modified: bool,
}

impl Chunk {
    /// Creates an all-empty chunk at the given coordinates.
    #[must_use]
    pub fn new(coord: ChunkCoord) -> Self {
        Self {
            coord,
            cells: Box::new([[Cell::EMPTY; CHUNK_SIZE]; CHUNK_SIZE]),
            modified: false,
        }
    }

    /// Gets the cell at local coordinates. Out of range reads as empty.
    #[inline]
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> Cell {
        if x < CHUNK_SIZE && y < CHUNK_SIZE {
            self.cells[y][x]
        } else {
            Cell::EMPTY
        }
    }

    /// Gets the cell at a signed local offset, `None` outside the chunk.
    #[inline]
    #[must_use]
    pub fn get_signed(&self, x: i64, y: i64) -> Option<Cell> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        (x < CHUNK_SIZE && y < CHUNK_SIZE).then(|| self.cells[y][x])
    }

    /// Mutable access at local coordinates.
    #[inline]
    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut Cell> {
        self.cells.get_mut(y).and_then(|row| row.get_mut(x))
    }

    /// Writes a cell during generation. Does not mark the chunk modified.
    #[inline]
    pub(crate) fn put(&mut self, x: usize, y: usize, cell: Cell) {
        if let Some(slot) = self.get_mut(x, y) {
            *slot = cell;
        }
    }

    /// Sets a cell on behalf of gameplay and marks the chunk modified.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if let Some(slot) = self.get_mut(x, y) {
            *slot = cell;
            self.modified = true;
        }
    }

    /// World X of local column `x`.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub const fn world_x(&self, x: usize) -> i64 {
        self.coord.world_x() + x as i64
    }

    /// World Y (depth) of local row `y`.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub const fn world_y(&self, y: usize) -> i64 {
        self.coord.world_y() + y as i64
    }

    /// Iterates `(x, y, cell)` over every cell, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .flat_map(|(y, row)| row.iter().enumerate().map(move |(x, cell)| (x, y, *cell)))
    }

    /// Number of cells matching `predicate`.
    pub fn count(&self, predicate: impl Fn(Cell) -> bool) -> usize {
        self.iter().filter(|&(_, _, cell)| predicate(cell)).count()
    }
}

impl fmt::Debug for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chunk")
            .field("coord", &self.coord)
            .field("modified", &self.modified)
            .finish_non_exhaustive()
    }
}
