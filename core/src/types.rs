use core::fmt;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Grid coordinates, `row` first, both 0-indexed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Whether the position lies inside a `rows x cols` grid.
    pub const fn is_within(self, (rows, cols): (usize, usize)) -> bool {
        self.row < rows && self.col < cols
    }
}

impl From<(usize, usize)> for Position {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Position {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.row, self.col]
    }
}

pub trait NeighborIterExt {
    fn iter_neighbors(&self, center: Position) -> NeighborIter;
}

impl<T> NeighborIterExt for Array2<T> {
    fn iter_neighbors(&self, center: Position) -> NeighborIter {
        NeighborIter::new(center, self.dim())
    }
}

const DISPLACEMENTS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Applies `delta` to `pos`, returning a value only when it remains in bounds.
fn apply_delta(pos: Position, delta: (isize, isize), bounds: (usize, usize)) -> Option<Position> {
    let (d_row, d_col) = delta;

    let row = pos.row.checked_add_signed(d_row)?;
    let col = pos.col.checked_add_signed(d_col)?;

    let next = Position::new(row, col);
    next.is_within(bounds).then_some(next)
}

/// The up-to-8 in-grid neighbors of a cell, computed on demand.
#[derive(Debug)]
pub struct NeighborIter {
    center: Position,
    bounds: (usize, usize),
    index: u8,
}

impl NeighborIter {
    pub fn new(center: Position, bounds: (usize, usize)) -> Self {
        Self {
            center,
            bounds,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Position;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let delta = *DISPLACEMENTS.get(usize::from(self.index))?;
            self.index += 1;

            if let Some(next_item) = apply_delta(self.center, delta, self.bounds) {
                return Some(next_item);
            }
        }
    }
}
