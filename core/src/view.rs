use core::ops::Index;
use ndarray::{Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::*;

/// What a discovered cell shows.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellCategory {
    Mine,
    Blank,
    Numbered(u8),
}

/// Player-visible state of one cell, `category` is only known once discovered.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellView {
    pub discovered: bool,
    pub marked: bool,
    pub category: Option<CellCategory>,
}

impl From<Cell> for CellView {
    fn from(cell: Cell) -> Self {
        let discovered = cell.is_discovered();
        let category = discovered.then(|| match cell.adjacent_mines() {
            None => CellCategory::Mine,
            Some(0) => CellCategory::Blank,
            Some(count) => CellCategory::Numbered(count),
        });

        Self {
            discovered,
            marked: cell.is_marked(),
            category,
        }
    }
}

/// Read-only snapshot of a board, what renderers draw from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardView {
    cells: Array2<CellView>,
}

impl BoardView {
    pub fn from_board(board: &Board) -> Self {
        Self {
            cells: board.grid().map(|&cell| CellView::from(cell)),
        }
    }

    pub fn rows(&self) -> usize {
        self.cells.nrows()
    }

    pub fn cols(&self) -> usize {
        self.cells.ncols()
    }

    pub fn get(&self, pos: Position) -> Option<&CellView> {
        self.cells.get(pos.to_nd_index())
    }

    /// Rows top to bottom, each one left to right.
    pub fn iter_rows(&self) -> impl Iterator<Item = ArrayView1<'_, CellView>> {
        self.cells.rows().into_iter()
    }

    pub fn discovered_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.discovered).count()
    }
}

impl Index<Position> for BoardView {
    type Output = CellView;

    fn index(&self, pos: Position) -> &Self::Output {
        &self.cells[pos.to_nd_index()]
    }
}
