use serde::{Deserialize, Serialize};

pub use board::*;
pub use cell::*;
pub use error::*;
pub use types::*;
pub use view::*;

mod board;
mod cell;
mod error;
mod types;
mod view;

/// Board dimensions and mine count, validated on construction.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    rows: usize,
    cols: usize,
    mines: usize,
}

impl GameConfig {
    pub fn new(rows: usize, cols: usize, mines: usize) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(BoardError::EmptyBoard);
        }

        // the grid allocation must fit in `isize::MAX` bytes
        let cells = rows
            .checked_mul(cols)
            .filter(|cells| {
                cells
                    .checked_mul(size_of::<Cell>())
                    .is_some_and(|bytes| bytes <= isize::MAX as usize)
            })
            .ok_or(BoardError::BoardTooLarge { rows, cols })?;
        if mines >= cells {
            return Err(BoardError::TooManyMines { mines, cells });
        }

        Ok(Self { rows, cols, mines })
    }

    pub const fn rows(&self) -> usize {
        self.rows
    }

    pub const fn cols(&self) -> usize {
        self.cols
    }

    pub const fn mines(&self) -> usize {
        self.mines
    }

    pub const fn size(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub const fn total_cells(&self) -> usize {
        self.rows * self.cols
    }
}

/// What a move does to the target cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkOperation {
    /// Claim the cell is free and reveal it.
    Free,
    /// Toggle the mine mark.
    Mine,
}

/// Outcome of an accepted move.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Marked,
    Unmarked,
    /// Number of newly discovered cells.
    Revealed(usize),
    Exploded,
}

impl MarkOutcome {
    /// Whether this outcome could have caused an update to the board
    pub const fn has_update(self) -> bool {
        use MarkOutcome::*;
        match self {
            NoChange => false,
            Marked => true,
            Unmarked => true,
            Revealed(_) => true,
            Exploded => true,
        }
    }
}

/// Valid transitions:
/// - InProgress -> Won
/// - InProgress -> Lost
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    InProgress,
    Won,
    Lost,
}

impl GameState {
    /// Indicates the game has ended and no moves can be made anymore
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}
