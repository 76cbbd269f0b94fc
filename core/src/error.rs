use thiserror::Error;

use crate::Position;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("Position {pos} is out of bounds: rows [0, {rows}), columns [0, {cols})")]
    OutOfBounds {
        pos: Position,
        rows: usize,
        cols: usize,
    },
    #[error("Cell {0} is already discovered, not marking it as a mine")]
    AlreadyDiscovered(Position),
    #[error("Board needs at least one row and one column")]
    EmptyBoard,
    #[error("Board of {rows}x{cols} cells is too large")]
    BoardTooLarge { rows: usize, cols: usize },
    #[error("Too many mines, requested {mines} but the board only has {cells} cells")]
    TooManyMines { mines: usize, cells: usize },
    #[error("Mines were already placed on this board")]
    AlreadySeeded,
    #[error("Mines must be placed before playing")]
    NotSeeded,
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
}

pub type Result<T> = core::result::Result<T, BoardError>;
