use anyhow::Result;
use minefield_core::{Board, BoardError, GameConfig, MarkOutcome};
use std::io::{BufRead, Write};

use crate::command::Command;
use crate::render::GridDisplay;

/// How a terminal session ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Ending {
    Won,
    Lost,
    /// Input ran out before the game was decided.
    Abandoned,
}

/// Reads one line, `None` at end of input.
fn read_line<R: BufRead>(input: &mut R) -> std::io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        Ok(None)
    } else {
        Ok(Some(line))
    }
}

/// Asks for a mine count until it fits a `rows x cols` board.
///
/// Dimensions are checked first, no prompt is shown for a board that cannot exist.
pub fn ask_board<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    rows: usize,
    cols: usize,
) -> Result<Option<Board>> {
    GameConfig::new(rows, cols, 0)?;

    loop {
        write!(output, "How many mines do you want on the field? ")?;
        output.flush()?;

        let Some(line) = read_line(input)? else {
            writeln!(output)?;
            return Ok(None);
        };

        match line.trim().parse::<usize>() {
            Ok(mines) => match Board::new(rows, cols, mines) {
                Ok(board) => return Ok(Some(board)),
                Err(err) => writeln!(output, "{err}")?,
            },
            Err(_) => writeln!(output, "Input could not be parsed: '{}'", line.trim())?,
        }
    }
}

/// Runs turns until the board is finished or the input ends.
pub fn play<R: BufRead, W: Write>(board: &mut Board, input: &mut R, output: &mut W) -> Result<Ending> {
    let mut redraw = true;
    while !board.is_finished() {
        if redraw {
            write!(output, "{}", GridDisplay(&board.view()))?;
        }
        write!(output, "Set/delete mines marks or claim a cell as free (x y free|mine): ")?;
        output.flush()?;

        let Some(line) = read_line(input)? else {
            writeln!(output)?;
            return Ok(Ending::Abandoned);
        };
        let line = line.trim();
        redraw = false;
        if line.is_empty() {
            continue;
        }

        match line.parse::<Command>() {
            Ok(command) => redraw = apply(board, command, output)?,
            Err(err) => {
                log::debug!("Rejected input {line:?}: {err}");
                writeln!(output, "Input could not be parsed: '{line}'")?
            }
        }
    }

    write!(output, "{}", GridDisplay(&board.view()))?;
    if board.is_won() {
        writeln!(output, "Congratulations! You found all mines!")?;
        Ok(Ending::Won)
    } else {
        writeln!(output, "You stepped on a mine and failed!")?;
        Ok(Ending::Lost)
    }
}

/// Applies a parsed move, returns whether the board changed.
fn apply<W: Write>(board: &mut Board, command: Command, output: &mut W) -> Result<bool> {
    let Command { x, y, op } = command;
    let outcome = match command.position() {
        Some(pos) => board.place_mark(pos, op),
        None => {
            writeln!(output, "{}", out_of_bounds(board, command))?;
            return Ok(false);
        }
    };

    match outcome {
        Ok(outcome) => {
            if outcome == MarkOutcome::Exploded {
                log::debug!("Mine hit at ({x}, {y})");
            } else {
                log::debug!("Move {op:?} at ({x}, {y}): {outcome:?}");
            }
            return Ok(outcome.has_update());
        }
        Err(BoardError::OutOfBounds { .. }) => writeln!(output, "{}", out_of_bounds(board, command))?,
        Err(BoardError::AlreadyDiscovered(_)) => writeln!(
            output,
            "Cell ({x}, {y}) is a discovered cell, not marking it as a mine!"
        )?,
        Err(err) => writeln!(output, "{err}")?,
    }
    Ok(false)
}

fn out_of_bounds(board: &Board, Command { x, y, .. }: Command) -> String {
    format!(
        "Input ({x}, {y}) out of bounds: [1, {}], [1, {}]",
        board.cols(),
        board.rows()
    )
}
