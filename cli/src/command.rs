use minefield_core::{MarkOperation, Position};
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("expected `x y free|mine`, got {0} tokens")]
    WrongTokenCount(usize),
    #[error("`{0}` is not a coordinate")]
    InvalidCoordinate(String),
    #[error("unknown operation `{0}`, expected `free` or `mine`")]
    UnknownOperation(String),
}

/// One turn as typed by the player. Coordinates are 1-based and `x` is the column.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Command {
    pub x: i64,
    pub y: i64,
    pub op: MarkOperation,
}

impl Command {
    /// 0-based board position, `None` when a coordinate is below 1.
    pub fn position(&self) -> Option<Position> {
        let row = usize::try_from(self.y.checked_sub(1)?).ok()?;
        let col = usize::try_from(self.x.checked_sub(1)?).ok()?;
        Some(Position::new(row, col))
    }
}

impl FromStr for Command {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let &[x, y, op] = tokens.as_slice() else {
            return Err(ParseError::WrongTokenCount(tokens.len()));
        };

        Ok(Self {
            x: parse_coordinate(x)?,
            y: parse_coordinate(y)?,
            op: parse_operation(op)?,
        })
    }
}

fn parse_coordinate(token: &str) -> Result<i64, ParseError> {
    token
        .parse()
        .map_err(|_| ParseError::InvalidCoordinate(token.to_owned()))
}

fn parse_operation(token: &str) -> Result<MarkOperation, ParseError> {
    if token.eq_ignore_ascii_case("free") {
        Ok(MarkOperation::Free)
    } else if token.eq_ignore_ascii_case("mine") {
        Ok(MarkOperation::Mine)
    } else {
        Err(ParseError::UnknownOperation(token.to_owned()))
    }
}
