use serde::{Deserialize, Serialize};

/// One grid position. Mines and free cells carry their own flags.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    Mine {
        discovered: bool,
        marked: bool,
    },
    Free {
        discovered: bool,
        marked: bool,
        adjacent_mines: u8,
    },
}

impl Cell {
    pub const fn mine() -> Self {
        Self::Mine {
            discovered: false,
            marked: false,
        }
    }

    pub const fn free() -> Self {
        Self::Free {
            discovered: false,
            marked: false,
            adjacent_mines: 0,
        }
    }

    pub const fn is_mine(self) -> bool {
        matches!(self, Self::Mine { .. })
    }

    pub const fn is_discovered(self) -> bool {
        match self {
            Self::Mine { discovered, .. } => discovered,
            Self::Free { discovered, .. } => discovered,
        }
    }

    pub const fn is_marked(self) -> bool {
        match self {
            Self::Mine { marked, .. } => marked,
            Self::Free { marked, .. } => marked,
        }
    }

    /// Adjacent mine count, `None` for mines.
    pub const fn adjacent_mines(self) -> Option<u8> {
        match self {
            Self::Mine { .. } => None,
            Self::Free { adjacent_mines, .. } => Some(adjacent_mines),
        }
    }

    /// A free cell with no adjacent mines, the only kind that propagates a flood fill.
    pub const fn is_blank(self) -> bool {
        matches!(
            self,
            Self::Free {
                adjacent_mines: 0,
                ..
            }
        )
    }

    pub(crate) fn discover(&mut self) {
        match self {
            Self::Mine { discovered, .. } => *discovered = true,
            Self::Free { discovered, .. } => *discovered = true,
        }
    }

    pub(crate) fn toggle_mark(&mut self) {
        match self {
            Self::Mine { marked, .. } => *marked = !*marked,
            Self::Free { marked, .. } => *marked = !*marked,
        }
    }

    /// Counts one more adjacent mine, mines themselves are left untouched.
    pub(crate) fn add_adjacent_mine(&mut self) {
        match self {
            Self::Mine { .. } => {}
            Self::Free { adjacent_mines, .. } => *adjacent_mines += 1,
        }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::free()
    }
}
