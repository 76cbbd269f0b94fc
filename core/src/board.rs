use hashbrown::HashSet;
use ndarray::Array2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::*;

/// The board-state engine of a single game.
///
/// A board starts unseeded, made only of free cells. Mines are placed once with
/// [`Board::place_mines`] (or the board is built already seeded with
/// [`Board::from_mines`]), after which [`Board::place_mark`] is called until
/// [`Board::is_finished`] reports the end of the game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    grid: Array2<Cell>,
    mine_count: usize,
    lost: bool,
    seeded: bool,
}

impl Board {
    pub fn new(rows: usize, cols: usize, mines: usize) -> Result<Self> {
        GameConfig::new(rows, cols, mines).map(Self::with_config)
    }

    pub fn with_config(config: GameConfig) -> Self {
        Self {
            grid: Array2::default(config.size()),
            mine_count: config.mines(),
            lost: false,
            seeded: false,
        }
    }

    /// Builds an already seeded board with mines at the given positions.
    ///
    /// Duplicate positions collapse into one mine.
    pub fn from_mines(rows: usize, cols: usize, mines: &[Position]) -> Result<Self> {
        let mines: HashSet<Position> = mines.iter().copied().collect();
        let mut board = Self::new(rows, cols, mines.len())?;

        for &pos in &mines {
            board.validate_position(pos)?;
        }

        board.seed(&mines);
        Ok(board)
    }

    /// Places the configured number of mines at distinct positions drawn from `rng`,
    /// then computes the adjacent mine counts.
    pub fn place_mines<R: Rng>(&mut self, rng: &mut R) -> Result<()> {
        if self.seeded {
            log::warn!("Mines already placed, ignoring a second seeding request");
            return Err(BoardError::AlreadySeeded);
        }

        let (rows, cols) = self.size();
        let mut mines = HashSet::with_capacity(self.mine_count);
        // rejection sampling, duplicates are simply drawn again
        while mines.len() < self.mine_count {
            mines.insert(Position::new(
                rng.random_range(0..rows),
                rng.random_range(0..cols),
            ));
        }

        self.seed(&mines);
        Ok(())
    }

    /// Same as [`Board::place_mines`] using fresh thread-local entropy.
    pub fn place_random_mines(&mut self) -> Result<()> {
        self.place_mines(&mut rand::rng())
    }

    fn seed(&mut self, mines: &HashSet<Position>) {
        for &pos in mines {
            self.grid[pos.to_nd_index()] = Cell::mine();
        }

        for &pos in mines {
            for neighbor in self.grid.iter_neighbors(pos) {
                self.grid[neighbor.to_nd_index()].add_adjacent_mine();
            }
        }

        self.mine_count = mines.len();
        self.seeded = true;
        log::debug!(
            "Placed {} mines on a {}x{} board",
            self.mine_count,
            self.rows(),
            self.cols()
        );
    }

    /// Applies one move: reveal the cell (`Free`) or toggle its mine mark (`Mine`).
    ///
    /// Rejected moves return an error and leave the board unchanged. Revealing an
    /// already discovered cell is accepted as a no-op.
    pub fn place_mark(&mut self, pos: Position, op: MarkOperation) -> Result<MarkOutcome> {
        use MarkOutcome::*;

        let pos = self.validate_position(pos)?;
        let cell = self.grid[pos.to_nd_index()];

        let outcome = match op {
            MarkOperation::Mine => {
                if cell.is_discovered() {
                    return Err(BoardError::AlreadyDiscovered(pos));
                }
                self.check_playable()?;

                let cell = &mut self.grid[pos.to_nd_index()];
                cell.toggle_mark();
                if cell.is_marked() { Marked } else { Unmarked }
            }
            MarkOperation::Free => {
                if cell.is_discovered() {
                    return Ok(NoChange);
                }
                self.check_playable()?;

                match cell {
                    Cell::Mine { .. } => {
                        self.explode(pos);
                        Exploded
                    }
                    Cell::Free { .. } => Revealed(self.flood_reveal(pos)),
                }
            }
        };

        if self.is_won() {
            log::info!("All mines found, game won");
        }
        Ok(outcome)
    }

    /// Discovers every mine and ends the game.
    fn explode(&mut self, pos: Position) {
        self.grid
            .iter_mut()
            .filter(|cell| cell.is_mine())
            .for_each(Cell::discover);
        self.lost = true;
        log::info!("Stepped on the mine at {pos}, game lost");
    }

    /// Breadth-first reveal from a free cell, returns how many cells were discovered.
    fn flood_reveal(&mut self, start: Position) -> usize {
        let start_cell = &mut self.grid[start.to_nd_index()];
        start_cell.discover();
        if !start_cell.is_blank() {
            return 1;
        }

        let mut revealed = 1;
        let mut to_visit = VecDeque::from([start]);

        while let Some(visit) = to_visit.pop_front() {
            for neighbor in self.grid.iter_neighbors(visit) {
                let cell = &mut self.grid[neighbor.to_nd_index()];
                if cell.is_discovered() {
                    continue;
                }

                cell.discover();
                revealed += 1;

                if cell.is_blank() {
                    to_visit.push_back(neighbor);
                }
            }
        }

        log::debug!("Flood fill from {start} discovered {revealed} cells");
        revealed
    }

    pub fn is_finished(&self) -> bool {
        self.state().is_finished()
    }

    /// Won when every mine is marked without any false flag, or when every free
    /// cell is discovered. Either condition is enough on its own.
    ///
    /// A board without mines has nothing to mark, so it is never won before a
    /// reveal clears it.
    pub fn is_won(&self) -> bool {
        self.seeded
            && !self.lost
            && (self.all_mines_marked_without_false_flags() || self.all_free_cells_discovered())
    }

    pub fn is_lost(&self) -> bool {
        self.lost
    }

    pub fn state(&self) -> GameState {
        if self.lost {
            GameState::Lost
        } else if self.is_won() {
            GameState::Won
        } else {
            GameState::InProgress
        }
    }

    // a board without mines can only be won by digging
    fn all_mines_marked_without_false_flags(&self) -> bool {
        self.mine_count > 0
            && self.grid.iter().all(|cell| match *cell {
                Cell::Mine { marked, .. } => marked,
                Cell::Free { marked, .. } => !marked,
            })
    }

    fn all_free_cells_discovered(&self) -> bool {
        self.grid.iter().all(|cell| match *cell {
            Cell::Mine { .. } => true,
            Cell::Free { discovered, .. } => discovered,
        })
    }

    pub fn rows(&self) -> usize {
        self.grid.nrows()
    }

    pub fn cols(&self) -> usize {
        self.grid.ncols()
    }

    pub fn size(&self) -> (usize, usize) {
        self.grid.dim()
    }

    pub fn mine_count(&self) -> usize {
        self.mine_count
    }

    pub fn is_seeded(&self) -> bool {
        self.seeded
    }

    pub fn marked_count(&self) -> usize {
        self.grid.iter().filter(|cell| cell.is_marked()).count()
    }

    /// Mines not yet accounted for by a mark, negative when over-marked.
    pub fn mines_left(&self) -> isize {
        self.mine_count as isize - self.marked_count() as isize
    }

    pub fn cell_at(&self, pos: Position) -> Option<Cell> {
        self.grid.get(pos.to_nd_index()).copied()
    }

    pub fn view(&self) -> BoardView {
        BoardView::from_board(self)
    }

    pub(crate) fn grid(&self) -> &Array2<Cell> {
        &self.grid
    }

    pub fn validate_position(&self, pos: Position) -> Result<Position> {
        let (rows, cols) = self.size();
        if pos.is_within((rows, cols)) {
            Ok(pos)
        } else {
            Err(BoardError::OutOfBounds { pos, rows, cols })
        }
    }

    fn check_playable(&self) -> Result<()> {
        if !self.seeded {
            Err(BoardError::NotSeeded)
        } else if self.is_finished() {
            Err(BoardError::AlreadyEnded)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::SmallRng};
    use std::collections::BTreeSet;

    fn pos(row: usize, col: usize) -> Position {
        Position::new(row, col)
    }

    fn board(size: (usize, usize), mines: &[(usize, usize)]) -> Board {
        let mines: Vec<Position> = mines.iter().copied().map(Position::from).collect();
        Board::from_mines(size.0, size.1, &mines).unwrap()
    }

    fn discovered(board: &Board) -> Vec<Position> {
        board
            .grid()
            .indexed_iter()
            .filter(|(_, cell)| cell.is_discovered())
            .map(|(index, _)| Position::from(index))
            .collect()
    }

    /// 3x5 board split by a column of mines in the middle.
    fn walled_board() -> Board {
        board((3, 5), &[(0, 2), (1, 2), (2, 2)])
    }

    #[test]
    fn place_mines_places_exact_count_with_consistent_counts() {
        for (seed, (rows, cols, mines)) in [(9, 9, 10), (16, 16, 40), (5, 3, 14), (1, 8, 3)]
            .into_iter()
            .enumerate()
        {
            let mut board = Board::new(rows, cols, mines).unwrap();
            let mut rng = SmallRng::seed_from_u64(seed as u64);
            board.place_mines(&mut rng).unwrap();

            let grid = board.grid();
            assert_eq!(grid.iter().filter(|cell| cell.is_mine()).count(), mines);

            let count_sum: usize = grid
                .iter()
                .filter_map(|cell| cell.adjacent_mines())
                .map(usize::from)
                .sum();
            let free_neighbors_of_mines: usize = grid
                .indexed_iter()
                .filter(|(_, cell)| cell.is_mine())
                .map(|(index, _)| {
                    grid.iter_neighbors(index.into())
                        .filter(|&n| !grid[n.to_nd_index()].is_mine())
                        .count()
                })
                .sum();
            assert_eq!(count_sum, free_neighbors_of_mines);

            for (index, cell) in grid.indexed_iter() {
                if let Some(count) = cell.adjacent_mines() {
                    let expected = grid
                        .iter_neighbors(index.into())
                        .filter(|&n| grid[n.to_nd_index()].is_mine())
                        .count();
                    assert_eq!(usize::from(count), expected);
                }
            }
        }
    }

    #[test]
    fn seeding_twice_is_rejected_without_change() {
        let mut board = Board::new(4, 4, 3).unwrap();
        let mut rng = SmallRng::seed_from_u64(7);
        board.place_mines(&mut rng).unwrap();
        let before = board.clone();

        assert_eq!(board.place_mines(&mut rng), Err(BoardError::AlreadySeeded));
        assert_eq!(board, before);
    }

    #[test]
    fn moves_before_seeding_are_rejected() {
        let mut board = Board::new(3, 3, 1).unwrap();

        assert!(!board.is_won());
        assert!(!board.is_finished());
        assert_eq!(
            board.place_mark(pos(0, 0), MarkOperation::Free),
            Err(BoardError::NotSeeded)
        );
        assert_eq!(
            board.place_mark(pos(0, 0), MarkOperation::Mine),
            Err(BoardError::NotSeeded)
        );
    }

    #[test]
    fn from_mines_rejects_out_of_bounds_and_full_layouts() {
        assert_eq!(
            Board::from_mines(2, 2, &[pos(2, 0)]),
            Err(BoardError::OutOfBounds {
                pos: pos(2, 0),
                rows: 2,
                cols: 2
            })
        );
        assert_eq!(
            Board::from_mines(1, 2, &[pos(0, 0), pos(0, 1)]),
            Err(BoardError::TooManyMines { mines: 2, cells: 2 })
        );

        let board = Board::from_mines(3, 3, &[pos(1, 1), pos(1, 1)]).unwrap();
        assert_eq!(board.mine_count(), 1);
        assert!(board.is_seeded());
    }

    #[test]
    fn flood_fill_opens_zero_region_and_numbered_border_only() {
        let mut board = walled_board();

        let outcome = board.place_mark(pos(1, 0), MarkOperation::Free).unwrap();

        assert_eq!(outcome, MarkOutcome::Revealed(6));
        let mut found = discovered(&board);
        found.sort();
        assert_eq!(
            found,
            vec![pos(0, 0), pos(0, 1), pos(1, 0), pos(1, 1), pos(2, 0), pos(2, 1)]
        );
        assert_eq!(board.cell_at(pos(1, 1)).unwrap().adjacent_mines(), Some(3));
        assert_eq!(board.state(), GameState::InProgress);
    }

    /// Zero-adjacency region connected to `start`, plus its one-cell border.
    fn expected_closure(board: &Board, start: Position) -> BTreeSet<Position> {
        let grid = board.grid();
        let mut closure = BTreeSet::from([start]);
        let mut region = vec![start];

        while let Some(current) = region.pop() {
            for neighbor in grid.iter_neighbors(current) {
                if closure.insert(neighbor) && grid[neighbor.to_nd_index()].is_blank() {
                    region.push(neighbor);
                }
            }
        }
        closure
    }

    #[test]
    fn flood_fill_matches_zero_region_closure_on_random_boards() {
        for seed in 0..20 {
            let mut board = Board::new(12, 16, 30).unwrap();
            board.place_mines(&mut SmallRng::seed_from_u64(seed)).unwrap();

            let Some(start) = board
                .grid()
                .indexed_iter()
                .find(|(_, cell)| cell.is_blank())
                .map(|(index, _)| Position::from(index))
            else {
                continue;
            };
            let expected = expected_closure(&board, start);

            let outcome = board.place_mark(start, MarkOperation::Free).unwrap();

            let found: BTreeSet<Position> = discovered(&board).into_iter().collect();
            assert_eq!(found, expected, "seed {seed}");
            assert_eq!(outcome, MarkOutcome::Revealed(expected.len()));
            assert!(found.iter().all(|&p| !board.cell_at(p).unwrap().is_mine()));
        }
    }

    #[test]
    fn numbered_cell_reveals_only_itself() {
        let mut board = walled_board();

        let outcome = board.place_mark(pos(0, 3), MarkOperation::Free).unwrap();

        assert_eq!(outcome, MarkOutcome::Revealed(1));
        assert_eq!(discovered(&board), vec![pos(0, 3)]);
    }

    #[test]
    fn revealing_discovered_cell_is_noop() {
        let mut board = walled_board();
        board.place_mark(pos(1, 0), MarkOperation::Free).unwrap();
        let before = board.clone();

        assert_eq!(
            board.place_mark(pos(1, 0), MarkOperation::Free),
            Ok(MarkOutcome::NoChange)
        );
        assert_eq!(
            board.place_mark(pos(1, 1), MarkOperation::Free),
            Ok(MarkOutcome::NoChange)
        );
        assert_eq!(board, before);
    }

    #[test]
    fn clearing_every_free_cell_wins() {
        let mut board = walled_board();

        board.place_mark(pos(1, 0), MarkOperation::Free).unwrap();
        assert!(!board.is_won());
        board.place_mark(pos(1, 4), MarkOperation::Free).unwrap();

        assert!(board.is_won());
        assert!(board.is_finished());
        assert_eq!(board.state(), GameState::Won);
        assert!(board.state().is_finished());
        assert_eq!(
            board.place_mark(pos(0, 2), MarkOperation::Free),
            Err(BoardError::AlreadyEnded)
        );
    }

    #[test]
    fn flood_fill_discovers_marked_cells_and_keeps_mark() {
        let mut board = walled_board();
        board.place_mark(pos(0, 0), MarkOperation::Mine).unwrap();

        board.place_mark(pos(2, 0), MarkOperation::Free).unwrap();

        let cell = board.cell_at(pos(0, 0)).unwrap();
        assert!(cell.is_discovered());
        assert!(cell.is_marked());
    }

    #[test]
    fn mark_toggles_and_restores_view() {
        let mut board = walled_board();
        let before = board.view();

        assert_eq!(
            board.place_mark(pos(0, 2), MarkOperation::Mine),
            Ok(MarkOutcome::Marked)
        );
        assert_eq!(board.marked_count(), 1);
        assert_eq!(board.mines_left(), 2);
        assert_ne!(board.view(), before);

        assert_eq!(
            board.place_mark(pos(0, 2), MarkOperation::Mine),
            Ok(MarkOutcome::Unmarked)
        );
        assert_eq!(board.view(), before);
    }

    #[test]
    fn marking_discovered_cell_is_rejected() {
        let mut board = walled_board();
        board.place_mark(pos(1, 0), MarkOperation::Free).unwrap();
        let before = board.clone();

        for target in [pos(1, 0), pos(1, 1)] {
            assert_eq!(
                board.place_mark(target, MarkOperation::Mine),
                Err(BoardError::AlreadyDiscovered(target))
            );
        }
        assert_eq!(board, before);
    }

    #[test]
    fn revealing_any_mine_discovers_all_mines_and_loses() {
        for hit in [(0, 0), (2, 2)] {
            let mut board = board((3, 3), &[(0, 0), (2, 2)]);
            board.place_mark(pos(0, 0), MarkOperation::Mine).unwrap();

            let outcome = board.place_mark(hit.into(), MarkOperation::Free).unwrap();

            assert_eq!(outcome, MarkOutcome::Exploded);
            assert_eq!(discovered(&board), vec![pos(0, 0), pos(2, 2)]);
            assert!(board.is_lost());
            assert!(board.is_finished());
            assert!(!board.is_won());
            assert_eq!(board.state(), GameState::Lost);
        }
    }

    #[test]
    fn moves_after_loss_are_rejected() {
        let mut board = board((3, 3), &[(0, 0)]);
        board.place_mark(pos(0, 0), MarkOperation::Free).unwrap();
        let before = board.clone();

        assert_eq!(
            board.place_mark(pos(2, 2), MarkOperation::Free),
            Err(BoardError::AlreadyEnded)
        );
        assert_eq!(
            board.place_mark(pos(2, 2), MarkOperation::Mine),
            Err(BoardError::AlreadyEnded)
        );
        assert_eq!(board, before);
        assert!(board.is_lost());
    }

    #[test]
    fn marking_all_mines_wins_with_undiscovered_cells() {
        let mut board = board((3, 3), &[(0, 0), (2, 2)]);

        board.place_mark(pos(1, 1), MarkOperation::Mine).unwrap();
        board.place_mark(pos(0, 0), MarkOperation::Mine).unwrap();
        board.place_mark(pos(2, 2), MarkOperation::Mine).unwrap();
        assert!(!board.is_won(), "false flag on a free cell");

        board.place_mark(pos(1, 1), MarkOperation::Mine).unwrap();

        assert!(board.is_won());
        assert_eq!(board.mines_left(), 0);
        assert!(discovered(&board).is_empty());
    }

    #[test]
    fn empty_board_is_cleared_by_single_reveal() {
        let mut board = Board::new(9, 9, 0).unwrap();
        board.place_mines(&mut SmallRng::seed_from_u64(3)).unwrap();
        assert!(!board.is_finished());

        let outcome = board.place_mark(pos(4, 7), MarkOperation::Free).unwrap();

        assert_eq!(outcome, MarkOutcome::Revealed(81));
        assert_eq!(discovered(&board).len(), 81);
        assert!(board.is_won());
    }

    #[test]
    fn two_cell_board_wins_on_first_safe_reveal() {
        let mut board = Board::new(2, 1, 1).unwrap();
        board.place_mines(&mut SmallRng::seed_from_u64(11)).unwrap();

        let safe = [pos(0, 0), pos(1, 0)]
            .into_iter()
            .find(|&p| !board.cell_at(p).unwrap().is_mine())
            .unwrap();
        let outcome = board.place_mark(safe, MarkOperation::Free).unwrap();

        assert_eq!(outcome, MarkOutcome::Revealed(1));
        assert_eq!(board.cell_at(safe).unwrap().adjacent_mines(), Some(1));
        assert!(board.is_won());
    }

    #[test]
    fn out_of_bounds_moves_are_rejected_without_change() {
        let mut board = Board::new(4, 6, 5).unwrap();
        board.place_mines(&mut SmallRng::seed_from_u64(5)).unwrap();
        let before = board.clone();

        for target in [pos(4, 0), pos(0, 6)] {
            for op in [MarkOperation::Free, MarkOperation::Mine] {
                assert_eq!(
                    board.place_mark(target, op),
                    Err(BoardError::OutOfBounds {
                        pos: target,
                        rows: 4,
                        cols: 6
                    })
                );
            }
        }
        assert_eq!(board, before);
        assert_eq!(board.cell_at(pos(4, 0)), None);
    }
}
