//! Board state and rules: gravity drops, win and draw detection, move history.

use std::fmt;

use super::common::{Cell, Color, Direction, GameOutcome, MoveError};
use super::config::{COLS, CONNECT, ROWS};

/// The 6x7 grid. Row 0 is the bottom row, so a column fills upward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    grid: [[Cell; COLS]; ROWS],
    moves: Vec<usize>,
    done: bool,
    winner: Option<Color>,
}

impl Board {
    /// Create an empty board.
    pub fn new() -> Self {
        Board {
            grid: [[Cell::Empty; COLS]; ROWS],
            moves: Vec::with_capacity(ROWS * COLS),
            done: false,
            winner: None,
        }
    }

    /// Build a board from explicit grid contents, row 0 first.
    ///
    /// The grid is taken as-is, without gravity or turn checks, and the move
    /// history starts empty.
    pub fn from_grid(grid: [[Cell; COLS]; ROWS]) -> Self {
        Board {
            grid,
            ..Board::new()
        }
    }

    /// Return the board to its freshly constructed state.
    pub fn reset(&mut self) {
        *self = Board::new();
    }

    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.grid[row][col]
    }

    /// Columns whose top cell is still empty, in ascending order.
    pub fn available_columns(&self) -> Vec<usize> {
        (0..COLS).filter(|&col| self.is_column_playable(col)).collect()
    }

    pub fn is_column_playable(&self, col: usize) -> bool {
        col < COLS && self.grid[ROWS - 1][col] == Cell::Empty
    }

    /// Row a piece dropped into `col` would land on, or `None` if the column
    /// is full or out of range.
    pub fn lowest_empty_row(&self, col: usize) -> Option<usize> {
        if col >= COLS {
            return None;
        }
        (0..ROWS).find(|&row| self.grid[row][col] == Cell::Empty)
    }

    /// Drop a piece into `col` and return the row where it landed.
    pub fn drop_piece(&mut self, col: usize, color: Color) -> Result<usize, MoveError> {
        if col >= COLS {
            return Err(MoveError::InvalidColumn(col));
        }
        let row = self.lowest_empty_row(col).ok_or(MoveError::ColumnFull(col))?;
        self.grid[row][col] = Cell::Occupied(color);
        self.moves.push(col);
        Ok(row)
    }

    /// Check the whole grid for four of `color` in a row in any direction.
    pub fn is_winner(&self, color: Color) -> bool {
        Direction::ALL
            .iter()
            .any(|&direction| self.has_line(color, direction))
    }

    /// Whether `color` holds `CONNECT` cells in a row along `direction`
    /// anywhere on the grid.
    pub fn has_line(&self, color: Color, direction: Direction) -> bool {
        let target = Cell::Occupied(color);
        let (dr, dc) = direction.step();
        (0..ROWS).any(|row| {
            (0..COLS).any(|col| {
                self.grid[row][col] == target && self.line_from(row, col, dr, dc, target)
            })
        })
    }

    /// Whether `CONNECT` cells starting at (row, col) along (dr, dc) all hold `target`.
    fn line_from(&self, row: usize, col: usize, dr: isize, dc: isize, target: Cell) -> bool {
        (0..CONNECT as isize).all(|step| {
            let r = row as isize + dr * step;
            let c = col as isize + dc * step;
            r >= 0
                && c >= 0
                && (r as usize) < ROWS
                && (c as usize) < COLS
                && self.grid[r as usize][c as usize] == target
        })
    }

    /// No playable column left and nobody has four in a row.
    pub fn is_draw(&self) -> bool {
        self.available_columns().is_empty()
            && self.winner.is_none()
            && !self.is_winner(Color::Red)
            && !self.is_winner(Color::Yellow)
    }

    /// Evaluate the terminal condition and record it on the board.
    ///
    /// Red is checked before yellow; on a legally played board at most one
    /// of them can hold a line.
    pub fn outcome(&mut self) -> Option<GameOutcome> {
        let outcome = if self.is_winner(Color::Red) {
            Some(GameOutcome::Winner(Color::Red))
        } else if self.is_winner(Color::Yellow) {
            Some(GameOutcome::Winner(Color::Yellow))
        } else if self.is_draw() {
            Some(GameOutcome::Draw)
        } else {
            None
        };
        if let Some(result) = outcome {
            self.done = true;
            if let GameOutcome::Winner(color) = result {
                self.winner = Some(color);
            }
        }
        outcome
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn winner(&self) -> Option<Color> {
        self.winner
    }

    /// Columns played so far, 0-based, in play order.
    pub fn moves(&self) -> &[usize] {
        &self.moves
    }

    /// Move history as the solver expects it: 1-based column digits in play
    /// order, first move first. An empty board yields an empty string.
    pub fn serialize_for_solver(&self) -> String {
        self.moves
            .iter()
            .map(|&col| char::from(b'1' + col as u8))
            .collect()
    }

    pub fn piece_count(&self, color: Color) -> usize {
        let target = Cell::Occupied(color);
        self.grid
            .iter()
            .flatten()
            .filter(|&&cell| cell == target)
            .count()
    }

    /// Cross-check that the piece counts could come from alternating play.
    pub fn is_valid_state(&self) -> bool {
        self.piece_count(Color::Red)
            .abs_diff(self.piece_count(Color::Yellow))
            <= 1
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    /// Top row first, the way the board looks from the front.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.grid.iter().rev() {
            let line: Vec<String> = row.iter().map(|cell| cell.symbol().to_string()).collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        let labels: Vec<String> = (1..=COLS).map(|c| c.to_string()).collect();
        write!(f, "{}", labels.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new();
        for row in 0..ROWS {
            for col in 0..COLS {
                assert_eq!(board.get(row, col), Cell::Empty);
            }
        }
        assert_eq!(board.available_columns(), (0..COLS).collect::<Vec<_>>());
        assert!(!board.is_done());
        assert_eq!(board.winner(), None);
    }

    #[test]
    fn test_drop_piece_lands_on_bottom_then_stacks() {
        let mut board = Board::new();
        assert_eq!(board.drop_piece(3, Color::Red).unwrap(), 0);
        assert_eq!(board.get(0, 3), Cell::Occupied(Color::Red));
        assert_eq!(board.drop_piece(3, Color::Yellow).unwrap(), 1);
        assert_eq!(board.get(1, 3), Cell::Occupied(Color::Yellow));
        assert_eq!(board.lowest_empty_row(3), Some(2));
    }

    #[test]
    fn test_column_full() {
        let mut board = Board::new();
        for _ in 0..ROWS {
            board.drop_piece(0, Color::Red).unwrap();
        }
        assert!(!board.is_column_playable(0));
        assert_eq!(board.lowest_empty_row(0), None);
        let before = board.clone();
        assert_eq!(
            board.drop_piece(0, Color::Yellow),
            Err(MoveError::ColumnFull(0))
        );
        assert_eq!(board, before);
        assert!(!board.available_columns().contains(&0));
    }

    #[test]
    fn test_invalid_column() {
        let mut board = Board::new();
        assert_eq!(
            board.drop_piece(COLS, Color::Red),
            Err(MoveError::InvalidColumn(COLS))
        );
        assert!(!board.is_column_playable(COLS));
        assert_eq!(board.lowest_empty_row(COLS), None);
        assert!(board.moves().is_empty());
    }

    #[test]
    fn test_serialize_for_solver() {
        let mut board = Board::new();
        assert_eq!(board.serialize_for_solver(), "");
        for col in [3, 3, 0, 6] {
            board.drop_piece(col, Color::Red).unwrap();
        }
        assert_eq!(board.serialize_for_solver(), "4417");
    }

    #[test]
    fn test_no_win_with_three() {
        let mut board = Board::new();
        for col in 0..3 {
            board.drop_piece(col, Color::Red).unwrap();
        }
        assert!(!board.is_winner(Color::Red));
        assert_eq!(board.outcome(), None);
    }

    #[test]
    fn test_outcome_records_winner() {
        let mut board = Board::new();
        for col in 2..6 {
            board.drop_piece(col, Color::Yellow).unwrap();
        }
        assert_eq!(board.outcome(), Some(GameOutcome::Winner(Color::Yellow)));
        assert!(board.is_done());
        assert_eq!(board.winner(), Some(Color::Yellow));
        assert!(!board.is_draw());
    }

    #[test]
    fn test_valid_state_counts() {
        let mut board = Board::new();
        board.drop_piece(0, Color::Red).unwrap();
        assert!(board.is_valid_state());
        board.drop_piece(1, Color::Red).unwrap();
        assert!(!board.is_valid_state());
        assert_eq!(board.piece_count(Color::Red), 2);
        assert_eq!(board.piece_count(Color::Yellow), 0);
    }

    #[test]
    fn test_display_draws_top_row_first() {
        let mut board = Board::new();
        board.drop_piece(0, Color::Red).unwrap();
        board.drop_piece(0, Color::Yellow).unwrap();
        let text = board.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), ROWS + 1);
        assert_eq!(lines[ROWS - 1], "R . . . . . .");
        assert_eq!(lines[ROWS - 2], "Y . . . . . .");
        assert_eq!(lines[ROWS], "1 2 3 4 5 6 7");
    }
}
