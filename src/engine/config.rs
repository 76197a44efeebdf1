use super::common::Color;

/// Number of rows on the physical board.
pub const ROWS: usize = 6;
/// Number of columns (drop slots) on the physical board.
pub const COLS: usize = 7;
/// Pieces in a row needed to win.
pub const CONNECT: usize = 4;
/// Total number of cells, and the longest possible game in moves.
pub const TOTAL_CELLS: usize = ROWS * COLS;

/// Color of the pucks dropped by the human player.
pub const HUMAN_COLOR: Color = Color::Red;
/// Color of the pucks placed by the robot arm.
pub const AUTOMATED_COLOR: Color = Color::Yellow;

/// Pucks each side needs for a full game; the stacks are loaded with this many.
pub const PUCKS_PER_PLAYER: usize = TOTAL_CELLS / 2;
