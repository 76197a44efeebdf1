use connect_four_robot::engine::{CONNECT, PUCKS_PER_PLAYER, TOTAL_CELLS};
use connect_four_robot::{Board, Cell, Color, Direction, GameOutcome, MoveError, COLS, ROWS};

/// Full grid with no four in a row: horizontal pairs of 2x2 blocks alternate
/// colour and each band of two rows is shifted by one column.
fn draw_grid() -> [[Cell; COLS]; ROWS] {
    let mut grid = [[Cell::Empty; COLS]; ROWS];
    for (row, cells) in grid.iter_mut().enumerate() {
        for (col, cell) in cells.iter_mut().enumerate() {
            *cell = if (row / 2 + col) % 2 == 0 {
                Cell::Occupied(Color::Red)
            } else {
                Cell::Occupied(Color::Yellow)
            };
        }
    }
    grid
}

#[test]
fn test_horizontal_win_on_bottom_row() {
    let mut board = Board::new();
    for col in 0..CONNECT {
        assert!(!board.is_winner(Color::Red));
        assert_eq!(board.drop_piece(col, Color::Red).unwrap(), 0);
    }
    assert!(board.is_winner(Color::Red));
    assert!(!board.is_winner(Color::Yellow));
}

#[test]
fn test_vertical_win() {
    let mut board = Board::new();
    for expected_row in 0..CONNECT {
        assert_eq!(board.drop_piece(0, Color::Yellow).unwrap(), expected_row);
    }
    assert!(board.is_winner(Color::Yellow));
    assert_eq!(board.outcome(), Some(GameOutcome::Winner(Color::Yellow)));
}

#[test]
fn test_full_board_without_line_is_draw() {
    let mut board = Board::from_grid(draw_grid());
    assert!(board.available_columns().is_empty());
    assert!(!board.is_winner(Color::Red));
    assert!(!board.is_winner(Color::Yellow));
    assert!(board.is_draw());
    assert_eq!(board.outcome(), Some(GameOutcome::Draw));
    assert!(board.is_done());
    assert_eq!(board.winner(), None);
}

#[test]
fn test_leading_diagonal_win() {
    let mut grid = [[Cell::Empty; COLS]; ROWS];
    for i in 0..CONNECT {
        grid[i + 1][i + 2] = Cell::Occupied(Color::Red);
    }
    let board = Board::from_grid(grid);
    assert!(board.is_winner(Color::Red));
    assert!(board.has_line(Color::Red, Direction::Diagonal));
    assert!(!board.has_line(Color::Red, Direction::CounterDiagonal));
    assert!(!board.is_draw());
}

#[test]
fn test_counter_diagonal_win() {
    let mut grid = [[Cell::Empty; COLS]; ROWS];
    for i in 0..CONNECT {
        grid[i][COLS - 1 - i] = Cell::Occupied(Color::Yellow);
    }
    let board = Board::from_grid(grid);
    assert!(board.is_winner(Color::Yellow));
    assert!(board.has_line(Color::Yellow, Direction::CounterDiagonal));
    assert!(!board.has_line(Color::Yellow, Direction::Diagonal));
    assert!(!board.is_winner(Color::Red));
}

#[test]
fn test_broken_line_is_not_a_win() {
    let mut board = Board::new();
    for col in [0, 1, 2] {
        board.drop_piece(col, Color::Red).unwrap();
    }
    board.drop_piece(3, Color::Yellow).unwrap();
    board.drop_piece(4, Color::Red).unwrap();
    assert!(!board.is_winner(Color::Red));
    assert_eq!(board.outcome(), None);
    assert!(!board.is_done());
}

#[test]
fn test_full_column_is_rejected_without_changes() {
    let mut board = Board::new();
    for i in 0..ROWS {
        let color = if i % 2 == 0 { Color::Red } else { Color::Yellow };
        board.drop_piece(5, color).unwrap();
    }
    let snapshot = board.clone();
    assert_eq!(board.drop_piece(5, Color::Red), Err(MoveError::ColumnFull(5)));
    assert_eq!(board, snapshot);
    assert_eq!(board.available_columns(), vec![0, 1, 2, 3, 4, 6]);
}

#[test]
fn test_reset_matches_new_board() {
    let mut board = Board::new();
    for col in 0..CONNECT {
        board.drop_piece(col, Color::Red).unwrap();
    }
    board.outcome();
    assert!(board.is_done());
    board.reset();
    assert_eq!(board, Board::new());
    assert!(board.moves().is_empty());
    assert_eq!(board.winner(), None);
}

#[test]
fn test_move_history_and_solver_string() {
    let mut board = Board::new();
    let mut color = Color::Red;
    for col in [3, 3, 2, 6] {
        board.drop_piece(col, color).unwrap();
        color = color.other();
    }
    assert_eq!(board.moves(), &[3, 3, 2, 6]);
    assert_eq!(board.serialize_for_solver(), "4437");
    assert!(board.is_valid_state());
}

#[test]
fn test_each_player_gets_half_the_board() {
    assert_eq!(PUCKS_PER_PLAYER * 2, TOTAL_CELLS);
}
