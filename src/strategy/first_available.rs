use crate::engine::Board;

use super::{MoveStrategy, StrategyError};

/// Plays the leftmost column that still has room.
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstAvailable;

impl FirstAvailable {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl MoveStrategy for FirstAvailable {
    async fn choose_move(&mut self, board: &Board) -> Result<usize, StrategyError> {
        board
            .available_columns()
            .first()
            .copied()
            .ok_or(StrategyError::NoMovesAvailable)
    }

    fn name(&self) -> &str {
        "first-available"
    }
}
