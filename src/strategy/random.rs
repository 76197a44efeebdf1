use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::engine::Board;

use super::{MoveStrategy, StrategyError};

/// Picks uniformly among playable columns.
pub struct RandomStrategy {
    rng: SmallRng,
}

impl RandomStrategy {
    pub fn new() -> Self {
        let mut seed_rng = rand::rng();
        Self {
            rng: SmallRng::from_rng(&mut seed_rng),
        }
    }

    /// Reproducible sequence of choices for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomStrategy {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl MoveStrategy for RandomStrategy {
    async fn choose_move(&mut self, board: &Board) -> Result<usize, StrategyError> {
        let columns = board.available_columns();
        if columns.is_empty() {
            return Err(StrategyError::NoMovesAvailable);
        }
        let idx = self.rng.random_range(0..columns.len());
        Ok(columns[idx])
    }

    fn name(&self) -> &str {
        "random"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Color, COLS, ROWS};

    #[tokio::test]
    async fn test_random_selects_playable_column() {
        let mut strategy = RandomStrategy::seeded(7);
        let mut board = Board::new();
        for _ in 0..ROWS {
            board.drop_piece(2, Color::Yellow).unwrap();
        }
        for _ in 0..100 {
            let col = strategy.choose_move(&board).await.unwrap();
            assert!(col < COLS);
            assert_ne!(col, 2);
        }
    }

    #[tokio::test]
    async fn test_same_seed_same_choices() {
        let board = Board::new();
        let mut a = RandomStrategy::seeded(42);
        let mut b = RandomStrategy::seeded(42);
        for _ in 0..20 {
            assert_eq!(
                a.choose_move(&board).await.unwrap(),
                b.choose_move(&board).await.unwrap()
            );
        }
    }
}
