//! Move selection for the automated player.
//!
//! The coordinator only sees the [`MoveStrategy`] trait, so it does not care
//! whether a column comes from an in-process heuristic or an external solver:
//! - [`FirstAvailable`]: leftmost playable column
//! - [`RandomStrategy`]: uniform over playable columns, seedable
//! - [`ExternalSolver`]: long-lived solver process spoken to over a line protocol

use std::time::Duration;

use crate::engine::Board;

pub mod first_available;
pub mod random;
pub mod solver;

pub use first_available::FirstAvailable;
pub use random::RandomStrategy;
pub use solver::{ExternalSolver, SolverConfig};

/// Interface implemented by every move source.
#[async_trait::async_trait]
pub trait MoveStrategy: Send {
    /// Choose a 0-based column for the next automated move. Never mutates the board.
    async fn choose_move(&mut self, board: &Board) -> Result<usize, StrategyError>;

    /// Display name for logs.
    fn name(&self) -> &str;
}

/// Errors a strategy can report.
#[derive(Debug, thiserror::Error)]
pub enum StrategyError {
    #[error("no moves available")]
    NoMovesAvailable,

    #[error("solver communication failed: {0}")]
    Solver(#[from] SolverError),
}

/// Failures talking to the external solver process.
#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    #[error("failed to start solver '{program}': {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("solver process has exited")]
    Exited,

    #[error("solver did not answer within {0:?}")]
    Timeout(Duration),

    #[error("solver reply is not a column number: {0:?}")]
    Unparseable(String),

    #[error("solver chose column {0}, expected 1 to 7")]
    ColumnOutOfRange(i64),

    #[error("solver I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Which strategy the automated player uses.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    #[default]
    First,
    Random,
    Solver,
}

/// Construct the configured strategy. Spawns the solver process for
/// [`StrategyKind::Solver`].
pub fn build_strategy(
    kind: StrategyKind,
    solver: &SolverConfig,
    seed: Option<u64>,
) -> Result<Box<dyn MoveStrategy>, StrategyError> {
    let strategy: Box<dyn MoveStrategy> = match kind {
        StrategyKind::First => Box::new(FirstAvailable::new()),
        StrategyKind::Random => match seed {
            Some(seed) => Box::new(RandomStrategy::seeded(seed)),
            None => Box::new(RandomStrategy::new()),
        },
        StrategyKind::Solver => Box::new(ExternalSolver::spawn(solver)?),
    };
    log::info!("automated player uses the {} strategy", strategy.name());
    Ok(strategy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_error_display() {
        let err = StrategyError::from(SolverError::Unparseable("abc".into()));
        assert_eq!(
            err.to_string(),
            "solver communication failed: solver reply is not a column number: \"abc\""
        );
        assert_eq!(StrategyError::NoMovesAvailable.to_string(), "no moves available");
    }

    #[test]
    fn test_strategy_kind_parses_from_toml_names() {
        #[derive(serde::Deserialize)]
        struct Wrapper {
            kind: StrategyKind,
        }
        let w: Wrapper = toml::from_str("kind = \"solver\"").unwrap();
        assert_eq!(w.kind, StrategyKind::Solver);
    }

    #[tokio::test]
    async fn test_build_first_strategy() {
        let mut strategy =
            build_strategy(StrategyKind::First, &SolverConfig::default(), None).unwrap();
        assert_eq!(strategy.name(), "first-available");
        assert_eq!(strategy.choose_move(&Board::new()).await.unwrap(), 0);
    }
}
