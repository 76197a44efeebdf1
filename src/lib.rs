//! Controller for a Connect Four playing robot.
//!
//! - [`engine`]: board, rules and move history
//! - [`strategy`]: how the robot picks its column
//! - [`hardware`]: sensor and arm capabilities, line protocol adapter, mocks
//! - [`coordinator`]: the turn state machine tying them together
//! - [`settings`] and [`logging`]: configuration file and log output

pub mod coordinator;
pub mod engine;
pub mod hardware;
pub mod logging;
pub mod settings;
pub mod strategy;

pub use coordinator::{
    Actor, CoordinatorError, CoordinatorState, IgnoreReason, SessionScore, Step, TurnCoordinator,
    TurnsTaken,
};
pub use engine::{
    Board, Cell, Color, Direction, GameOutcome, MoveError, AUTOMATED_COLOR, COLS, HUMAN_COLOR,
    ROWS,
};
pub use hardware::{Actuator, SensorControl, SensorEvent, SensorSource};
pub use logging::{init_logging, init_logging_with_console, Console};
pub use settings::{AppConfig, ConfigError};
pub use strategy::{
    build_strategy, ExternalSolver, FirstAvailable, MoveStrategy, RandomStrategy, SolverConfig,
    SolverError, StrategyError, StrategyKind,
};
