//! Connect Four rules engine.
//!
//! Pure game logic with no hardware or runtime dependencies: the grid,
//! gravity drops, win/draw detection and the move history handed to solvers.

pub mod board;
pub mod common;
pub mod config;

pub use board::Board;
pub use common::{Cell, Color, Direction, GameOutcome, MoveError};
pub use config::*;
