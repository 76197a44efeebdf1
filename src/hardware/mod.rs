//! Boundary to the physical robot.
//!
//! The coordinator only talks to these traits. Real motor and serial drivers
//! live outside this crate; [`serial`] adapts the sensor board's text line
//! protocol and [`mock`] records commands for simulations and tests.

pub mod mock;
pub mod serial;

pub use mock::{HardwareCommand, Journal, MockActuator, MockSensorControl, ScriptedSensor};
pub use serial::{SerialSensor, SerialSensorControl};

/// Something the sensor board reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorEvent {
    /// Start button pressed.
    SessionStart,
    /// A puck passed the sensor strip in the given 0-based column.
    PuckDropped(usize),
}

/// Feed of sensor events, read one at a time.
#[async_trait::async_trait]
pub trait SensorSource: Send {
    /// Next event, or `None` once the feed is closed.
    async fn next_event(&mut self) -> anyhow::Result<Option<SensorEvent>>;
}

/// Commands sent back to the sensor board.
#[async_trait::async_trait]
pub trait SensorControl: Send {
    /// Stop accepting drop events until the next start signal.
    async fn reset(&mut self) -> anyhow::Result<()>;
}

/// The robot arm. Every call returns once the motion has finished.
#[async_trait::async_trait]
pub trait Actuator: Send {
    /// Pick puck number `puck_index` from the robot's stack and drop it in `column`.
    async fn drop_piece(&mut self, column: usize, puck_index: usize) -> anyhow::Result<()>;

    /// Hand puck number `puck_index` from the human's stack to the player.
    async fn give_player_puck(&mut self, puck_index: usize) -> anyhow::Result<()>;

    /// Return to the home position.
    async fn reset(&mut self) -> anyhow::Result<()>;
}
