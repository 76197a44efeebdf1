//! In-memory hardware used by the simulator and the tests.
//!
//! Every mock writes into a shared [`Journal`], so a test can check the exact
//! order in which the coordinator polled the sensors and drove the arm.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use super::{Actuator, SensorControl, SensorEvent, SensorSource};

/// One recorded interaction with the hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HardwareCommand {
    DropPiece { column: usize, puck_index: usize },
    GivePlayerPuck { puck_index: usize },
    ActuatorReset,
    SensorReset,
    /// The sensor source was asked for its next event.
    SensorPolled,
}

/// Shared, append-only record of hardware interactions.
#[derive(Debug, Clone, Default)]
pub struct Journal {
    entries: Arc<Mutex<Vec<HardwareCommand>>>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, command: HardwareCommand) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(command);
    }

    /// Snapshot of everything recorded so far.
    pub fn entries(&self) -> Vec<HardwareCommand> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn count(&self, pred: impl Fn(&HardwareCommand) -> bool) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|c| pred(c))
            .count()
    }

    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

/// Robot arm that only logs and records what it was told to do.
#[derive(Debug, Clone, Default)]
pub struct MockActuator {
    journal: Journal,
    fail_drops: bool,
}

impl MockActuator {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            fail_drops: false,
        }
    }

    /// An arm whose `drop_piece` always fails, for fault-path tests.
    pub fn failing(journal: Journal) -> Self {
        Self {
            journal,
            fail_drops: true,
        }
    }
}

#[async_trait::async_trait]
impl Actuator for MockActuator {
    async fn drop_piece(&mut self, column: usize, puck_index: usize) -> anyhow::Result<()> {
        if self.fail_drops {
            return Err(anyhow::anyhow!("arm stalled while dropping into column {}", column));
        }
        log::info!("arm: pick puck {} from robot stack, drop in column {}", puck_index, column);
        self.journal.record(HardwareCommand::DropPiece { column, puck_index });
        Ok(())
    }

    async fn give_player_puck(&mut self, puck_index: usize) -> anyhow::Result<()> {
        log::info!("arm: hand puck {} to the player", puck_index);
        self.journal.record(HardwareCommand::GivePlayerPuck { puck_index });
        Ok(())
    }

    async fn reset(&mut self) -> anyhow::Result<()> {
        log::info!("arm: return to home position");
        self.journal.record(HardwareCommand::ActuatorReset);
        Ok(())
    }
}

/// Sensor board control that records resets.
#[derive(Debug, Clone, Default)]
pub struct MockSensorControl {
    journal: Journal,
}

impl MockSensorControl {
    pub fn new(journal: Journal) -> Self {
        Self { journal }
    }
}

#[async_trait::async_trait]
impl SensorControl for MockSensorControl {
    async fn reset(&mut self) -> anyhow::Result<()> {
        log::info!("sensor board: reset");
        self.journal.record(HardwareCommand::SensorReset);
        Ok(())
    }
}

/// Sensor source that replays a fixed list of events, then closes.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSensor {
    events: VecDeque<SensorEvent>,
    journal: Journal,
}

impl ScriptedSensor {
    pub fn new(events: impl IntoIterator<Item = SensorEvent>, journal: Journal) -> Self {
        Self {
            events: events.into_iter().collect(),
            journal,
        }
    }

    pub fn remaining(&self) -> usize {
        self.events.len()
    }
}

#[async_trait::async_trait]
impl SensorSource for ScriptedSensor {
    async fn next_event(&mut self) -> anyhow::Result<Option<SensorEvent>> {
        self.journal.record(HardwareCommand::SensorPolled);
        Ok(self.events.pop_front())
    }
}
