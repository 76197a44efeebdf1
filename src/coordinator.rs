//! Turn coordination between the human, the sensor strip, the move strategy
//! and the robot arm.
//!
//! The coordinator is driven by two callbacks, [`TurnCoordinator::on_session_start`]
//! and [`TurnCoordinator::on_puck_dropped`], or by [`TurnCoordinator::run`],
//! which pumps a [`SensorSource`] one event at a time. Both callbacks take
//! `&mut self`, so a new event can only be handled once the previous one,
//! including any automated turn it triggered, has completed.
//!
//! Human moves are applied only when the sensor strip reports them. Automated
//! moves are applied as soon as the arm has dropped the puck: the drop point is
//! shielded from the sensors, so no confirmation will ever arrive for them.

use crate::engine::{Board, Color, GameOutcome, MoveError, AUTOMATED_COLOR, HUMAN_COLOR};
use crate::hardware::{Actuator, SensorControl, SensorEvent, SensorSource};
use crate::strategy::{MoveStrategy, StrategyError};

/// Who owns a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Actor {
    Human,
    Automated,
}

impl Actor {
    pub fn color(self) -> Color {
        match self {
            Actor::Human => HUMAN_COLOR,
            Actor::Automated => AUTOMATED_COLOR,
        }
    }

    /// The actor playing `color`.
    pub fn from_color(color: Color) -> Actor {
        if color == HUMAN_COLOR {
            Actor::Human
        } else {
            Actor::Automated
        }
    }
}

/// Pieces placed by each actor in the current game. The count doubles as the
/// index of the next puck to take from that actor's stack.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TurnsTaken {
    pub human: usize,
    pub automated: usize,
}

impl TurnsTaken {
    pub fn get(&self, actor: Actor) -> usize {
        match actor {
            Actor::Human => self.human,
            Actor::Automated => self.automated,
        }
    }

    fn increment(&mut self, actor: Actor) {
        match actor {
            Actor::Human => self.human += 1,
            Actor::Automated => self.automated += 1,
        }
    }
}

/// Coordinator states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinatorState {
    /// Waiting for the start button.
    AwaitingStart,
    /// Waiting for the sensor strip to report the human's puck.
    HumanTurn,
    /// The robot is choosing and placing its puck.
    AutomatedTurn,
    /// A terminal position was reached; the reset sequence is running.
    GameOver,
    /// A fatal error stopped the game; only [`TurnCoordinator::recover`] leaves this state.
    Halted,
}

/// Why an event was discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// A puck drop arrived outside the human's turn.
    NotHumanTurn(CoordinatorState),
    /// A start signal arrived while a game was already running.
    NotAwaitingStart(CoordinatorState),
    /// The sensors reported a drop the board cannot accept.
    InvalidMove(MoveError),
    /// `recover` was called while nothing was halted.
    NotHalted(CoordinatorState),
}

/// What handling one event amounted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The event was logged and discarded.
    Ignored(IgnoreReason),
    /// The game moved on and is waiting for the human.
    Continue,
    /// The game ended and the robot has been reset for the next one.
    Finished(GameOutcome),
}

/// Results across all games of one session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct SessionScore {
    pub human_wins: u32,
    pub automated_wins: u32,
    pub draws: u32,
}

impl SessionScore {
    fn record(&mut self, outcome: GameOutcome) {
        match outcome {
            GameOutcome::Winner(color) => match Actor::from_color(color) {
                Actor::Human => self.human_wins += 1,
                Actor::Automated => self.automated_wins += 1,
            },
            GameOutcome::Draw => self.draws += 1,
        }
    }

    pub fn games(&self) -> u32 {
        self.human_wins + self.automated_wins + self.draws
    }
}

/// Fatal coordinator errors. Each one leaves the coordinator [`CoordinatorState::Halted`].
#[derive(Debug, thiserror::Error)]
pub enum CoordinatorError {
    #[error("move strategy failed: {0}")]
    Strategy(StrategyError),

    #[error("hardware failure while {action}: {error:#}")]
    Hardware {
        action: &'static str,
        error: anyhow::Error,
    },

    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}

/// The game state machine. Owns the board and every capability it drives.
pub struct TurnCoordinator {
    board: Board,
    state: CoordinatorState,
    turns_taken: TurnsTaken,
    human_starts: bool,
    strategy: Box<dyn MoveStrategy>,
    actuator: Box<dyn Actuator>,
    sensors: Box<dyn SensorControl>,
    score: SessionScore,
    last_outcome: Option<GameOutcome>,
}

impl TurnCoordinator {
    pub fn new(
        strategy: Box<dyn MoveStrategy>,
        actuator: Box<dyn Actuator>,
        sensors: Box<dyn SensorControl>,
        human_starts: bool,
    ) -> Self {
        Self {
            board: Board::new(),
            state: CoordinatorState::AwaitingStart,
            turns_taken: TurnsTaken::default(),
            human_starts,
            strategy,
            actuator,
            sensors,
            score: SessionScore::default(),
            last_outcome: None,
        }
    }

    pub fn state(&self) -> CoordinatorState {
        self.state
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turns_taken(&self) -> TurnsTaken {
        self.turns_taken
    }

    pub fn score(&self) -> SessionScore {
        self.score
    }

    /// Outcome of the most recently finished game.
    pub fn last_outcome(&self) -> Option<GameOutcome> {
        self.last_outcome
    }

    pub fn human_starts(&self) -> bool {
        self.human_starts
    }

    /// Dispatch a sensor event to the matching callback.
    pub async fn handle(&mut self, event: SensorEvent) -> Result<Step, CoordinatorError> {
        match event {
            SensorEvent::SessionStart => self.on_session_start().await,
            SensorEvent::PuckDropped(column) => self.on_puck_dropped(column).await,
        }
    }

    /// Pump `source` until it closes, handling each event to completion before
    /// asking for the next one. Stops at the first fatal error.
    pub async fn run(&mut self, source: &mut dyn SensorSource) -> Result<(), CoordinatorError> {
        loop {
            let event = match source.next_event().await {
                Ok(Some(event)) => event,
                Ok(None) => return Ok(()),
                Err(error) => {
                    return Err(self.halt(CoordinatorError::Hardware {
                        action: "reading sensor events",
                        error,
                    }))
                }
            };
            if let Step::Finished(outcome) = self.handle(event).await? {
                log::info!(
                    "game {} finished ({:?}); press start for the next one",
                    self.score.games(),
                    outcome
                );
            }
        }
    }

    /// Start button pressed.
    pub async fn on_session_start(&mut self) -> Result<Step, CoordinatorError> {
        if self.state != CoordinatorState::AwaitingStart {
            log::warn!("ignoring start signal while {:?}", self.state);
            return Ok(Step::Ignored(IgnoreReason::NotAwaitingStart(self.state)));
        }

        if self.human_starts {
            log::info!("game started, human moves first");
            let puck = self.turns_taken.get(Actor::Human);
            if let Err(error) = self.actuator.give_player_puck(puck).await {
                return Err(self.halt(CoordinatorError::Hardware {
                    action: "handing the first puck to the player",
                    error,
                }));
            }
            self.state = CoordinatorState::HumanTurn;
            Ok(Step::Continue)
        } else {
            log::info!("game started, robot moves first");
            self.state = CoordinatorState::AutomatedTurn;
            self.automated_turn().await
        }
    }

    /// The sensor strip saw a puck fall into `column`.
    pub async fn on_puck_dropped(&mut self, column: usize) -> Result<Step, CoordinatorError> {
        if self.state != CoordinatorState::HumanTurn {
            log::warn!(
                "discarding puck drop in column {} while {:?}",
                column,
                self.state
            );
            return Ok(Step::Ignored(IgnoreReason::NotHumanTurn(self.state)));
        }

        let row = match self.board.drop_piece(column, HUMAN_COLOR) {
            Ok(row) => row,
            Err(err) => {
                log::error!("sensor reported an impossible drop: {}; event discarded", err);
                return Ok(Step::Ignored(IgnoreReason::InvalidMove(err)));
            }
        };
        self.turns_taken.increment(Actor::Human);
        log::info!("human dropped in column {} (row {})", column, row);
        self.check_consistency();

        if let Some(outcome) = self.board.outcome() {
            return self.finish(outcome).await;
        }

        self.state = CoordinatorState::AutomatedTurn;
        self.automated_turn().await
    }

    /// Choose, place and record the robot's move, then hand the human a puck.
    async fn automated_turn(&mut self) -> Result<Step, CoordinatorError> {
        let column = match self.strategy.choose_move(&self.board).await {
            Ok(column) => column,
            Err(StrategyError::NoMovesAvailable) => {
                return Err(self.halt(CoordinatorError::InvariantViolation(
                    "strategy found no moves on a non-terminal board".into(),
                )))
            }
            Err(err) => return Err(self.halt(CoordinatorError::Strategy(err))),
        };
        if !self.board.is_column_playable(column) {
            return Err(self.halt(CoordinatorError::InvariantViolation(format!(
                "{} chose unplayable column {}",
                self.strategy.name(),
                column
            ))));
        }

        let puck = self.turns_taken.get(Actor::Automated);
        if let Err(error) = self.actuator.drop_piece(column, puck).await {
            return Err(self.halt(CoordinatorError::Hardware {
                action: "dropping the robot's puck",
                error,
            }));
        }
        if let Err(err) = self.board.drop_piece(column, AUTOMATED_COLOR) {
            return Err(self.halt(CoordinatorError::InvariantViolation(format!(
                "board rejected the robot's move: {err}"
            ))));
        }
        self.turns_taken.increment(Actor::Automated);
        log::info!("robot dropped in column {} using puck {}", column, puck);
        self.check_consistency();

        if let Some(outcome) = self.board.outcome() {
            return self.finish(outcome).await;
        }

        let puck = self.turns_taken.get(Actor::Human);
        if let Err(error) = self.actuator.give_player_puck(puck).await {
            return Err(self.halt(CoordinatorError::Hardware {
                action: "handing a puck to the player",
                error,
            }));
        }
        self.state = CoordinatorState::HumanTurn;
        Ok(Step::Continue)
    }

    /// Announce the result and run the reset sequence.
    async fn finish(&mut self, outcome: GameOutcome) -> Result<Step, CoordinatorError> {
        self.state = CoordinatorState::GameOver;
        self.announce(outcome);
        self.score.record(outcome);
        self.last_outcome = Some(outcome);
        self.reset_hardware_and_board().await?;
        Ok(Step::Finished(outcome))
    }

    fn announce(&self, outcome: GameOutcome) {
        let message = match outcome {
            GameOutcome::Winner(color) => match Actor::from_color(color) {
                Actor::Human => "Player wins!",
                Actor::Automated => "Robot wins!",
            },
            GameOutcome::Draw => "It's a draw!",
        };
        log::info!("{}\n{}", message, self.board);
    }

    async fn reset_hardware_and_board(&mut self) -> Result<(), CoordinatorError> {
        if let Err(error) = self.actuator.reset().await {
            return Err(self.halt(CoordinatorError::Hardware {
                action: "resetting the arm",
                error,
            }));
        }
        if let Err(error) = self.sensors.reset().await {
            return Err(self.halt(CoordinatorError::Hardware {
                action: "resetting the sensor board",
                error,
            }));
        }
        self.board.reset();
        self.turns_taken = TurnsTaken::default();
        self.state = CoordinatorState::AwaitingStart;
        Ok(())
    }

    /// Operator path out of [`CoordinatorState::Halted`]: reset the hardware and
    /// board and wait for the start button again. The interrupted game is
    /// abandoned and not scored.
    pub async fn recover(&mut self) -> Result<Step, CoordinatorError> {
        if self.state != CoordinatorState::Halted {
            return Ok(Step::Ignored(IgnoreReason::NotHalted(self.state)));
        }
        log::warn!("recovering from halt; abandoning the current game");
        self.reset_hardware_and_board().await?;
        Ok(Step::Continue)
    }

    fn halt(&mut self, err: CoordinatorError) -> CoordinatorError {
        log::error!("halting game: {}", err);
        self.state = CoordinatorState::Halted;
        err
    }

    fn check_consistency(&self) {
        if !self.board.is_valid_state() {
            log::warn!(
                "piece counts out of balance: {} red, {} yellow",
                self.board.piece_count(Color::Red),
                self.board.piece_count(Color::Yellow)
            );
        }
    }
}
