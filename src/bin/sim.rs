use connect_four_robot::hardware::{HardwareCommand, Journal, MockActuator, MockSensorControl};
use connect_four_robot::{
    CoordinatorState, GameOutcome, MoveStrategy, RandomStrategy, SensorEvent, Step,
    TurnCoordinator, HUMAN_COLOR,
};
use serde_json::json;

/// Plays one game on mock hardware: a seeded random "human" against the
/// seeded random robot. Prints a JSON summary.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 {
        eprintln!("Usage: {} <human_seed> <robot_seed>", args[0]);
        std::process::exit(1);
    }
    let human_seed: u64 = args[1].parse()?;
    let robot_seed: u64 = args[2].parse()?;

    let journal = Journal::new();
    let mut human = RandomStrategy::seeded(human_seed);
    let mut coordinator = TurnCoordinator::new(
        Box::new(RandomStrategy::seeded(robot_seed)),
        Box::new(MockActuator::new(journal.clone())),
        Box::new(MockSensorControl::new(journal.clone())),
        human_seed % 2 == 0,
    );

    let mut step = coordinator.handle(SensorEvent::SessionStart).await?;
    let mut human_moves = 0usize;
    while coordinator.state() == CoordinatorState::HumanTurn {
        let column = human.choose_move(coordinator.board()).await?;
        human_moves += 1;
        step = coordinator.handle(SensorEvent::PuckDropped(column)).await?;
    }

    let outcome = match step {
        Step::Finished(outcome) => outcome,
        other => anyhow::bail!("game stopped without a result: {:?}", other),
    };
    let winner = match outcome {
        GameOutcome::Winner(color) if color == HUMAN_COLOR => "human",
        GameOutcome::Winner(_) => "robot",
        GameOutcome::Draw => "draw",
    };

    let robot_moves = journal.count(|c| matches!(c, HardwareCommand::DropPiece { .. }));
    let pucks_handed = journal.count(|c| matches!(c, HardwareCommand::GivePlayerPuck { .. }));
    let result = json!({
        "winner": winner,
        "human_started": coordinator.human_starts(),
        "human_moves": human_moves,
        "robot_moves": robot_moves,
        "pucks_handed": pucks_handed,
        "score": coordinator.score(),
    });

    println!("{}", serde_json::to_string(&result)?);
    Ok(())
}
