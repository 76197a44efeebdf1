use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::io::BufReader;

use connect_four_robot::hardware::serial::{self, SerialSensor, SerialSensorControl};
use connect_four_robot::hardware::{Journal, MockActuator};
use connect_four_robot::{
    build_strategy, init_logging_with_console, AppConfig, Console, StrategyKind, TurnCoordinator,
};

#[derive(Parser)]
#[command(author, version, about = "Run the Connect Four robot", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "robot.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play games, reading sensor board lines (START, DROP <n>) from stdin or a TCP bridge.
    Play {
        /// Override the configured strategy
        #[arg(long, value_enum)]
        strategy: Option<StrategyKind>,
        /// Solver executable; implies --strategy solver
        #[arg(long)]
        solver: Option<PathBuf>,
        /// Opening book handed to the solver
        #[arg(long)]
        book: Option<PathBuf>,
        /// Let the robot drop the first puck of each game
        #[arg(long)]
        ai_first: bool,
        /// Read the sensor board from a serial-to-TCP bridge instead of stdin
        #[arg(long)]
        connect: Option<String>,
        #[arg(long, help = "Fix RNG seed for the random strategy (e.g., --seed 12345)")]
        seed: Option<u64>,
    },
    /// Print a configuration file with every default value.
    DefaultConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::DefaultConfig => {
            print!("{}", AppConfig::default_toml()?);
        }
        Commands::Play {
            strategy,
            solver,
            book,
            ai_first,
            connect,
            seed,
        } => {
            let mut config = AppConfig::load_or_default(&cli.config)
                .with_context(|| format!("loading config from {}", cli.config.display()))?;

            if let Some(kind) = strategy {
                config.game.strategy = kind;
            }
            if let Some(program) = solver {
                config.solver.program = program;
                config.game.strategy = StrategyKind::Solver;
            }
            if book.is_some() {
                config.solver.book = book;
            }
            if ai_first {
                config.game.human_starts = false;
            }
            if seed.is_some() {
                config.game.seed = seed;
            }
            config.validate()?;

            // stdout is the command channel to the sensor board in stdin mode
            let console = if connect.is_some() {
                Console::Stdout
            } else {
                Console::Stderr
            };
            init_logging_with_console(&config.logging, console).with_context(|| {
                format!("opening log file {}", config.logging.logfile.display())
            })?;
            if !cli.config.exists() {
                log::warn!(
                    "config file '{}' not found, using defaults",
                    cli.config.display()
                );
            }

            let strategy = build_strategy(config.game.strategy, &config.solver, config.game.seed)?;
            let actuator = Box::new(MockActuator::new(Journal::new()));

            let score = match connect {
                Some(addr) => {
                    log::info!("connecting to sensor board at {}", addr);
                    let (mut sensor, control) = serial::connect(&addr)
                        .await
                        .with_context(|| format!("connecting to {}", addr))?;
                    let mut coordinator = TurnCoordinator::new(
                        strategy,
                        actuator,
                        Box::new(control),
                        config.game.human_starts,
                    );
                    coordinator.run(&mut sensor).await?;
                    coordinator.score()
                }
                None => {
                    log::info!("reading sensor board lines from stdin");
                    let mut sensor = SerialSensor::new(BufReader::new(tokio::io::stdin()));
                    let control = SerialSensorControl::new(tokio::io::stdout());
                    let mut coordinator = TurnCoordinator::new(
                        strategy,
                        actuator,
                        Box::new(control),
                        config.game.human_starts,
                    );
                    coordinator.run(&mut sensor).await?;
                    coordinator.score()
                }
            };

            log::info!(
                "session over: {} games, human {} / robot {} / draws {}",
                score.games(),
                score.human_wins,
                score.automated_wins,
                score.draws
            );
            log::logger().flush();
        }
    }
    Ok(())
}
