use std::env;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Instant;

use log::{LevelFilter, Metadata, Record};

/// Environment variable that overrides the configured log level.
pub const LOG_ENV_VAR: &str = "C4ROBOT_LOG";

/// Where log lines go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogOutput {
    Stdout,
    File,
    #[default]
    Both,
}

impl LogOutput {
    pub fn uses_file(self) -> bool {
        matches!(self, LogOutput::File | LogOutput::Both)
    }

    pub fn uses_console(self) -> bool {
        matches!(self, LogOutput::Stdout | LogOutput::Both)
    }
}

/// Terminal stream used for the console half of [`LogOutput`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Console {
    #[default]
    Stdout,
    /// For when stdout carries commands to the sensor board.
    Stderr,
}

/// `[logging]` section of the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `error`, `warn`, `info`, `debug` or `trace`.
    pub level: String,
    pub output: LogOutput,
    pub logfile: PathBuf,
    /// Truncate the log file on start instead of appending.
    pub overwrite: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: "info".into(),
            output: LogOutput::Both,
            logfile: PathBuf::from("game.log"),
            overwrite: false,
        }
    }
}

impl LogConfig {
    /// Level from the config, or `None` if the name is not a valid level.
    pub fn level_filter(&self) -> Option<LevelFilter> {
        self.level.parse().ok()
    }
}

struct GameLogger {
    started: Instant,
    console: Option<Console>,
    file: Option<Mutex<File>>,
}

impl GameLogger {
    fn format(&self, record: &Record) -> String {
        let elapsed = self.started.elapsed();
        format!(
            "{:>5}.{:03}s - {} - {} - {}",
            elapsed.as_secs(),
            elapsed.subsec_millis(),
            record.level(),
            record.target(),
            record.args()
        )
    }
}

impl log::Log for GameLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = self.format(record);
        match self.console {
            Some(Console::Stdout) => println!("{}", line),
            Some(Console::Stderr) => eprintln!("{}", line),
            None => {}
        }
        if let Some(file) = &self.file {
            if let Ok(mut file) = file.lock() {
                let _ = writeln!(file, "{}", line);
            }
        }
    }

    fn flush(&self) {
        if let Some(file) = &self.file {
            if let Ok(mut file) = file.lock() {
                let _ = file.flush();
            }
        }
    }
}

/// Install the process-wide logger described by `config`, with console lines
/// on stdout.
pub fn init_logging(config: &LogConfig) -> io::Result<()> {
    init_logging_with_console(config, Console::Stdout)
}

/// Install the process-wide logger described by `config`, with console lines
/// on `console`.
///
/// The level comes from the `C4ROBOT_LOG` environment variable when it holds a
/// valid level, then from the config, and defaults to `info`. Calling this
/// more than once keeps the first logger.
pub fn init_logging_with_console(config: &LogConfig, console: Console) -> io::Result<()> {
    let level = env::var(LOG_ENV_VAR)
        .ok()
        .and_then(|lvl| lvl.parse().ok())
        .or_else(|| config.level_filter())
        .unwrap_or(LevelFilter::Info);

    let file = if config.output.uses_file() {
        let mut options = OpenOptions::new();
        options.create(true);
        if config.overwrite {
            options.write(true).truncate(true);
        } else {
            options.append(true);
        }
        Some(Mutex::new(options.open(&config.logfile)?))
    } else {
        None
    };

    let logger = GameLogger {
        started: Instant::now(),
        console: config.output.uses_console().then_some(console),
        file,
    };
    let _ = log::set_boxed_logger(Box::new(logger)).map(|()| log::set_max_level(level));
    Ok(())
}
