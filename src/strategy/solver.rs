use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::time::timeout;

use crate::engine::{Board, COLS};

use super::{MoveStrategy, SolverError, StrategyError};

/// Default time to wait for a solver reply.
pub const DEFAULT_SOLVER_TIMEOUT: Duration = Duration::from_secs(10);

/// How to launch the solver process.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Solver executable.
    pub program: PathBuf,
    /// Extra arguments passed before the opening book.
    pub args: Vec<String>,
    /// Opening book preloaded by the solver, passed as `-b <book>`.
    pub book: Option<PathBuf>,
    /// Reply timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            program: PathBuf::from("c4solver"),
            args: Vec::new(),
            book: None,
            timeout_ms: DEFAULT_SOLVER_TIMEOUT.as_millis() as u64,
        }
    }
}

impl SolverConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Strategy backed by a long-lived solver subprocess.
///
/// Each request is one line holding the 1-based columns played so far; the
/// reply is one line holding the chosen column, also 1-based. The reply is
/// converted to the board's 0-based indexing before it is returned. A solver
/// that dies is not restarted; every later call reports
/// [`SolverError::Exited`].
///
/// A reply that misses the timeout may still arrive later and would be read
/// as the answer to the next request, so a timed-out solver is killed and
/// treated as exited from then on.
pub struct ExternalSolver {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    reply_timeout: Duration,
    name: String,
    poisoned: bool,
}

impl ExternalSolver {
    /// Start the solver process. Must be called from within a tokio runtime.
    pub fn spawn(config: &SolverConfig) -> Result<Self, SolverError> {
        let mut command = Command::new(&config.program);
        command.args(&config.args);
        if let Some(book) = &config.book {
            command.arg("-b").arg(book);
        }
        command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        let program = config.program.display().to_string();
        let mut child = command.spawn().map_err(|source| SolverError::Spawn {
            program: program.clone(),
            source,
        })?;
        let stdin = child.stdin.take().ok_or(SolverError::Exited)?;
        let stdout = child.stdout.take().ok_or(SolverError::Exited)?;
        log::info!(
            "solver '{}' started (pid {:?}, timeout {:?})",
            program,
            child.id(),
            config.timeout()
        );

        Ok(Self {
            child,
            stdin,
            stdout: BufReader::new(stdout),
            reply_timeout: config.timeout(),
            name: format!("solver({program})"),
            poisoned: false,
        })
    }

    /// Whether the process was abandoned after a missed reply.
    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    fn poison(&mut self) {
        self.poisoned = true;
        if let Err(err) = self.child.start_kill() {
            log::warn!("could not kill unresponsive solver: {}", err);
        }
    }

    /// Send one request line and read exactly one reply line.
    async fn exchange(&mut self, request: &str) -> Result<String, SolverError> {
        if let Some(status) = self.child.try_wait()? {
            log::error!("solver already exited with {}", status);
            return Err(SolverError::Exited);
        }

        let mut line = String::with_capacity(request.len() + 1);
        line.push_str(request);
        line.push('\n');
        self.stdin.write_all(line.as_bytes()).await.map_err(pipe_error)?;
        self.stdin.flush().await.map_err(pipe_error)?;

        let mut reply = String::new();
        let read = self.stdout.read_line(&mut reply).await?;
        if read == 0 {
            return Err(SolverError::Exited);
        }
        Ok(reply.trim().to_string())
    }
}

/// A closed pipe means the process is gone.
fn pipe_error(err: std::io::Error) -> SolverError {
    if err.kind() == std::io::ErrorKind::BrokenPipe {
        SolverError::Exited
    } else {
        SolverError::Io(err)
    }
}

/// Parse a 1-based solver reply into a 0-based board column.
pub fn parse_reply(reply: &str) -> Result<usize, SolverError> {
    let column: i64 = reply
        .trim()
        .parse()
        .map_err(|_| SolverError::Unparseable(reply.to_string()))?;
    if column < 1 || column > COLS as i64 {
        return Err(SolverError::ColumnOutOfRange(column));
    }
    Ok(column as usize - 1)
}

#[async_trait::async_trait]
impl MoveStrategy for ExternalSolver {
    async fn choose_move(&mut self, board: &Board) -> Result<usize, StrategyError> {
        if self.poisoned {
            return Err(SolverError::Exited.into());
        }
        let request = board.serialize_for_solver();
        log::debug!("solver request: {:?}", request);
        let limit = self.reply_timeout;
        let answered = timeout(limit, self.exchange(&request)).await;
        let reply = match answered {
            Ok(reply) => reply?,
            Err(_) => {
                log::error!("solver missed the {:?} deadline; abandoning it", limit);
                self.poison();
                return Err(SolverError::Timeout(limit).into());
            }
        };
        log::debug!("solver reply: {:?}", reply);
        Ok(parse_reply(&reply)?)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
