//! Text line protocol spoken by the sensor board.
//!
//! Inbound lines:
//! - `START`: start button released
//! - `DROP <n>`: puck seen in 0-based column `n`
//! - `LOG ...`: firmware diagnostics
//! - a bare number: raw sensor bitmask echoed before each `DROP`
//!
//! Outbound, the only command the game needs is `RESET`.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio::time::{timeout, Duration};

use super::{SensorControl, SensorEvent, SensorSource};

/// Time allowed for a command write before the board is considered unresponsive.
const WRITE_TIMEOUT: Duration = Duration::from_secs(5);

/// Classification of one inbound line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SerialMessage {
    Event(SensorEvent),
    Log(String),
    /// Blank lines and raw bitmask echoes.
    Noise,
    Unrecognized(String),
}

/// Classify a single line from the sensor board.
pub fn parse_line(line: &str) -> SerialMessage {
    let line = line.trim();
    if line.is_empty() || line.parse::<u32>().is_ok() {
        return SerialMessage::Noise;
    }
    if line == "START" {
        return SerialMessage::Event(SensorEvent::SessionStart);
    }
    if let Some(rest) = line.strip_prefix("LOG") {
        return SerialMessage::Log(rest.trim_start_matches(':').trim().to_string());
    }
    if let Some(rest) = line.strip_prefix("DROP ") {
        if let Ok(column) = rest.trim().parse::<usize>() {
            return SerialMessage::Event(SensorEvent::PuckDropped(column));
        }
    }
    SerialMessage::Unrecognized(line.to_string())
}

/// [`SensorSource`] reading the line protocol from any buffered reader.
pub struct SerialSensor<R> {
    lines: Lines<R>,
}

impl<R: AsyncBufRead + Unpin + Send> SerialSensor<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }
}

#[async_trait::async_trait]
impl<R: AsyncBufRead + Unpin + Send> SensorSource for SerialSensor<R> {
    async fn next_event(&mut self) -> anyhow::Result<Option<SensorEvent>> {
        while let Some(line) = self.lines.next_line().await? {
            match parse_line(&line) {
                SerialMessage::Event(event) => {
                    log::debug!("sensor event: {:?}", event);
                    return Ok(Some(event));
                }
                SerialMessage::Log(text) => log::debug!("sensor board: {}", text),
                SerialMessage::Noise => {}
                SerialMessage::Unrecognized(text) => {
                    log::warn!("ignoring unrecognized sensor line {:?}", text)
                }
            }
        }
        log::info!("sensor feed closed");
        Ok(None)
    }
}

/// [`SensorControl`] writing line commands to the sensor board.
pub struct SerialSensorControl<W> {
    writer: W,
}

impl<W: AsyncWrite + Unpin + Send> SerialSensorControl<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    async fn send_command(&mut self, command: &str) -> anyhow::Result<()> {
        let write_op = async {
            self.writer.write_all(command.as_bytes()).await?;
            self.writer.write_all(b"\n").await?;
            self.writer.flush().await?;
            anyhow::Ok(())
        };
        timeout(WRITE_TIMEOUT, write_op)
            .await
            .map_err(|_| anyhow::anyhow!("sensor command {:?} timed out after {:?}", command, WRITE_TIMEOUT))?
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[async_trait::async_trait]
impl<W: AsyncWrite + Unpin + Send> SensorControl for SerialSensorControl<W> {
    async fn reset(&mut self) -> anyhow::Result<()> {
        log::debug!("resetting sensor board");
        self.send_command("RESET").await
    }
}

/// Connect to a sensor board exposed over TCP (a serial-to-network bridge)
/// and split the stream into its reading and writing halves.
pub async fn connect<A: ToSocketAddrs>(
    addr: A,
) -> anyhow::Result<(
    SerialSensor<BufReader<OwnedReadHalf>>,
    SerialSensorControl<OwnedWriteHalf>,
)> {
    let stream = TcpStream::connect(addr).await?;
    let (read_half, write_half) = stream.into_split();
    Ok((
        SerialSensor::new(BufReader::new(read_half)),
        SerialSensorControl::new(write_half),
    ))
}
