//! Stream pump: reads the connection and drives split → validate → decode.
//!
//! The [`PumpBuilder`] provides a fluent API for configuring the pump. The
//! [`StreamPump`] then owns one connection for the duration of a run:
//! 1. Read up to `chunk_size` bytes (optionally bounded by `read_timeout`)
//! 2. Zero bytes: peer closed, return the run's [`PumpStats`]
//! 3. Otherwise append to the splitter and drain every candidate
//! 4. Validated candidates are decoded and handed to the sink; the rest are
//!    reported as rejected and dropped
//!
//! # Example
//!
//! ```no_run
//! use modbus_tap::sink::TextSink;
//! use modbus_tap::transport::TcpTarget;
//! use modbus_tap::StreamPump;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let target = TcpTarget::new("192.168.1.50", 8899)?;
//!     let mut pump = StreamPump::builder().chunk_size(512).build()?;
//!     let mut sink = TextSink::new(std::io::stdout());
//!
//!     let stats = pump.connect_and_run(&target, &mut sink).await?;
//!     eprintln!("{} messages", stats.messages);
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::{ModbusTapError, Result};
use crate::protocol::{ClassifyMode, DecodedMessage, FrameSplitter, HexBytes, Split};
use crate::sink::Sink;
use crate::transport::{connect, TcpTarget};

/// Default read chunk size.
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

/// Configuration for the stream pump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PumpConfig {
    /// Maximum bytes requested per read.
    pub chunk_size: usize,
    /// Give up if a single read waits longer than this. `None` blocks forever.
    pub read_timeout: Option<Duration>,
    /// Request/response classification strategy.
    pub classify_mode: ClassifyMode,
}

impl Default for PumpConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            read_timeout: None,
            classify_mode: ClassifyMode::Heuristic,
        }
    }
}

/// Builder for configuring and creating a [`StreamPump`].
#[derive(Debug, Clone, Default)]
pub struct PumpBuilder {
    config: PumpConfig,
}

impl PumpBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the read chunk size.
    ///
    /// Default: 1024
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.config.chunk_size = size;
        self
    }

    /// Bound each read. A read that times out ends the run with
    /// [`ModbusTapError::ReadTimeout`].
    ///
    /// Default: none (block until data or close)
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.config.read_timeout = Some(timeout);
        self
    }

    /// Set the classification strategy.
    ///
    /// Default: [`ClassifyMode::Heuristic`]
    pub fn classify_mode(mut self, mode: ClassifyMode) -> Self {
        self.config.classify_mode = mode;
        self
    }

    /// Validate the configuration and build the pump.
    pub fn build(self) -> Result<StreamPump> {
        StreamPump::with_config(self.config)
    }
}

/// Counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PumpStats {
    /// Non-empty reads.
    pub reads: u64,
    pub bytes_read: u64,
    /// Messages delivered to the sink (including unsupported ones).
    pub messages: u64,
    /// Candidates dropped by validation.
    pub rejected: u64,
    /// Bytes dropped by the one-byte resync.
    pub skipped_bytes: u64,
    /// Bytes left in the buffer when the stream ended.
    pub pending_bytes: usize,
}

/// Drives one byte stream through the splitter, validator and decoder.
pub struct StreamPump {
    config: PumpConfig,
    splitter: FrameSplitter,
    stats: PumpStats,
}

impl StreamPump {
    /// Create a new pump builder.
    pub fn builder() -> PumpBuilder {
        PumpBuilder::new()
    }

    /// Create a pump from an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `chunk_size` or `read_timeout` is zero.
    pub fn with_config(config: PumpConfig) -> Result<Self> {
        if config.chunk_size == 0 {
            return Err(ModbusTapError::Config("chunk size must be non-zero".into()));
        }
        if config.read_timeout == Some(Duration::ZERO) {
            return Err(ModbusTapError::Config("read timeout must be non-zero".into()));
        }
        Ok(Self {
            splitter: FrameSplitter::with_mode(config.classify_mode),
            config,
            stats: PumpStats::default(),
        })
    }

    pub fn config(&self) -> &PumpConfig {
        &self.config
    }

    /// Counters for the current (or last) run.
    pub fn stats(&self) -> PumpStats {
        PumpStats {
            skipped_bytes: self.splitter.skipped_bytes(),
            pending_bytes: self.splitter.len(),
            ..self.stats
        }
    }

    /// Connect to `target`, then [`run`](Self::run) over the connection.
    ///
    /// Connection failures are returned before any reading starts.
    pub async fn connect_and_run<S>(&mut self, target: &TcpTarget, sink: &mut S) -> Result<PumpStats>
    where
        S: Sink + ?Sized,
    {
        let stream = connect(target).await?;
        self.run(stream, sink).await
    }

    /// Pump `reader` until end of stream.
    ///
    /// Each run starts from an empty buffer and zeroed counters. Returns the
    /// run's counters on a clean close; I/O errors, read timeouts and sink
    /// failures end the run with an error.
    pub async fn run<R, S>(&mut self, mut reader: R, sink: &mut S) -> Result<PumpStats>
    where
        R: AsyncRead + Unpin,
        S: Sink + ?Sized,
    {
        self.reset();
        let mut buf = vec![0u8; self.config.chunk_size];

        loop {
            let n = self.read_chunk(&mut reader, &mut buf).await?;
            if n == 0 {
                let stats = self.stats();
                if stats.pending_bytes > 0 {
                    tracing::debug!(
                        pending = %HexBytes(self.splitter.pending()),
                        "discarding partial frame at end of stream"
                    );
                }
                tracing::info!(
                    reads = stats.reads,
                    bytes = stats.bytes_read,
                    messages = stats.messages,
                    rejected = stats.rejected,
                    skipped = stats.skipped_bytes,
                    "stream closed"
                );
                return Ok(stats);
            }

            tracing::trace!(len = n, data = %HexBytes(&buf[..n]), "read");
            self.feed(&buf[..n], sink)?;
        }
    }

    /// Push `data` and deliver every frame it completes.
    ///
    /// This is the synchronous core of [`run`](Self::run), usable on its own
    /// when bytes arrive by other means.
    pub fn feed<S>(&mut self, data: &[u8], sink: &mut S) -> Result<()>
    where
        S: Sink + ?Sized,
    {
        self.stats.reads += 1;
        self.stats.bytes_read += data.len() as u64;
        self.splitter.push(data);

        while let Split::Frame(candidate) = self.splitter.next_candidate() {
            match candidate.validate() {
                Ok(frame) => {
                    let message = DecodedMessage::decode(&frame);
                    tracing::debug!(%message, "decoded");
                    self.stats.messages += 1;
                    sink.on_message(message)?;
                }
                Err(reason) => {
                    tracing::warn!(
                        %reason,
                        frame = %HexBytes(candidate.as_bytes()),
                        "dropping candidate frame"
                    );
                    self.stats.rejected += 1;
                    sink.on_rejected(&candidate, &reason)?;
                }
            }
        }
        Ok(())
    }

    async fn read_chunk<R>(&self, reader: &mut R, buf: &mut [u8]) -> Result<usize>
    where
        R: AsyncRead + Unpin,
    {
        match self.config.read_timeout {
            Some(limit) => tokio::time::timeout(limit, reader.read(buf))
                .await
                .map_err(|_| ModbusTapError::ReadTimeout(limit))?
                .map_err(ModbusTapError::Io),
            None => reader.read(buf).await.map_err(ModbusTapError::Io),
        }
    }

    fn reset(&mut self) {
        self.splitter = FrameSplitter::with_mode(self.config.classify_mode);
        self.stats = PumpStats::default();
    }
}
