//! CLI definition and entrypoint to executable
use std::io::Write;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use modbus_tap::sink::{JsonLinesSink, MsgPackSink, TextSink};
use modbus_tap::transport::TcpTarget;
use modbus_tap::{ClassifyMode, ModbusTapError, PumpStats, Result, Sink, StreamPump};

/// How decoded messages are written to stdout.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// One human-readable line per message, plus a line per rejected frame.
    Text,
    /// One JSON object per line.
    Json,
    /// Length-prefixed MessagePack records.
    Msgpack,
}

/// Decode Modbus RTU read-holding-registers traffic from a TCP gateway.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Gateway host name or IP address.
    host: String,

    /// Gateway TCP port.
    port: u16,

    /// Output format for decoded messages.
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Maximum bytes requested per read.
    #[arg(long, default_value_t = modbus_tap::DEFAULT_CHUNK_SIZE)]
    chunk_size: usize,

    /// Abort if no data arrives for this many seconds.
    #[arg(long, value_name = "SECS")]
    read_timeout: Option<f64>,

    /// Abort if the connection is not established within this many seconds.
    #[arg(long, value_name = "SECS")]
    connect_timeout: Option<f64>,

    /// Use checksums to tell requests from responses instead of the length heuristic.
    #[arg(long)]
    strict: bool,
}

fn seconds(flag: &str, secs: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(secs)
        .map_err(|_| ModbusTapError::Config(format!("--{flag} must be a non-negative number")))
}

async fn run(cli: Cli) -> Result<PumpStats> {
    let mut target = TcpTarget::new(cli.host, cli.port)?;
    if let Some(secs) = cli.connect_timeout {
        target = target.with_connect_timeout(seconds("connect-timeout", secs)?);
    }

    let mut builder = StreamPump::builder().chunk_size(cli.chunk_size);
    if let Some(secs) = cli.read_timeout {
        builder = builder.read_timeout(seconds("read-timeout", secs)?);
    }
    if cli.strict {
        builder = builder.classify_mode(ClassifyMode::ChecksumGuided);
    }
    let mut pump = builder.build()?;

    let stdout = std::io::stdout();
    let mut sink: Box<dyn Sink> = match cli.format {
        OutputFormat::Text => Box::new(TextSink::new(stdout.lock())),
        OutputFormat::Json => Box::new(JsonLinesSink::new(stdout.lock())),
        OutputFormat::Msgpack => Box::new(MsgPackSink::new(stdout.lock())),
    };

    let stats = pump.connect_and_run(&target, sink.as_mut()).await?;
    drop(sink);
    std::io::stdout().flush()?;
    Ok(stats)
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(stats) => {
            tracing::info!(
                messages = stats.messages,
                rejected = stats.rejected,
                skipped_bytes = stats.skipped_bytes,
                "connection closed"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["modbus-tap", "10.0.0.5", "8899"]).unwrap();
        assert_eq!(cli.host, "10.0.0.5");
        assert_eq!(cli.port, 8899);
        assert_eq!(cli.format, OutputFormat::Text);
        assert_eq!(cli.chunk_size, modbus_tap::DEFAULT_CHUNK_SIZE);
        assert!(cli.read_timeout.is_none());
        assert!(!cli.strict);
    }

    #[test]
    fn test_cli_options() {
        let cli = Cli::try_parse_from([
            "modbus-tap",
            "gw",
            "502",
            "--format",
            "json",
            "--read-timeout",
            "2.5",
            "--strict",
        ])
        .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.read_timeout, Some(2.5));
        assert!(cli.strict);
    }

    #[test]
    fn test_cli_rejects_bad_port() {
        assert!(Cli::try_parse_from(["modbus-tap", "gw", "70000"]).is_err());
    }

    #[test]
    fn test_seconds_conversion() {
        assert_eq!(
            seconds("read-timeout", 1.5).unwrap(),
            Duration::from_millis(1500)
        );
        assert!(matches!(
            seconds("read-timeout", -1.0),
            Err(ModbusTapError::Config(_))
        ));
    }
}
