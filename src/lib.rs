//! # modbus-tap
//!
//! Passive decoder for Modbus RTU traffic carried over a raw TCP byte stream,
//! such as the transparent serial port of an RTU-to-TCP gateway.
//!
//! The stream has no delimiters. Frame boundaries are inferred from the
//! function code and length fields, every candidate frame is CRC-checked, and
//! read-holding-registers requests are told apart from responses by shape.
//!
//! ## Architecture
//!
//! - **protocol**: CRC-16, frame splitter, frame types, [`DecodedMessage`]
//! - **pump**: [`StreamPump`] reading a connection and driving the pipeline
//! - **sink**: where decoded messages go ([`Sink`] and provided impls)
//! - **transport**: TCP client connection
//! - **codec**: JSON lines / MessagePack encodings for structured sinks
//!
//! ## Example
//!
//! ```no_run
//! use modbus_tap::sink::TextSink;
//! use modbus_tap::transport::TcpTarget;
//! use modbus_tap::StreamPump;
//!
//! #[tokio::main]
//! async fn main() -> modbus_tap::Result<()> {
//!     let target = TcpTarget::new("192.168.1.50", 8899)?;
//!     let mut pump = StreamPump::builder().build()?;
//!
//!     pump.connect_and_run(&target, &mut TextSink::new(std::io::stdout()))
//!         .await?;
//!     Ok(())
//! }
//! ```

pub mod codec;
pub mod error;
pub mod protocol;
pub mod pump;
pub mod sink;
pub mod transport;

pub use error::{ModbusTapError, Result};
pub use protocol::{ClassifyMode, DecodedMessage};
pub use pump::{PumpBuilder, PumpConfig, PumpStats, StreamPump, DEFAULT_CHUNK_SIZE};
pub use sink::Sink;
