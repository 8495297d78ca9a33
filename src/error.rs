//! Error types for modbus-tap.

use std::time::Duration;

use thiserror::Error;

/// Main error type for all modbus-tap operations.
///
/// Only fatal conditions live here. Per-frame conditions (partial frames,
/// resync skips, checksum mismatches, unsupported function codes) are handled
/// inside the pump and never surface as errors.
#[derive(Debug, Error)]
pub enum ModbusTapError {
    /// Missing or invalid connection/pump parameters.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Could not establish the TCP connection.
    #[error("Failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// Connect attempt exceeded the configured timeout.
    #[error("Timed out connecting to {0}")]
    ConnectTimeout(String),

    /// I/O error on an established stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No bytes arrived within the configured read timeout.
    #[error("No data received within {0:?}")]
    ReadTimeout(Duration),

    /// JSON serialization error (JSON lines sink).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// MsgPack serialization error.
    #[error("MsgPack encode error: {0}")]
    MsgPackEncode(#[from] rmp_serde::encode::Error),

    /// MsgPack deserialization error.
    #[error("MsgPack decode error: {0}")]
    MsgPackDecode(#[from] rmp_serde::decode::Error),

    /// The receiving side of a channel sink went away.
    #[error("Sink closed")]
    SinkClosed,
}

/// Result type alias using ModbusTapError.
pub type Result<T> = std::result::Result<T, ModbusTapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_display() {
        let e = ModbusTapError::Config("port must be non-zero".into());
        assert_eq!(e.to_string(), "Configuration error: port must be non-zero");
    }

    #[test]
    fn test_connect_display_and_source() {
        let e = ModbusTapError::Connect {
            addr: "10.0.0.1:8899".into(),
            source: std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused"),
        };
        assert!(e.to_string().starts_with("Failed to connect to 10.0.0.1:8899"));
        assert!(std::error::Error::source(&e).is_some());
    }

    #[test]
    fn test_read_timeout_display() {
        let e = ModbusTapError::ReadTimeout(Duration::from_secs(3));
        assert_eq!(e.to_string(), "No data received within 3s");
    }

    #[test]
    fn test_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset by peer");
        let e: ModbusTapError = io_err.into();
        assert!(matches!(e, ModbusTapError::Io(_)));
        assert!(e.to_string().contains("reset by peer"));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ModbusTapError>();
    }
}
