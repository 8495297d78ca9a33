//! TCP client connection to an RTU-over-TCP gateway.
//!
//! The gateway forwards raw RTU frames (no MBAP header) over a plain TCP
//! socket; this side only connects and reads.
//!
//! # Example
//!
//! ```no_run
//! use modbus_tap::transport::{connect, TcpTarget};
//!
//! # async fn example() -> modbus_tap::Result<()> {
//! let target = TcpTarget::new("192.168.1.50", 8899)?;
//! let stream = connect(&target).await?;
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::time::Duration;

use tokio::net::TcpStream;

use crate::error::{ModbusTapError, Result};

/// Where to connect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TcpTarget {
    host: String,
    port: u16,
    connect_timeout: Option<Duration>,
}

impl TcpTarget {
    /// Validate and build a target.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `host` is empty or `port` is 0.
    pub fn new(host: impl Into<String>, port: u16) -> Result<Self> {
        let host = host.into();
        let trimmed = host.trim();
        if trimmed.is_empty() {
            return Err(ModbusTapError::Config("host must not be empty".into()));
        }
        if port == 0 {
            return Err(ModbusTapError::Config("port must be non-zero".into()));
        }
        Ok(Self {
            host: trimmed.to_string(),
            port,
            connect_timeout: None,
        })
    }

    /// Bound the connect attempt. Without this, the OS default applies.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout
    }
}

impl fmt::Display for TcpTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            // Bare IPv6 literal.
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

/// Open a TCP connection to `target`.
pub async fn connect(target: &TcpTarget) -> Result<TcpStream> {
    let addr = target.to_string();
    let attempt = TcpStream::connect((target.host.as_str(), target.port));

    let stream = match target.connect_timeout {
        Some(limit) => tokio::time::timeout(limit, attempt)
            .await
            .map_err(|_| ModbusTapError::ConnectTimeout(addr.clone()))?,
        None => attempt.await,
    }
    .map_err(|source| ModbusTapError::Connect {
        addr: addr.clone(),
        source,
    })?;

    tracing::info!(%addr, "connected");
    Ok(stream)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[test]
    fn test_target_validation() {
        assert!(matches!(
            TcpTarget::new("", 502),
            Err(ModbusTapError::Config(_))
        ));
        assert!(matches!(
            TcpTarget::new("   ", 502),
            Err(ModbusTapError::Config(_))
        ));
        assert!(matches!(
            TcpTarget::new("10.0.0.1", 0),
            Err(ModbusTapError::Config(_))
        ));

        let target = TcpTarget::new(" 10.0.0.1 ", 8899).unwrap();
        assert_eq!(target.host(), "10.0.0.1");
        assert_eq!(target.port(), 8899);
        assert_eq!(target.connect_timeout(), None);
    }

    #[test]
    fn test_target_display() {
        assert_eq!(
            TcpTarget::new("gateway.local", 8899).unwrap().to_string(),
            "gateway.local:8899"
        );
        assert_eq!(TcpTarget::new("::1", 502).unwrap().to_string(), "[::1]:502");
    }

    #[tokio::test]
    async fn test_connect_loopback() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let accept = tokio::spawn(async move { listener.accept().await.unwrap() });
        let target = TcpTarget::new("127.0.0.1", port)
            .unwrap()
            .with_connect_timeout(Duration::from_secs(5));

        let stream = connect(&target).await.unwrap();
        let (peer, _) = accept.await.unwrap();
        assert_eq!(stream.peer_addr().unwrap(), peer.local_addr().unwrap());
    }

    #[tokio::test]
    async fn test_connect_refused() {
        // Bind then drop to get a port with nothing listening.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let target = TcpTarget::new("127.0.0.1", port).unwrap();
        let err = connect(&target).await.unwrap_err();
        assert!(matches!(err, ModbusTapError::Connect { .. }));
    }
}
