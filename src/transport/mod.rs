//! Transport module - TCP client connection handling.

mod tcp;

pub use tcp::{connect, TcpTarget};
