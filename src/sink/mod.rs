//! Sink module - where decoded messages go.
//!
//! The pump hands every [`DecodedMessage`] to a caller-supplied [`Sink`], and
//! every dropped candidate to [`Sink::on_rejected`]. Provided sinks:
//!
//! - [`TextSink`] - one human-readable line per event
//! - [`JsonLinesSink`] - one JSON object per message
//! - [`MsgPackSink`] - length-prefixed MessagePack records
//! - [`ChannelSink`] - forwards messages to a tokio channel
//! - any `FnMut(DecodedMessage)` closure
//!
//! # Example
//!
//! ```
//! use modbus_tap::protocol::DecodedMessage;
//! use modbus_tap::sink::{Sink, TextSink};
//!
//! let mut sink = TextSink::new(Vec::new());
//! sink.on_message(DecodedMessage::Unsupported { function_code: 4 }).unwrap();
//! assert_eq!(sink.into_inner(), b"Unsupported function=4\n");
//! ```

mod channel;
mod stream;

pub use channel::ChannelSink;
pub use stream::{JsonLinesSink, MsgPackSink, TextSink};

use crate::error::Result;
use crate::protocol::{CandidateFrame, DecodedMessage, Rejection};

/// Receiver of decoded messages and rejection diagnostics.
///
/// Returning an error from either method stops the pump; use that only for
/// failures of the sink itself (closed output, broken pipe).
pub trait Sink {
    /// Called once per decoded message, in stream order.
    fn on_message(&mut self, message: DecodedMessage) -> Result<()>;

    /// Called for each candidate frame that failed validation.
    ///
    /// The default ignores it; the pump already logs the drop.
    fn on_rejected(&mut self, frame: &CandidateFrame, reason: &Rejection) -> Result<()> {
        let _ = (frame, reason);
        Ok(())
    }
}

impl<F> Sink for F
where
    F: FnMut(DecodedMessage),
{
    fn on_message(&mut self, message: DecodedMessage) -> Result<()> {
        self(message);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_sink() {
        let mut seen = Vec::new();
        {
            let mut sink = |message: DecodedMessage| seen.push(message);
            sink.on_message(DecodedMessage::Unsupported { function_code: 5 })
                .unwrap();
            let frame = CandidateFrame::from_slice(&[0x01, 0x03, 0x00, 0x00, 0x00]);
            sink.on_rejected(&frame, &Rejection::TooShort { len: 5 })
                .unwrap();
        }
        assert_eq!(seen, vec![DecodedMessage::Unsupported { function_code: 5 }]);
    }
}
