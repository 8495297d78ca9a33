//! Typed messages decoded from validated frames.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::frame::ValidatedFrame;
use super::wire_format::{READ_HOLDING_REGISTERS, REQUEST_FRAME_LEN};

/// One decoded frame.
///
/// Decoding never fails: every [`ValidatedFrame`] maps to exactly one variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DecodedMessage {
    /// Read-holding-registers request (8-byte frame).
    Request {
        unit_id: u8,
        function_code: u8,
        start_address: u16,
        register_count: u16,
    },
    /// Read-holding-registers response.
    Response {
        unit_id: u8,
        function_code: u8,
        byte_count: u8,
        registers: Vec<u16>,
    },
    /// Valid frame with a function code this crate does not interpret.
    Unsupported { function_code: u8 },
}

impl DecodedMessage {
    /// Decode a validated frame.
    ///
    /// An 8-byte read-registers frame is always a request, even when it was
    /// really a response with a byte count of 3; the wire gives no other clue.
    ///
    /// # Example
    ///
    /// ```
    /// use modbus_tap::protocol::{CandidateFrame, DecodedMessage};
    ///
    /// let frame = CandidateFrame::from_slice(&[0x01, 0x03, 0x00, 0x00, 0x00, 0x0A, 0xC5, 0xCD])
    ///     .validate()
    ///     .unwrap();
    ///
    /// assert_eq!(
    ///     DecodedMessage::decode(&frame),
    ///     DecodedMessage::Request {
    ///         unit_id: 1,
    ///         function_code: 3,
    ///         start_address: 0,
    ///         register_count: 10,
    ///     }
    /// );
    /// ```
    pub fn decode(frame: &ValidatedFrame) -> Self {
        let function_code = frame.function_code();
        if function_code != READ_HOLDING_REGISTERS {
            return DecodedMessage::Unsupported { function_code };
        }

        let bytes = frame.as_bytes();
        let unit_id = frame.unit_id();

        if bytes.len() == REQUEST_FRAME_LEN {
            return DecodedMessage::Request {
                unit_id,
                function_code,
                start_address: u16::from_be_bytes([bytes[2], bytes[3]]),
                register_count: u16::from_be_bytes([bytes[4], bytes[5]]),
            };
        }

        let byte_count = bytes[2];
        // payload() is byte count + data; bound the data by what is really there.
        let data = &frame.payload()[1..];
        let data = &data[..data.len().min(byte_count as usize)];
        let registers = data
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();

        DecodedMessage::Response {
            unit_id,
            function_code,
            byte_count,
            registers,
        }
    }

    pub fn function_code(&self) -> u8 {
        match self {
            DecodedMessage::Request { function_code, .. }
            | DecodedMessage::Response { function_code, .. }
            | DecodedMessage::Unsupported { function_code } => *function_code,
        }
    }

    /// Unit ID, when the variant carries one.
    pub fn unit_id(&self) -> Option<u8> {
        match self {
            DecodedMessage::Request { unit_id, .. } | DecodedMessage::Response { unit_id, .. } => {
                Some(*unit_id)
            }
            DecodedMessage::Unsupported { .. } => None,
        }
    }

    #[inline]
    pub fn is_request(&self) -> bool {
        matches!(self, DecodedMessage::Request { .. })
    }

    #[inline]
    pub fn is_response(&self) -> bool {
        matches!(self, DecodedMessage::Response { .. })
    }

    #[inline]
    pub fn is_unsupported(&self) -> bool {
        matches!(self, DecodedMessage::Unsupported { .. })
    }
}

impl fmt::Display for DecodedMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodedMessage::Request {
                unit_id,
                function_code,
                start_address,
                register_count,
            } => write!(
                f,
                "Request unit={} function={} start_address={} register_count={}",
                unit_id, function_code, start_address, register_count
            ),
            DecodedMessage::Response {
                unit_id,
                function_code,
                byte_count,
                registers,
            } => write!(
                f,
                "Response unit={} function={} byte_count={} registers={:?}",
                unit_id, function_code, byte_count, registers
            ),
            DecodedMessage::Unsupported { function_code } => {
                write!(f, "Unsupported function={}", function_code)
            }
        }
    }
}
