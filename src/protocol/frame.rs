//! Candidate and validated frames.
//!
//! The splitter hands out [`CandidateFrame`]s: byte spans whose length was
//! inferred from content and which nobody trusts yet. The only way to get a
//! [`ValidatedFrame`] is [`CandidateFrame::validate`], so anything holding one
//! knows the checksum matched and the frame is at least [`MIN_FRAME_LEN`] long.
//!
//! # Example
//!
//! ```
//! use modbus_tap::protocol::CandidateFrame;
//! use bytes::Bytes;
//!
//! let candidate = CandidateFrame::new(Bytes::from_static(&[0x01, 0x03, 0x02, 0x00, 0x0A, 0x38, 0x43]));
//! let frame = candidate.validate().unwrap();
//! assert_eq!(frame.unit_id(), 1);
//! assert_eq!(frame.function_code(), 3);
//! ```

use std::fmt;

use bytes::Bytes;
use thiserror::Error;

use super::crc::{crc16, CRC_SIZE};
use super::wire_format::MIN_FRAME_LEN;

/// Why a candidate frame was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    /// Shorter than the smallest frame that can carry a payload and checksum.
    #[error("frame too short ({len} bytes)")]
    TooShort { len: usize },

    /// Trailing checksum does not match the computed one.
    #[error("CRC mismatch: computed {computed:#06x}, received {received:#06x}")]
    ChecksumMismatch { computed: u16, received: u16 },
}

/// A frame-shaped byte span cut from the stream, not yet checksum-verified.
#[derive(Clone, PartialEq, Eq)]
pub struct CandidateFrame {
    bytes: Bytes,
}

impl CandidateFrame {
    /// Wrap raw frame bytes.
    pub fn new(bytes: Bytes) -> Self {
        Self { bytes }
    }

    /// Wrap a copy of `bytes`.
    pub fn from_slice(bytes: &[u8]) -> Self {
        Self {
            bytes: Bytes::copy_from_slice(bytes),
        }
    }

    /// Raw frame bytes, checksum included.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Check length and checksum, promoting to a [`ValidatedFrame`].
    pub fn validate(&self) -> Result<ValidatedFrame, Rejection> {
        let len = self.bytes.len();
        if len < MIN_FRAME_LEN {
            return Err(Rejection::TooShort { len });
        }

        let body_len = len - CRC_SIZE;
        let computed = crc16(&self.bytes[..body_len]);
        let received = u16::from_le_bytes([self.bytes[body_len], self.bytes[body_len + 1]]);
        if computed != received {
            return Err(Rejection::ChecksumMismatch { computed, received });
        }

        Ok(ValidatedFrame {
            bytes: self.bytes.clone(),
        })
    }
}

impl fmt::Debug for CandidateFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CandidateFrame")
            .field(&HexBytes(&self.bytes))
            .finish()
    }
}

/// A frame whose checksum matched. Always at least [`MIN_FRAME_LEN`] bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct ValidatedFrame {
    bytes: Bytes,
}

impl ValidatedFrame {
    #[inline]
    pub fn unit_id(&self) -> u8 {
        self.bytes[0]
    }

    #[inline]
    pub fn function_code(&self) -> u8 {
        self.bytes[1]
    }

    /// Whole frame, checksum included.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Everything after the function code and before the checksum.
    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.bytes[2..self.bytes.len() - CRC_SIZE]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for ValidatedFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ValidatedFrame")
            .field(&HexBytes(&self.bytes))
            .finish()
    }
}

/// Space-separated uppercase hex, the way frames are usually written down.
pub struct HexBytes<'a>(pub &'a [u8]);

impl fmt::Display for HexBytes<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{:02X}", byte)?;
        }
        Ok(())
    }
}

impl fmt::Debug for HexBytes<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
