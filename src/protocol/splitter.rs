//! Frame splitter for an undelimited RTU byte stream.
//!
//! Uses `bytes::BytesMut` as the accumulation buffer. Frame boundaries are
//! not marked on the wire, so each candidate's length is inferred from its
//! first bytes:
//!
//! - function code `0x03` and a big-endian word ≤ 125 at offset 2: request, 8 bytes
//! - function code `0x03` otherwise: response, `3 + byte_count + 2` bytes
//! - any other function code: drop one byte and look again
//!
//! The one-byte skip is a deliberately weak resync. It does not search for a
//! plausible address/function pair and can land inside another frame. The
//! request rule can also claim a response whose byte count and first data
//! byte happen to form a small word. Both are properties of the framing and
//! are kept as-is in [`ClassifyMode::Heuristic`].
//!
//! # Example
//!
//! ```
//! use modbus_tap::protocol::{FrameSplitter, Split};
//!
//! let mut splitter = FrameSplitter::new();
//! splitter.push(&[0x01, 0x03, 0x00, 0x00]);
//! assert!(matches!(splitter.next_candidate(), Split::NeedMore));
//!
//! splitter.push(&[0x00, 0x0A, 0xC5, 0xCD]);
//! match splitter.next_candidate() {
//!     Split::Frame(frame) => assert_eq!(frame.len(), 8),
//!     Split::NeedMore => unreachable!(),
//! }
//! ```

use bytes::{Buf, BytesMut};

use super::crc::checksum_matches;
use super::frame::CandidateFrame;
use super::wire_format::{
    response_frame_len, MAX_FRAME_LEN, MAX_READ_REGISTERS, MIN_CLASSIFY_LEN,
    READ_HOLDING_REGISTERS, REQUEST_FRAME_LEN,
};

/// How the splitter decides between request and response shapes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClassifyMode {
    /// Classify on content alone; the length is final once chosen.
    #[default]
    Heuristic,
    /// Take the request shape if its checksum matches, else the response shape
    /// if its checksum matches. A request-shaped front waits for all 8 bytes
    /// before either is tried.
    ChecksumGuided,
}

/// Outcome of one extraction attempt.
#[derive(Debug)]
pub enum Split {
    /// A candidate was cut off the front of the buffer.
    Frame(CandidateFrame),
    /// Nothing more can be extracted until more bytes arrive.
    NeedMore,
}

/// What the bytes at the front of the buffer call for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Take(usize),
    Skip,
    Wait,
}

/// Accumulates stream bytes and cuts candidate frames off the front.
pub struct FrameSplitter {
    /// Unconsumed bytes. The front is always the scan cursor.
    buffer: BytesMut,
    mode: ClassifyMode,
    /// Bytes dropped by the one-byte resync since creation.
    skipped: u64,
}

impl FrameSplitter {
    /// Create a splitter using the default heuristic.
    pub fn new() -> Self {
        Self::with_mode(ClassifyMode::default())
    }

    /// Create a splitter with an explicit classification mode.
    pub fn with_mode(mode: ClassifyMode) -> Self {
        Self {
            buffer: BytesMut::with_capacity(4 * MAX_FRAME_LEN),
            mode,
            skipped: 0,
        }
    }

    /// Append freshly received bytes.
    pub fn push(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Extract the next candidate frame.
    ///
    /// Leading bytes that cannot start a supported frame are dropped one at a
    /// time. Returns [`Split::NeedMore`] once the front of the buffer is a
    /// partial frame (or too short to classify); the buffer is then left
    /// untouched, so calling again without pushing returns `NeedMore` again.
    pub fn next_candidate(&mut self) -> Split {
        loop {
            match self.classify() {
                Step::Take(len) => {
                    let bytes = self.buffer.split_to(len).freeze();
                    tracing::debug!(len, "candidate frame");
                    return Split::Frame(CandidateFrame::new(bytes));
                }
                Step::Skip => {
                    tracing::trace!(byte = self.buffer[0], "skipping unrecognized byte");
                    self.buffer.advance(1);
                    self.skipped += 1;
                }
                Step::Wait => return Split::NeedMore,
            }
        }
    }

    /// Drain every candidate currently extractable.
    pub fn drain_candidates(&mut self) -> Vec<CandidateFrame> {
        let mut frames = Vec::new();
        while let Split::Frame(frame) = self.next_candidate() {
            frames.push(frame);
        }
        frames
    }

    fn classify(&self) -> Step {
        let buf = &self.buffer[..];
        if buf.len() < MIN_CLASSIFY_LEN {
            return Step::Wait;
        }
        if buf[1] != READ_HOLDING_REGISTERS {
            return Step::Skip;
        }

        let looks_like_request = u16::from_be_bytes([buf[2], buf[3]]) <= MAX_READ_REGISTERS;
        let response_len = response_frame_len(buf[2]);

        match self.mode {
            ClassifyMode::Heuristic => {
                let len = if looks_like_request {
                    REQUEST_FRAME_LEN
                } else {
                    response_len
                };
                take_if_available(buf, len)
            }
            ClassifyMode::ChecksumGuided => {
                // The request reading is settled before the shorter response
                // reading is tried.
                if looks_like_request {
                    if buf.len() < REQUEST_FRAME_LEN {
                        return Step::Wait;
                    }
                    if checksum_matches(&buf[..REQUEST_FRAME_LEN]) {
                        return Step::Take(REQUEST_FRAME_LEN);
                    }
                }
                if buf.len() < response_len {
                    return Step::Wait;
                }
                if checksum_matches(&buf[..response_len]) {
                    return Step::Take(response_len);
                }

                // Neither shape checks out; hand over the heuristic's pick so
                // validation drops it and scanning resumes after it.
                if looks_like_request {
                    Step::Take(REQUEST_FRAME_LEN)
                } else {
                    Step::Take(response_len)
                }
            }
        }
    }

    /// Number of buffered, unconsumed bytes.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Unconsumed bytes, front first.
    pub fn pending(&self) -> &[u8] {
        &self.buffer
    }

    /// Total bytes dropped by resynchronization.
    pub fn skipped_bytes(&self) -> u64 {
        self.skipped
    }

    pub fn mode(&self) -> ClassifyMode {
        self.mode
    }

    /// Discard all buffered bytes.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

impl Default for FrameSplitter {
    fn default() -> Self {
        Self::new()
    }
}

fn take_if_available(buf: &[u8], len: usize) -> Step {
    if buf.len() >= len {
        Step::Take(len)
    } else {
        Step::Wait
    }
}
