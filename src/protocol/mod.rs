//! Protocol module - RTU checksum, framing, and message decoding.
//!
//! This module implements everything between raw stream bytes and typed
//! messages:
//! - CRC-16/MODBUS validation
//! - Frame splitter inferring boundaries from content
//! - Candidate/validated frame types
//! - Decoding into [`DecodedMessage`]

mod crc;
mod frame;
mod message;
mod splitter;
mod wire_format;

pub use crc::{append_crc, checksum_matches, crc16, CRC_SIZE};
pub use frame::{CandidateFrame, HexBytes, Rejection, ValidatedFrame};
pub use message::DecodedMessage;
pub use splitter::{ClassifyMode, FrameSplitter, Split};
pub use wire_format::{
    encode_read_request, encode_read_response, response_frame_len, MAX_FRAME_LEN,
    MAX_READ_REGISTERS, MIN_CLASSIFY_LEN, MIN_FRAME_LEN, READ_HOLDING_REGISTERS,
    REQUEST_FRAME_LEN, RESPONSE_HEADER_LEN,
};
