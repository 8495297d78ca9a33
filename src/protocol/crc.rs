//! CRC-16/MODBUS checksum.
//!
//! Every RTU frame ends with a 2-byte checksum, transmitted low byte first:
//!
//! ```text
//! ┌─────────┬──────────┬─────────────┬─────────┬─────────┐
//! │ Unit ID │ Function │ Payload ... │ CRC lo  │ CRC hi  │
//! │ 1 byte  │ 1 byte   │ N bytes     │ 1 byte  │ 1 byte  │
//! └─────────┴──────────┴─────────────┴─────────┴─────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use modbus_tap::protocol::{checksum_matches, crc16};
//!
//! assert_eq!(crc16(&[0x01, 0x03, 0x00, 0x00, 0x00, 0x0A]).to_le_bytes(), [0xC5, 0xCD]);
//! assert!(checksum_matches(&[0x01, 0x03, 0x00, 0x00, 0x00, 0x0A, 0xC5, 0xCD]));
//! ```

/// Size of the trailing checksum field in bytes.
pub const CRC_SIZE: usize = 2;

/// Reflected CRC-16/MODBUS polynomial.
const POLY: u16 = 0xA001;

/// Initial value of the CRC register.
const INIT: u16 = 0xFFFF;

/// Compute the CRC-16/MODBUS checksum of `data`.
pub fn crc16(data: &[u8]) -> u16 {
    let mut crc = INIT;
    for &byte in data {
        crc ^= u16::from(byte);
        for _ in 0..8 {
            if crc & 1 != 0 {
                crc = (crc >> 1) ^ POLY;
            } else {
                crc >>= 1;
            }
        }
    }
    crc
}

/// Check whether the trailing 2 bytes of `frame` hold the checksum of the rest.
///
/// Frames too short to carry a checksum never match.
pub fn checksum_matches(frame: &[u8]) -> bool {
    if frame.len() <= CRC_SIZE {
        return false;
    }
    let (body, trailer) = frame.split_at(frame.len() - CRC_SIZE);
    let received = u16::from_le_bytes([trailer[0], trailer[1]]);
    crc16(body) == received
}

/// Append the checksum of `frame` to it, low byte first.
pub fn append_crc(frame: &mut Vec<u8>) {
    let crc = crc16(frame);
    frame.extend_from_slice(&crc.to_le_bytes());
}
