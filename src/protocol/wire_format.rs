//! Wire format constants and frame builders for read-holding-registers.
//!
//! Request (always 8 bytes):
//! ```text
//! ┌─────────┬──────┬───────────────┬────────────────┬────────┐
//! │ Unit ID │ 0x03 │ Start address │ Register count │ CRC    │
//! │ 1 byte  │ 1    │ uint16 BE     │ uint16 BE      │ 2 (LE) │
//! └─────────┴──────┴───────────────┴────────────────┴────────┘
//! ```
//!
//! Response (3 + byte count + 2 bytes):
//! ```text
//! ┌─────────┬──────┬────────────┬──────────────────────┬────────┐
//! │ Unit ID │ 0x03 │ Byte count │ Registers (uint16 BE)│ CRC    │
//! │ 1 byte  │ 1    │ 1 byte     │ byte count bytes     │ 2 (LE) │
//! └─────────┴──────┴────────────┴──────────────────────┴────────┘
//! ```
//!
//! There is no frame-type tag on the wire: requests and responses share the
//! function code and are told apart by shape alone.

use super::crc::{append_crc, CRC_SIZE};
use crate::error::{ModbusTapError, Result};

/// The only function code this crate decodes.
pub const READ_HOLDING_REGISTERS: u8 = 0x03;

/// Largest register count a read request may ask for.
pub const MAX_READ_REGISTERS: u16 = 125;

/// Fixed size of a read request frame, checksum included.
pub const REQUEST_FRAME_LEN: usize = 8;

/// Unit ID + function code + byte count.
pub const RESPONSE_HEADER_LEN: usize = 3;

/// Smallest prefix the splitter needs before it will classify anything.
pub const MIN_CLASSIFY_LEN: usize = 4;

/// Smallest frame that can pass validation: address, function, one payload byte, CRC.
pub const MIN_FRAME_LEN: usize = 5;

/// Largest response frame: a 255 byte count plus header and CRC.
pub const MAX_FRAME_LEN: usize = RESPONSE_HEADER_LEN + u8::MAX as usize + CRC_SIZE;

/// Total response frame length for a given byte count.
#[inline]
pub fn response_frame_len(byte_count: u8) -> usize {
    RESPONSE_HEADER_LEN + byte_count as usize + CRC_SIZE
}

/// Build a checksummed read-holding-registers request.
///
/// # Example
///
/// ```
/// use modbus_tap::protocol::encode_read_request;
///
/// let frame = encode_read_request(1, 0, 10).unwrap();
/// assert_eq!(frame, [0x01, 0x03, 0x00, 0x00, 0x00, 0x0A, 0xC5, 0xCD]);
/// ```
///
/// # Errors
///
/// Returns a configuration error if `register_count` is 0 or above 125.
pub fn encode_read_request(unit_id: u8, start_address: u16, register_count: u16) -> Result<Vec<u8>> {
    if register_count == 0 || register_count > MAX_READ_REGISTERS {
        return Err(ModbusTapError::Config(format!(
            "register count {} outside 1..={}",
            register_count, MAX_READ_REGISTERS
        )));
    }

    let mut buf = Vec::with_capacity(REQUEST_FRAME_LEN);
    buf.push(unit_id);
    buf.push(READ_HOLDING_REGISTERS);
    buf.extend_from_slice(&start_address.to_be_bytes());
    buf.extend_from_slice(&register_count.to_be_bytes());
    append_crc(&mut buf);
    Ok(buf)
}

/// Build a checksummed read-holding-registers response.
///
/// # Example
///
/// ```
/// use modbus_tap::protocol::encode_read_response;
///
/// let frame = encode_read_response(1, &[10]).unwrap();
/// assert_eq!(frame, [0x01, 0x03, 0x02, 0x00, 0x0A, 0x38, 0x43]);
/// ```
///
/// # Errors
///
/// Returns a configuration error if the register data does not fit the
/// one-byte byte count.
pub fn encode_read_response(unit_id: u8, registers: &[u16]) -> Result<Vec<u8>> {
    let byte_count = u8::try_from(registers.len() * 2).map_err(|_| {
        ModbusTapError::Config(format!(
            "{} registers do not fit in a single response",
            registers.len()
        ))
    })?;

    let mut buf = Vec::with_capacity(response_frame_len(byte_count));
    buf.push(unit_id);
    buf.push(READ_HOLDING_REGISTERS);
    buf.push(byte_count);
    for register in registers {
        buf.extend_from_slice(&register.to_be_bytes());
    }
    append_crc(&mut buf);
    Ok(buf)
}
