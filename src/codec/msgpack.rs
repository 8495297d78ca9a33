//! MsgPack codec using `rmp-serde`.
//!
//! Always encodes with `to_vec_named` so message fields travel as a map with
//! their names, matching the JSON shape (`{"kind": "response", ...}`).
//!
//! Records written to a byte stream are prefixed with their length as a
//! big-endian `u32`:
//!
//! ```text
//! ┌───────────┬──────────────────────┐
//! │ Length    │ MsgPack map          │
//! │ uint32 BE │ `length` bytes       │
//! └───────────┴──────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use modbus_tap::codec::MsgPackCodec;
//! use modbus_tap::protocol::DecodedMessage;
//!
//! let message = DecodedMessage::Unsupported { function_code: 4 };
//! let record = MsgPackCodec::encode_record(&message).unwrap();
//! let (decoded, used): (DecodedMessage, usize) = MsgPackCodec::decode_record(&record).unwrap().unwrap();
//! assert_eq!(decoded, message);
//! assert_eq!(used, record.len());
//! ```

use crate::error::Result;

/// Length prefix size for stream records.
pub const RECORD_PREFIX_SIZE: usize = 4;

/// MessagePack codec for decoded messages and stats.
pub struct MsgPackCodec;

impl MsgPackCodec {
    /// Encode a value to MsgPack bytes (struct-as-map).
    #[inline]
    pub fn encode<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        Ok(rmp_serde::to_vec_named(value)?)
    }

    /// Decode MsgPack bytes to a value.
    #[inline]
    pub fn decode<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
        Ok(rmp_serde::from_slice(bytes)?)
    }

    /// Encode a value as a length-prefixed record.
    pub fn encode_record<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        let body = Self::encode(value)?;
        let mut record = Vec::with_capacity(RECORD_PREFIX_SIZE + body.len());
        record.extend_from_slice(&(body.len() as u32).to_be_bytes());
        record.extend_from_slice(&body);
        Ok(record)
    }

    /// Decode one length-prefixed record from the front of `bytes`.
    ///
    /// Returns `Ok(None)` if the record is not complete yet, otherwise the
    /// value and the number of bytes it occupied.
    pub fn decode_record<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<Option<(T, usize)>> {
        if bytes.len() < RECORD_PREFIX_SIZE {
            return Ok(None);
        }
        let len = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize;
        let end = RECORD_PREFIX_SIZE + len;
        if bytes.len() < end {
            return Ok(None);
        }
        let value = Self::decode(&bytes[RECORD_PREFIX_SIZE..end])?;
        Ok(Some((value, end)))
    }
}
