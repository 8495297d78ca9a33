//! Codec module - serialization of decoded messages for structured sinks.
//!
//! - [`JsonCodec`] - one JSON object per line via `serde_json`
//! - [`MsgPackCodec`] - MessagePack via `rmp-serde` (`to_vec_named`), with
//!   length-prefixed records for byte streams
//!
//! # Design
//!
//! Codecs are marker structs with static methods rather than trait objects,
//! so the sinks pick their encoding at compile time.
//!
//! # Example
//!
//! ```
//! use modbus_tap::codec::{JsonCodec, MsgPackCodec};
//! use modbus_tap::protocol::DecodedMessage;
//!
//! let message = DecodedMessage::Unsupported { function_code: 4 };
//!
//! let line = JsonCodec::encode_line(&message).unwrap();
//! assert!(line.ends_with(b"\n"));
//!
//! let packed = MsgPackCodec::encode(&message).unwrap();
//! let decoded: DecodedMessage = MsgPackCodec::decode(&packed).unwrap();
//! assert_eq!(decoded, message);
//! ```

mod json;
mod msgpack;

pub use json::JsonCodec;
pub use msgpack::{MsgPackCodec, RECORD_PREFIX_SIZE};
