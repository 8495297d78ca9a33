//! JSON lines codec using `serde_json`.
//!
//! One compact JSON object per line, newline-terminated.

use crate::error::Result;

/// JSON lines codec.
pub struct JsonCodec;

impl JsonCodec {
    /// Encode a value as a single newline-terminated line.
    pub fn encode_line<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        let mut line = serde_json::to_vec(value)?;
        line.push(b'\n');
        Ok(line)
    }

    /// Decode one line (trailing newline optional).
    pub fn decode_line<T: serde::de::DeserializeOwned>(line: &[u8]) -> Result<T> {
        let line = line.strip_suffix(b"\n").unwrap_or(line);
        Ok(serde_json::from_slice(line)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::DecodedMessage;

    #[test]
    fn test_encode_line() {
        let message = DecodedMessage::Request {
            unit_id: 1,
            function_code: 3,
            start_address: 0,
            register_count: 10,
        };
        let line = JsonCodec::encode_line(&message).unwrap();

        assert_eq!(
            String::from_utf8(line).unwrap(),
            "{\"kind\":\"request\",\"unit_id\":1,\"function_code\":3,\"start_address\":0,\"register_count\":10}\n"
        );
    }

    #[test]
    fn test_decode_line() {
        let decoded: DecodedMessage =
            JsonCodec::decode_line(b"{\"kind\":\"unsupported\",\"function_code\":4}\n").unwrap();
        assert_eq!(decoded, DecodedMessage::Unsupported { function_code: 4 });
    }

    #[test]
    fn test_decode_line_rejects_unknown_kind() {
        let result: Result<DecodedMessage> = JsonCodec::decode_line(b"{\"kind\":\"write\"}");
        assert!(result.is_err());
    }
}
