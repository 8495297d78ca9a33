//! Sinks writing to a `std::io::Write` (stdout, files, buffers).

use std::io::Write;

use crate::codec::{JsonCodec, MsgPackCodec};
use crate::error::Result;
use crate::protocol::{CandidateFrame, DecodedMessage, HexBytes, Rejection};

use super::Sink;

/// Human-readable sink: one line per message, one per rejected frame.
pub struct TextSink<W: Write> {
    writer: W,
    report_rejections: bool,
}

impl<W: Write> TextSink<W> {
    /// Text sink that also reports rejected frames.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            report_rejections: true,
        }
    }

    /// Toggle the "Rejected ..." lines.
    pub fn report_rejections(mut self, enabled: bool) -> Self {
        self.report_rejections = enabled;
        self
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Sink for TextSink<W> {
    fn on_message(&mut self, message: DecodedMessage) -> Result<()> {
        writeln!(self.writer, "{}", message)?;
        self.writer.flush()?;
        Ok(())
    }

    fn on_rejected(&mut self, frame: &CandidateFrame, reason: &Rejection) -> Result<()> {
        if self.report_rejections {
            writeln!(
                self.writer,
                "Rejected ({}): {}",
                reason,
                HexBytes(frame.as_bytes())
            )?;
            self.writer.flush()?;
        }
        Ok(())
    }
}

/// JSON lines sink: one object per decoded message. Rejections are not written.
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Sink for JsonLinesSink<W> {
    fn on_message(&mut self, message: DecodedMessage) -> Result<()> {
        let line = JsonCodec::encode_line(&message)?;
        self.writer.write_all(&line)?;
        self.writer.flush()?;
        Ok(())
    }
}

/// MessagePack sink: one length-prefixed record per decoded message.
pub struct MsgPackSink<W: Write> {
    writer: W,
}

impl<W: Write> MsgPackSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Sink for MsgPackSink<W> {
    fn on_message(&mut self, message: DecodedMessage) -> Result<()> {
        let record = MsgPackCodec::encode_record(&message)?;
        self.writer.write_all(&record)?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModbusTapError;

    fn request() -> DecodedMessage {
        DecodedMessage::Request {
            unit_id: 1,
            function_code: 3,
            start_address: 0,
            register_count: 10,
        }
    }

    fn rejected_frame() -> (CandidateFrame, Rejection) {
        let frame = CandidateFrame::from_slice(&[0x01, 0x03, 0x00, 0x00, 0x00, 0x0A, 0x00, 0x00]);
        let reason = frame.validate().unwrap_err();
        (frame, reason)
    }

    #[test]
    fn test_text_sink_lines() {
        let mut sink = TextSink::new(Vec::new());
        sink.on_message(request()).unwrap();
        let (frame, reason) = rejected_frame();
        sink.on_rejected(&frame, &reason).unwrap();

        let out = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "Request unit=1 function=3 start_address=0 register_count=10"
        );
        assert!(lines[1].starts_with("Rejected (CRC mismatch"));
        assert!(lines[1].ends_with("01 03 00 00 00 0A 00 00"));
    }

    #[test]
    fn test_text_sink_quiet_rejections() {
        let mut sink = TextSink::new(Vec::new()).report_rejections(false);
        let (frame, reason) = rejected_frame();
        sink.on_rejected(&frame, &reason).unwrap();
        assert!(sink.into_inner().is_empty());
    }

    #[test]
    fn test_json_lines_sink() {
        let mut sink = JsonLinesSink::new(Vec::new());
        sink.on_message(request()).unwrap();
        sink.on_message(DecodedMessage::Unsupported { function_code: 4 })
            .unwrap();

        let out = String::from_utf8(sink.into_inner()).unwrap();
        let values: Vec<serde_json::Value> = out
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(values.len(), 2);
        assert_eq!(values[0]["kind"], "request");
        assert_eq!(values[1]["function_code"], 4);
    }

    #[test]
    fn test_msgpack_sink_records() {
        let mut sink = MsgPackSink::new(Vec::new());
        sink.on_message(request()).unwrap();

        let out = sink.into_inner();
        let (decoded, used): (DecodedMessage, usize) =
            MsgPackCodec::decode_record(&out).unwrap().unwrap();
        assert_eq!(decoded, request());
        assert_eq!(used, out.len());
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_failure_surfaces() {
        let mut sink = TextSink::new(BrokenPipe);
        let err = sink.on_message(request()).unwrap_err();
        assert!(matches!(err, ModbusTapError::Io(_)));
    }
}
