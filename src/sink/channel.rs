//! Sink forwarding decoded messages to a tokio channel.
//!
//! The channel is unbounded: the pump never waits on a slow consumer. Memory
//! grows with the backlog if the receiver falls behind.

use tokio::sync::mpsc;

use crate::error::{ModbusTapError, Result};
use crate::protocol::DecodedMessage;

use super::Sink;

/// Forwards each message to an unbounded channel.
#[derive(Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<DecodedMessage>,
}

impl ChannelSink {
    /// Create a sink and the receiver for its messages.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<DecodedMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Wrap an existing sender.
    pub fn from_sender(tx: mpsc::UnboundedSender<DecodedMessage>) -> Self {
        Self { tx }
    }
}

impl Sink for ChannelSink {
    fn on_message(&mut self, message: DecodedMessage) -> Result<()> {
        self.tx
            .send(message)
            .map_err(|_| ModbusTapError::SinkClosed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_forwards_in_order() {
        let (mut sink, mut rx) = ChannelSink::new();
        sink.on_message(DecodedMessage::Unsupported { function_code: 1 })
            .unwrap();
        sink.on_message(DecodedMessage::Unsupported { function_code: 2 })
            .unwrap();

        assert_eq!(rx.recv().await.unwrap().function_code(), 1);
        assert_eq!(rx.recv().await.unwrap().function_code(), 2);
    }

    #[tokio::test]
    async fn test_shared_sender() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut first = ChannelSink::from_sender(tx.clone());
        let mut second = ChannelSink::from_sender(tx);

        first
            .on_message(DecodedMessage::Unsupported { function_code: 7 })
            .unwrap();
        second
            .on_message(DecodedMessage::Unsupported { function_code: 8 })
            .unwrap();
        drop((first, second));

        assert_eq!(rx.recv().await.unwrap().function_code(), 7);
        assert_eq!(rx.recv().await.unwrap().function_code(), 8);
        assert!(rx.recv().await.is_none());
    }

    #[test]
    fn test_closed_receiver() {
        let (mut sink, rx) = ChannelSink::new();
        drop(rx);

        let err = sink
            .on_message(DecodedMessage::Unsupported { function_code: 1 })
            .unwrap_err();
        assert!(matches!(err, ModbusTapError::SinkClosed));
    }
}
