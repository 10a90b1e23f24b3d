//! Line-oriented feed: one payload per line, read from stdin or any async reader.
//!
//! Useful for replaying captured channel traffic and for piping a local
//! publisher straight into chanlog without a realtime service.

use async_trait::async_trait;
use chanlog_core::{InboundMessage, RawMessage};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader, Lines};

use crate::error::FeedError;
use crate::ChannelFeed;

pub const STDIN_CHANNEL: &str = "stdin";

pub struct StdinFeed<R = tokio::io::Stdin> {
    lines: Lines<BufReader<R>>,
    channel: String,
}

impl StdinFeed {
    pub fn new() -> Self {
        Self::from_reader(tokio::io::stdin())
    }
}

impl Default for StdinFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: AsyncRead + Unpin + Send> StdinFeed<R> {
    pub fn from_reader(reader: R) -> Self {
        Self {
            lines: BufReader::new(reader).lines(),
            channel: STDIN_CHANNEL.to_string(),
        }
    }
}

/// A line that is valid JSON is delivered as that value; anything else as
/// text, leaving the verdict to the normalizer.
pub fn parse_line(line: String) -> RawMessage {
    match serde_json::from_str::<serde_json::Value>(&line) {
        Ok(value) => RawMessage::from_value(value),
        Err(_) => RawMessage::Text(line),
    }
}

#[async_trait]
impl<R: AsyncRead + Unpin + Send> ChannelFeed for StdinFeed<R> {
    async fn next_message(&mut self) -> Result<Option<InboundMessage>, FeedError> {
        while let Some(line) = self.lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            return Ok(Some(InboundMessage::new(self.channel.clone(), parse_line(line))));
        }
        Ok(None)
    }

    async fn close(&mut self) {
        tracing::debug!(channel = %self.channel, "line feed closed");
    }
}
