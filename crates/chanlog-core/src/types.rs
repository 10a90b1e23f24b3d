//! Core types for chanlog-core.
//!
//! This module defines the data structures shared between feeds, the
//! normalizer and the renderer: the inbound [`RawMessage`] as handed over by a
//! transport, the derived [`LogRecord`], and the [`RenderResult`] the
//! normalizer produces for display.

use serde_json::{Map, Value};

pub const DEFAULT_FIELD: &str = "?";
pub const DEFAULT_TEXT: &str = "(no message)";

/// A payload as delivered by the transport, tagged by shape.
///
/// Feeds build this at the boundary from a decoded JSON value (see
/// [`RawMessage::from_value`]) so the normalizer branches on the tag instead of
/// inspecting types at runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum RawMessage {
    /// A keyed mapping (JSON object).
    Mapping(Map<String, Value>),
    /// A text payload, possibly JSON-encoded.
    Text(String),
    /// Anything else: numbers, arrays, booleans, null.
    Other(Value),
}

impl RawMessage {
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => RawMessage::Mapping(map),
            Value::String(text) => RawMessage::Text(text),
            other => RawMessage::Other(other),
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            RawMessage::Mapping(map) => Value::Object(map),
            RawMessage::Text(text) => Value::String(text),
            RawMessage::Other(value) => value,
        }
    }
}

impl From<Value> for RawMessage {
    fn from(value: Value) -> Self {
        Self::from_value(value)
    }
}

impl From<&str> for RawMessage {
    fn from(text: &str) -> Self {
        RawMessage::Text(text.to_string())
    }
}

/// One message as handed over by a feed: the payload plus the channel it
/// arrived on and the publisher-assigned event name, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundMessage {
    pub channel: String,
    pub name: Option<String>,
    pub payload: RawMessage,
}

impl InboundMessage {
    pub fn new(channel: impl Into<String>, payload: impl Into<RawMessage>) -> Self {
        Self {
            channel: channel.into(),
            name: None,
            payload: payload.into(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// A structured log record extracted from a payload. Created and discarded
/// per message.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct LogRecord {
    pub service: String,
    pub instance: String,
    pub level: String,
    pub text: String,
}

impl Default for LogRecord {
    fn default() -> Self {
        Self {
            service: DEFAULT_FIELD.to_string(),
            instance: DEFAULT_FIELD.to_string(),
            level: DEFAULT_FIELD.to_string(),
            text: DEFAULT_TEXT.to_string(),
        }
    }
}

/// Outcome of normalising one payload.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderResult {
    StructuredRecord(LogRecord),
    /// A string payload that was not valid JSON, verbatim.
    PlainText(String),
    /// A payload that is neither a mapping nor text after unwrapping/decoding.
    Unrecognized(Value),
}

impl RenderResult {
    /// Short label used in debug logs.
    pub fn kind(&self) -> &'static str {
        match self {
            RenderResult::StructuredRecord(_) => "structured",
            RenderResult::PlainText(_) => "plain",
            RenderResult::Unrecognized(_) => "unrecognized",
        }
    }
}
