//! The subset of Ably's JSON realtime protocol chanlog speaks.
//!
//! Every websocket text frame is one [`ProtocolMessage`] identified by its
//! numeric `action`. Channel messages arrive in batches inside `MESSAGE`
//! frames; each carries its `data` plus an `encoding` describing the
//! transformations applied by the publisher, which [`decode_data`] undoes.

use base64::Engine;
use chanlog_core::{InboundMessage, RawMessage};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Heartbeat,
    Ack,
    Nack,
    Connect,
    Connected,
    Disconnect,
    Disconnected,
    Close,
    Closed,
    Error,
    Attach,
    Attached,
    Detach,
    Detached,
    Presence,
    Message,
    Sync,
    Auth,
    Unknown(u8),
}

impl From<u8> for Action {
    fn from(code: u8) -> Self {
        match code {
            0 => Action::Heartbeat,
            1 => Action::Ack,
            2 => Action::Nack,
            3 => Action::Connect,
            4 => Action::Connected,
            5 => Action::Disconnect,
            6 => Action::Disconnected,
            7 => Action::Close,
            8 => Action::Closed,
            9 => Action::Error,
            10 => Action::Attach,
            11 => Action::Attached,
            12 => Action::Detach,
            13 => Action::Detached,
            14 => Action::Presence,
            15 => Action::Message,
            16 => Action::Sync,
            17 => Action::Auth,
            other => Action::Unknown(other),
        }
    }
}

impl From<Action> for u8 {
    fn from(action: Action) -> Self {
        match action {
            Action::Heartbeat => 0,
            Action::Ack => 1,
            Action::Nack => 2,
            Action::Connect => 3,
            Action::Connected => 4,
            Action::Disconnect => 5,
            Action::Disconnected => 6,
            Action::Close => 7,
            Action::Closed => 8,
            Action::Error => 9,
            Action::Attach => 10,
            Action::Attached => 11,
            Action::Detach => 12,
            Action::Detached => 13,
            Action::Presence => 14,
            Action::Message => 15,
            Action::Sync => 16,
            Action::Auth => 17,
            Action::Unknown(code) => code,
        }
    }
}

/// One protocol frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolMessage {
    pub action: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messages: Option<Vec<WireMessage>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

/// A channel message as it appears on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorInfo {
    #[serde(default)]
    pub code: Option<u32>,
    #[serde(default)]
    pub status_code: Option<u16>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ProtocolMessage {
    pub fn new(action: Action) -> Self {
        Self {
            action: action.into(),
            ..Default::default()
        }
    }

    pub fn attach(channel: &str) -> Self {
        Self {
            channel: Some(channel.to_string()),
            ..Self::new(Action::Attach)
        }
    }

    pub fn close() -> Self {
        Self::new(Action::Close)
    }

    pub fn action(&self) -> Action {
        Action::from(self.action)
    }

    /// Whether this frame concerns `channel`. Connection-level frames carry
    /// no channel and concern every channel.
    pub fn concerns(&self, channel: &str) -> bool {
        self.channel.as_deref().map_or(true, |c| c == channel)
    }

    /// `(code, message)` of the attached error, with placeholders when absent.
    pub fn error_details(&self) -> (u32, String) {
        let info = self.error.clone().unwrap_or_default();
        (
            info.code.unwrap_or(0),
            info.message
                .unwrap_or_else(|| format!("{:?} without error details", self.action())),
        )
    }
}

/// Split a `MESSAGE` frame into inbound messages for `channel`, decoding each
/// payload. Frames for other channels yield nothing.
pub fn inbound_messages(frame: ProtocolMessage, channel: &str) -> Vec<InboundMessage> {
    if frame.action() != Action::Message || frame.channel.as_deref() != Some(channel) {
        return Vec::new();
    }
    frame
        .messages
        .unwrap_or_default()
        .into_iter()
        .map(|msg| InboundMessage {
            channel: channel.to_string(),
            name: msg.name,
            payload: decode_data(msg.data.unwrap_or(Value::Null), msg.encoding.as_deref()),
        })
        .collect()
}

enum Payload {
    Value(Value),
    Bytes(Vec<u8>),
}

/// Undo a message `encoding` such as `json/utf-8/base64`, last step first.
///
/// Decoding stops at the first step that is unknown or does not apply; the
/// payload is delivered as decoded so far. Binary payloads become
/// [`RawMessage::Other`] holding the byte values.
pub fn decode_data(data: Value, encoding: Option<&str>) -> RawMessage {
    let mut payload = Payload::Value(data);

    if let Some(encoding) = encoding.filter(|e| !e.is_empty()) {
        for step in encoding.rsplit('/') {
            match apply_step(step, payload) {
                Ok(decoded) => payload = decoded,
                Err(unchanged) => {
                    tracing::warn!(step, encoding, "message data left partially decoded");
                    payload = unchanged;
                    break;
                }
            }
        }
    }

    match payload {
        Payload::Value(value) => RawMessage::from_value(value),
        Payload::Bytes(bytes) => match String::from_utf8(bytes) {
            Ok(text) => RawMessage::Text(text),
            Err(err) => RawMessage::Other(Value::Array(
                err.into_bytes().into_iter().map(Value::from).collect(),
            )),
        },
    }
}

/// Undo one encoding step. `Err` hands the payload back untouched when the
/// step is unknown or does not apply to it.
fn apply_step(step: &str, payload: Payload) -> Result<Payload, Payload> {
    match (step, payload) {
        ("json", Payload::Value(Value::String(text))) => serde_json::from_str::<Value>(&text)
            .map(Payload::Value)
            .map_err(|_| Payload::Value(Value::String(text))),
        ("json", Payload::Bytes(bytes)) => serde_json::from_slice::<Value>(&bytes)
            .map(Payload::Value)
            .map_err(|_| Payload::Bytes(bytes)),
        ("base64", Payload::Value(Value::String(text))) => {
            base64::engine::general_purpose::STANDARD
                .decode(text.as_bytes())
                .map(Payload::Bytes)
                .map_err(|_| Payload::Value(Value::String(text)))
        }
        ("utf-8", Payload::Bytes(bytes)) => String::from_utf8(bytes)
            .map(|text| Payload::Value(Value::String(text)))
            .map_err(|err| Payload::Bytes(err.into_bytes())),
        ("utf-8", payload @ Payload::Value(Value::String(_))) => Ok(payload),
        (_, payload) => Err(payload),
    }
}
