//! Normalizer: reduces a [`RawMessage`] of unknown shape to a [`RenderResult`].
//!
//! Steps are applied in order:
//!
//! 1. a mapping carrying a `"data"` envelope whose value is a mapping or a
//!    string is unwrapped, exactly one level;
//! 2. text is decoded as JSON, falling back to [`RenderResult::PlainText`];
//! 3. anything that is still not a mapping is [`RenderResult::Unrecognized`];
//! 4. the four record fields are read by key, current names first and the
//!    legacy aliases second, with defaults for anything missing.
//!
//! [`normalize`] never fails; malformed input degrades instead.

use serde_json::{Map, Value};

use crate::types::{LogRecord, RawMessage, RenderResult, DEFAULT_FIELD, DEFAULT_TEXT};

/// Envelope key removed by the unwrap step.
pub const ENVELOPE_KEY: &str = "data";

/// `(current key, legacy alias)` for each record field.
pub const SERVICE_KEYS: (&str, &str) = ("service", "c1");
pub const INSTANCE_KEYS: (&str, &str) = ("instance", "c2");
pub const LEVEL_KEYS: (&str, &str) = ("level", "i1");
pub const TEXT_KEYS: (&str, &str) = ("message", "t1");

/// Result of trying to decode a text payload as JSON. Consumed locally.
enum Decoded {
    Parsed(Value),
    Failed,
}

fn decode_text(text: &str) -> Decoded {
    match serde_json::from_str::<Value>(text) {
        Ok(value) => Decoded::Parsed(value),
        Err(err) => {
            tracing::debug!(error = %err, "payload text is not JSON");
            Decoded::Failed
        }
    }
}

/// Normalise one inbound payload.
pub fn normalize(raw: RawMessage) -> RenderResult {
    let raw = unwrap_envelope(raw);

    let raw = match raw {
        RawMessage::Text(text) => match decode_text(&text) {
            Decoded::Parsed(value) => RawMessage::from_value(value),
            Decoded::Failed => return RenderResult::PlainText(text),
        },
        other => other,
    };

    match raw {
        RawMessage::Mapping(map) => RenderResult::StructuredRecord(extract_record(&map)),
        other => {
            let value = other.into_value();
            tracing::debug!(payload = %value, "payload is not a mapping");
            RenderResult::Unrecognized(value)
        }
    }
}

/// Remove a single `{"data": ...}` envelope. Only mapping and string values
/// are unwrapped; the returned payload is never inspected for a second one.
pub fn unwrap_envelope(raw: RawMessage) -> RawMessage {
    let RawMessage::Mapping(mut map) = raw else {
        return raw;
    };
    match map.get(ENVELOPE_KEY) {
        Some(Value::Object(_)) | Some(Value::String(_)) => match map.remove(ENVELOPE_KEY) {
            Some(inner) => RawMessage::from_value(inner),
            None => RawMessage::Mapping(map),
        },
        _ => RawMessage::Mapping(map),
    }
}

/// Read the four record fields out of a mapping.
pub fn extract_record(map: &Map<String, Value>) -> LogRecord {
    LogRecord {
        service: field(map, SERVICE_KEYS, DEFAULT_FIELD),
        instance: field(map, INSTANCE_KEYS, DEFAULT_FIELD),
        level: field(map, LEVEL_KEYS, DEFAULT_FIELD),
        text: field(map, TEXT_KEYS, DEFAULT_TEXT),
    }
}

fn field(map: &Map<String, Value>, (current, legacy): (&str, &str), default: &str) -> String {
    map.get(current)
        .or_else(|| map.get(legacy))
        .map(coerce)
        .unwrap_or_else(|| default.to_string())
}

/// Strings verbatim; every other value as compact JSON text.
pub fn coerce(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
