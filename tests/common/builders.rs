//! Test builders: ergonomic constructors for payloads.
//!
//! These builders are designed for readability in test assertions, not for
//! production use.

use chanlog_core::RawMessage;
use serde_json::{Map, Value};

/// Fluent builder for record payloads.
///
/// # Example
///
/// ```rust
/// let raw = PayloadBuilder::new()
///     .service("auth")
///     .level("ERROR")
///     .legacy()
///     .enveloped()
///     .build();
/// ```
#[derive(Default)]
pub struct PayloadBuilder {
    service: Option<String>,
    instance: Option<String>,
    level: Option<String>,
    message: Option<String>,
    legacy: bool,
    enveloped: bool,
    as_text: bool,
}

impl PayloadBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn service(mut self, v: impl Into<String>) -> Self {
        self.service = Some(v.into());
        self
    }

    pub fn instance(mut self, v: impl Into<String>) -> Self {
        self.instance = Some(v.into());
        self
    }

    pub fn level(mut self, v: impl Into<String>) -> Self {
        self.level = Some(v.into());
        self
    }

    pub fn message(mut self, v: impl Into<String>) -> Self {
        self.message = Some(v.into());
        self
    }

    /// Use `c1`/`c2`/`i1`/`t1` instead of the current key names.
    pub fn legacy(mut self) -> Self {
        self.legacy = true;
        self
    }

    /// Wrap the record in a `{"data": ...}` envelope.
    pub fn enveloped(mut self) -> Self {
        self.enveloped = true;
        self
    }

    /// Deliver the whole payload as JSON text.
    pub fn as_text(mut self) -> Self {
        self.as_text = true;
        self
    }

    pub fn record(&self) -> Map<String, Value> {
        let keys = if self.legacy {
            ["c1", "c2", "i1", "t1"]
        } else {
            ["service", "instance", "level", "message"]
        };
        let values = [&self.service, &self.instance, &self.level, &self.message];
        keys.iter()
            .zip(values)
            .filter_map(|(k, v)| v.as_ref().map(|v| (k.to_string(), Value::String(v.clone()))))
            .collect()
    }

    pub fn build(self) -> RawMessage {
        let mut value = Value::Object(self.record());
        if self.enveloped {
            value = serde_json::json!({ "data": value });
        }
        if self.as_text {
            RawMessage::Text(value.to_string())
        } else {
            RawMessage::from_value(value)
        }
    }
}
