//! Static payload corpora used across harnesses.
//!
//! Each corpus is a `&'static [&'static str]` of payloads as a publisher
//! would send them: JSON text in both key schemes, enveloped or bare, plus
//! the odd shapes the normalizer must degrade on.

/// Records using the legacy `c1`/`c2`/`i1`/`t1` keys inside a `data` envelope.
pub const CORPUS_LEGACY: &[&str] = &[
    r#"{"data":{"c1":"auth","c2":"node-3","i1":"ERROR","t1":"disk full"}}"#,
    r#"{"data":{"c1":"billing","c2":"worker-1","i1":"INFO","t1":"invoice 42 sent"}}"#,
    r#"{"data":{"c1":"gateway","c2":"edge-eu","i1":"WARN","t1":"slow upstream"}}"#,
];

/// Records using the current `service`/`instance`/`level`/`message` keys.
pub const CORPUS_CURRENT: &[&str] = &[
    r#"{"service":"auth","instance":"node-3","level":"ERROR","message":"disk full"}"#,
    r#"{"data":{"service":"billing","instance":"worker-1","level":"INFO","message":"invoice 42 sent"}}"#,
    r#"{"data":"{\"service\":\"gateway\",\"instance\":\"edge-eu\",\"level\":\"WARN\",\"message\":\"slow upstream\"}"}"#,
];

/// Payloads that are not JSON at all.
pub const CORPUS_PLAIN: &[&str] = &[
    "not json",
    "2024-01-15 10:00:01 ERROR Failed to connect to database",
    "{unterminated",
    "",
];

/// JSON payloads that decode to something other than a mapping.
pub const CORPUS_ODD: &[&str] = &["42", "[1,2,3]", "true", "null", r#"{"data":[1,2]}"#];

/// Decode a corpus line the way a feed hands it over: JSON lines as their
/// value, anything else as text.
pub fn payload(line: &str) -> chanlog_core::RawMessage {
    chanlog_feeds::stdin::parse_line(line.to_string())
}
