//! Domain-specific assertion macros for chanlog harnesses.
//!
//! These add context-rich failure messages that make it clear which shape
//! the normalizer produced when it was not the expected one.

/// Assert that a `RenderResult` is a structured record with the given fields.
///
/// ```rust
/// assert_structured!(result, "auth", "node-3", "ERROR", "disk full");
/// ```
#[macro_export]
macro_rules! assert_structured {
    ($result:expr, $service:expr, $instance:expr, $level:expr, $text:expr) => {{
        match &$result {
            chanlog_core::RenderResult::StructuredRecord(record) => {
                pretty_assertions::assert_eq!(
                    record,
                    &chanlog_core::LogRecord {
                        service: $service.to_string(),
                        instance: $instance.to_string(),
                        level: $level.to_string(),
                        text: $text.to_string(),
                    }
                );
            }
            other => panic!("assert_structured! failed: got {:?}", other),
        }
    }};
}

/// Assert that a `RenderResult` is plain text equal to `$text`.
#[macro_export]
macro_rules! assert_plain {
    ($result:expr, $text:expr) => {{
        match &$result {
            chanlog_core::RenderResult::PlainText(actual) if actual == $text => {}
            other => panic!(
                "assert_plain! failed:\n  expected: PlainText({:?})\n  actual:   {:?}",
                $text, other
            ),
        }
    }};
}

/// Assert that a `RenderResult` is unrecognized and carries `$value`.
#[macro_export]
macro_rules! assert_unrecognized {
    ($result:expr, $value:expr) => {{
        let expected: serde_json::Value = $value;
        match &$result {
            chanlog_core::RenderResult::Unrecognized(actual) if *actual == expected => {}
            other => panic!(
                "assert_unrecognized! failed:\n  expected: Unrecognized({})\n  actual:   {:?}",
                expected, other
            ),
        }
    }};
}
