//! Console rendering of normalised messages.
//!
//! Every inbound message becomes one block: a blank line, a header naming the
//! channel and event name, then the body for its [`RenderResult`]. Structured
//! records are framed by [`SEPARATOR`] lines with one labelled line per field.

use std::io::{self, Write};

use crate::normalizer::normalize;
use crate::types::{InboundMessage, LogRecord, RenderResult};

pub const SEPARATOR: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━";

/// Normalise `msg` and write its block to `sink`.
pub fn render<W: Write>(msg: InboundMessage, sink: &mut W) -> io::Result<RenderResult> {
    writeln!(sink)?;
    render_header(&msg, sink)?;
    let result = normalize(msg.payload);
    render_result(&result, sink)?;
    Ok(result)
}

pub fn render_header<W: Write>(msg: &InboundMessage, sink: &mut W) -> io::Result<()> {
    writeln!(
        sink,
        "Received message on channel '{}' name='{}'",
        msg.channel,
        msg.name.as_deref().unwrap_or("None")
    )
}

pub fn render_result<W: Write>(result: &RenderResult, sink: &mut W) -> io::Result<()> {
    match result {
        RenderResult::StructuredRecord(record) => render_record(record, sink),
        RenderResult::PlainText(text) => writeln!(sink, "Plain text: {text}"),
        RenderResult::Unrecognized(value) => writeln!(sink, "Unknown data format: {value}"),
    }
}

fn render_record<W: Write>(record: &LogRecord, sink: &mut W) -> io::Result<()> {
    writeln!(sink, "{SEPARATOR}")?;
    writeln!(sink, "Service:   {}", record.service)?;
    writeln!(sink, "Instance:  {}", record.instance)?;
    writeln!(sink, "Level:     {}", record.level)?;
    writeln!(sink, "Message:   {}", record.text)?;
    writeln!(sink, "{SEPARATOR}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn rendered(msg: InboundMessage) -> String {
        let mut out = Vec::new();
        render(msg, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn plain_text_block() {
        let msg = InboundMessage::new("logs", "hello there").with_name("greeting");
        assert_eq!(
            rendered(msg),
            "\nReceived message on channel 'logs' name='greeting'\nPlain text: hello there\n"
        );
    }

    #[test]
    fn unrecognized_block_prints_compact_json() {
        let msg = InboundMessage::new("logs", json!([1, "two"]));
        assert_eq!(
            rendered(msg),
            "\nReceived message on channel 'logs' name='None'\nUnknown data format: [1,\"two\"]\n"
        );
    }

    #[test]
    fn structured_block_is_framed() {
        let out = rendered(InboundMessage::new("logs", json!({"service": "api"})));
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[2], SEPARATOR);
        assert_eq!(lines[3], "Service:   api");
        assert_eq!(lines[6], "Message:   (no message)");
        assert_eq!(lines[7], SEPARATOR);
    }
}
