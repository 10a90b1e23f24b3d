//! chanlog-core: payload normalization and rendering for chanlog.
//!
//! Feeds hand over [`InboundMessage`] values; the [`normalizer`] reduces each
//! payload to a [`RenderResult`] and the [`render`] module writes it to a
//! console sink.
//!
//! ```text
//! Feed ──► InboundMessage ──► normalize ──► RenderResult ──► render ──► stdout
//! ```
//!
//! Nothing here keeps state between messages.

pub mod config;
pub mod error;
pub mod normalizer;
pub mod render;
pub mod types;

pub use error::ConfigError;
pub use normalizer::normalize;
pub use types::{InboundMessage, LogRecord, RawMessage, RenderResult};
