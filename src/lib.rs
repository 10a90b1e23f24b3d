//! chanlog: print log records published on a realtime channel.
//!
//! The binary wires a [`chanlog_feeds::ChannelFeed`] to stdout through the
//! [`listener`]; normalisation and rendering live in `chanlog-core`.
//!
//! ```text
//! Feed ──► listener ──► normalize ──► render ──► stdout
//!             │
//!             └──► keep-alive tick ──► tracing
//! ```

pub mod listener;

pub use listener::{listen, ListenError, ListenSummary, StopReason};
