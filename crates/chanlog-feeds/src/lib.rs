//! chanlog-feeds: channel feed adapters for chanlog.
//!
//! Each feed delivers [`InboundMessage`] values one at a time until it ends.
//! The transport behind a feed owns delivery; feeds never retry or reconnect.

pub mod ably;
pub mod error;
pub mod memory;
pub mod protocol;
pub mod stdin;

use async_trait::async_trait;
use chanlog_core::InboundMessage;

pub use ably::{AblyFeed, AblyOptions};
pub use error::FeedError;
pub use memory::{memory_feed, MemoryFeed, MemoryPublisher};
pub use stdin::StdinFeed;

/// Trait implemented by each channel feed.
///
/// `next_message` must be cancel-safe: the listener races it against its
/// keep-alive timer and the shutdown signal, and drops it when either wins.
#[async_trait]
pub trait ChannelFeed: Send {
    /// Wait for the next message. `Ok(None)` means the feed has ended.
    async fn next_message(&mut self) -> Result<Option<InboundMessage>, FeedError>;

    /// Release the underlying connection. Failures are logged, not returned.
    async fn close(&mut self);
}

#[async_trait]
impl<F: ChannelFeed + ?Sized> ChannelFeed for Box<F> {
    async fn next_message(&mut self) -> Result<Option<InboundMessage>, FeedError> {
        (**self).next_message().await
    }

    async fn close(&mut self) {
        (**self).close().await
    }
}
