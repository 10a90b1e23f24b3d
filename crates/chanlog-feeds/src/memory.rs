//! In-process feed backed by a tokio channel.
//!
//! [`memory_feed`] returns a linked publisher/feed pair. Dropping the
//! publisher ends the feed; [`MemoryPublisher::fail`] injects a feed error.
//! The feed counts how many times it was closed so callers can check the
//! connection is released exactly once.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chanlog_core::{InboundMessage, RawMessage};
use tokio::sync::mpsc;

use crate::error::FeedError;
use crate::ChannelFeed;

type Item = Result<InboundMessage, FeedError>;

/// Handle for pushing messages into a [`MemoryFeed`].
pub struct MemoryPublisher {
    tx: mpsc::UnboundedSender<Item>,
    channel: String,
}

impl MemoryPublisher {
    pub fn publish(&self, payload: impl Into<RawMessage>) {
        self.send(Ok(InboundMessage::new(self.channel.clone(), payload)));
    }

    pub fn publish_named(&self, name: &str, payload: impl Into<RawMessage>) {
        self.send(Ok(InboundMessage::new(self.channel.clone(), payload).with_name(name)));
    }

    /// Deliver `err` to the feed's consumer.
    pub fn fail(&self, err: FeedError) {
        self.send(Err(err));
    }

    /// End the feed once queued messages are drained.
    pub fn close(self) {}

    fn send(&self, item: Item) {
        if self.tx.send(item).is_err() {
            tracing::debug!(channel = %self.channel, "memory feed dropped; message discarded");
        }
    }
}

pub struct MemoryFeed {
    rx: mpsc::UnboundedReceiver<Item>,
    closes: Arc<AtomicUsize>,
}

impl MemoryFeed {
    /// Shared counter of [`ChannelFeed::close`] calls, readable after the
    /// feed itself has been consumed.
    pub fn close_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.closes)
    }
}

/// Create a linked publisher/feed pair for `channel`.
pub fn memory_feed(channel: impl Into<String>) -> (MemoryPublisher, MemoryFeed) {
    let (tx, rx) = mpsc::unbounded_channel();
    (
        MemoryPublisher {
            tx,
            channel: channel.into(),
        },
        MemoryFeed {
            rx,
            closes: Arc::new(AtomicUsize::new(0)),
        },
    )
}

#[async_trait]
impl ChannelFeed for MemoryFeed {
    async fn next_message(&mut self) -> Result<Option<InboundMessage>, FeedError> {
        self.rx.recv().await.transpose()
    }

    async fn close(&mut self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
        self.rx.close();
    }
}
