//! Listener: the long-running loop between a feed and the console.
//!
//! [`listen`] renders every message the feed delivers, emits a keep-alive
//! status line once per interval, and stops on the shutdown signal or when
//! the feed ends. Whatever stops the loop, including a feed or output error,
//! the feed is closed exactly once before `listen` returns.

use std::future::Future;
use std::io::{self, Write};
use std::time::Duration;

use chanlog_core::render::render;
use chanlog_feeds::{ChannelFeed, FeedError};
use thiserror::Error;
use tokio::time::MissedTickBehavior;

#[derive(Debug, Error)]
pub enum ListenError {
    #[error("feed failed: {0}")]
    Feed(#[from] FeedError),

    #[error("failed to write output: {0}")]
    Sink(#[from] io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The shutdown future completed.
    Interrupted,
    /// The feed reported that no more messages will arrive.
    FeedEnded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenSummary {
    pub messages: u64,
    pub ticks: u64,
    pub reason: StopReason,
}

/// Run until `shutdown` completes or the feed ends, then close the feed.
pub async fn listen<F, W, S>(
    mut feed: F,
    sink: &mut W,
    keepalive: Duration,
    shutdown: S,
) -> Result<ListenSummary, ListenError>
where
    F: ChannelFeed,
    W: Write,
    S: Future<Output = ()>,
{
    let outcome = run_loop(&mut feed, sink, keepalive, shutdown).await;
    feed.close().await;
    tracing::info!("connection closed");
    outcome
}

async fn run_loop<F, W, S>(
    feed: &mut F,
    sink: &mut W,
    keepalive: Duration,
    shutdown: S,
) -> Result<ListenSummary, ListenError>
where
    F: ChannelFeed,
    W: Write,
    S: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    let mut ticker = tokio::time::interval(keepalive);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately.
    ticker.tick().await;

    let mut messages = 0u64;
    let mut ticks = 0u64;

    let reason = loop {
        tokio::select! {
            _ = &mut shutdown => break StopReason::Interrupted,
            _ = ticker.tick() => {
                ticks += 1;
                tracing::info!("Alive check: loop {ticks}");
            }
            next = feed.next_message() => match next? {
                Some(msg) => {
                    let result = render(msg, sink)?;
                    sink.flush()?;
                    messages += 1;
                    tracing::debug!(kind = result.kind(), messages, "rendered message");
                }
                None => break StopReason::FeedEnded,
            },
        }
    };

    Ok(ListenSummary {
        messages,
        ticks,
        reason,
    })
}
