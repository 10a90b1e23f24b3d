//! Ably realtime feed.
//!
//! A deliberately small client: one websocket, key authentication, a single
//! attached channel. It does not reconnect or resume; when the service drops
//! the connection the feed ends and the listener exits.

use std::collections::VecDeque;

use async_trait::async_trait;
use chanlog_core::config::Config;
use chanlog_core::{ConfigError, InboundMessage};
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use url::Url;

use crate::error::FeedError;
use crate::protocol::{inbound_messages, Action, ProtocolMessage};
use crate::ChannelFeed;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Connection settings for [`AblyFeed::connect`].
#[derive(Clone)]
pub struct AblyOptions {
    pub endpoint: String,
    pub api_key: String,
    pub channel: String,
    pub protocol_version: String,
}

impl std::fmt::Debug for AblyOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AblyOptions")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .field("channel", &self.channel)
            .field("protocol_version", &self.protocol_version)
            .finish()
    }
}

impl AblyOptions {
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            endpoint: config.ably.endpoint.clone(),
            api_key: config.api_key()?.to_string(),
            channel: config.ably.channel.clone(),
            protocol_version: config.ably.protocol_version.clone(),
        })
    }

    /// Websocket URL carrying the key and protocol parameters.
    pub fn connection_url(&self) -> Result<Url, FeedError> {
        let mut url = Url::parse(&self.endpoint)?;
        url.query_pairs_mut()
            .append_pair("key", &self.api_key)
            .append_pair("format", "json")
            .append_pair("heartbeats", "true")
            .append_pair("v", &self.protocol_version);
        Ok(url)
    }
}

/// A connected, attached Ably channel.
pub struct AblyFeed {
    ws: WsStream,
    channel: String,
    pending: VecDeque<InboundMessage>,
    ended: bool,
    closed: bool,
}

impl AblyFeed {
    /// Open the websocket, wait for `CONNECTED`, then attach to the channel
    /// and wait for `ATTACHED`.
    ///
    /// A failed handshake still releases the websocket before returning.
    pub async fn connect(options: AblyOptions) -> Result<Self, FeedError> {
        let url = options.connection_url()?;
        install_crypto_provider();
        tracing::debug!(endpoint = %options.endpoint, "opening Ably websocket");
        let (ws, _) = tokio_tungstenite::connect_async(url.as_str()).await?;

        let mut feed = Self {
            ws,
            channel: options.channel,
            pending: VecDeque::new(),
            ended: false,
            closed: false,
        };

        if let Err(err) = feed.handshake().await {
            tracing::warn!(error = %err, "Ably handshake failed");
            feed.close().await;
            return Err(err);
        }
        tracing::info!(channel = %feed.channel, "listening on Ably channel");

        Ok(feed)
    }

    async fn handshake(&mut self) -> Result<(), FeedError> {
        let connected = self.await_connected().await?;
        tracing::info!(connection_id = ?connected.connection_id, "connected to Ably");

        let attach = ProtocolMessage::attach(&self.channel);
        self.send(&attach).await?;
        self.await_attached().await
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    async fn await_connected(&mut self) -> Result<ProtocolMessage, FeedError> {
        loop {
            let frame = self.expect_frame("CONNECTED").await?;
            match frame.action() {
                Action::Connected => return Ok(frame),
                Action::Error | Action::Disconnected | Action::Closed => {
                    return Err(rejected(&frame));
                }
                other => tracing::trace!(?other, "ignoring frame before CONNECTED"),
            }
        }
    }

    async fn await_attached(&mut self) -> Result<(), FeedError> {
        loop {
            let frame = self.expect_frame("ATTACHED").await?;
            match frame.action() {
                Action::Attached if frame.concerns(&self.channel) => return Ok(()),
                Action::Error | Action::Detached if frame.concerns(&self.channel) => {
                    return Err(rejected(&frame));
                }
                Action::Disconnected | Action::Closed => return Err(rejected(&frame)),
                Action::Message => self.pending.extend(inbound_messages(frame, &self.channel)),
                other => tracing::trace!(?other, "ignoring frame before ATTACHED"),
            }
        }
    }

    async fn expect_frame(&mut self, waiting_for: &str) -> Result<ProtocolMessage, FeedError> {
        self.read_frame().await?.ok_or_else(|| {
            FeedError::Protocol(format!("connection closed while waiting for {waiting_for}"))
        })
    }

    /// Next protocol frame, or `None` once the websocket has closed.
    async fn read_frame(&mut self) -> Result<Option<ProtocolMessage>, FeedError> {
        while let Some(frame) = self.ws.next().await {
            match frame? {
                Message::Text(text) => return Ok(Some(serde_json::from_str(text.as_str())?)),
                Message::Close(reason) => {
                    tracing::debug!(?reason, "Ably websocket closed by server");
                    return Ok(None);
                }
                _ => continue,
            }
        }
        Ok(None)
    }

    async fn send(&mut self, msg: &ProtocolMessage) -> Result<(), FeedError> {
        let json = serde_json::to_string(msg)?;
        self.ws.send(Message::Text(json.into())).await?;
        Ok(())
    }
}

/// Install ring as the process-wide rustls provider used by `wss://`
/// handshakes. A provider installed earlier is kept.
fn install_crypto_provider() {
    let _ = rustls::crypto::ring::default_provider().install_default();
}

fn rejected(frame: &ProtocolMessage) -> FeedError {
    let (code, message) = frame.error_details();
    FeedError::Rejected { code, message }
}

#[async_trait]
impl ChannelFeed for AblyFeed {
    async fn next_message(&mut self) -> Result<Option<InboundMessage>, FeedError> {
        loop {
            if let Some(msg) = self.pending.pop_front() {
                return Ok(Some(msg));
            }
            if self.ended {
                return Ok(None);
            }

            let Some(frame) = self.read_frame().await? else {
                self.ended = true;
                return Ok(None);
            };

            match frame.action() {
                Action::Message => self.pending.extend(inbound_messages(frame, &self.channel)),
                Action::Heartbeat => tracing::trace!("Ably heartbeat"),
                Action::Error if frame.concerns(&self.channel) => {
                    self.ended = true;
                    return Err(rejected(&frame));
                }
                Action::Detached if frame.concerns(&self.channel) => {
                    tracing::warn!(channel = %self.channel, "channel detached by service");
                    self.ended = true;
                }
                Action::Disconnected | Action::Closed => {
                    tracing::warn!(action = ?frame.action(), "Ably connection ended");
                    self.ended = true;
                }
                other => tracing::trace!(?other, "ignoring frame"),
            }
        }
    }

    async fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Err(err) = self.send(&ProtocolMessage::close()).await {
            tracing::debug!(error = %err, "failed to send CLOSE");
        }
        if let Err(err) = self.ws.close(None).await {
            tracing::debug!(error = %err, "failed to close Ably websocket");
        }
    }
}
