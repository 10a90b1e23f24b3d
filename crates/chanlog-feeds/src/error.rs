use thiserror::Error;

/// Errors a feed can report while connecting or receiving.
#[derive(Error, Debug)]
pub enum FeedError {
    /// WebSocket protocol error (connection failed, invalid frame, etc.)
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// The server sent something we could not make sense of, or hung up at
    /// an unexpected point in the handshake.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// The service refused the connection or the channel attach.
    #[error("Rejected by service ({code}): {message}")]
    Rejected { code: u32, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed endpoint URL.
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),
}
