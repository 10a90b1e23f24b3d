use thiserror::Error;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("failed to write default configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("no Ably API key configured (set ABLY_API_KEY or CHANLOG_ABLY__API_KEY)")]
    MissingApiKey,

    #[error("listener.keepalive_secs must be greater than zero")]
    InvalidKeepalive,
}
