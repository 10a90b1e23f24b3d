//! Configuration types for chanlog.
//!
//! [`Config::load`] layers, lowest priority first: the embedded defaults,
//! `~/.config/chanlog/config.toml` (created with the defaults if it does not
//! yet exist) or an explicit file, then `CHANLOG_*` environment variables.
//! [`Config::defaults`] returns the defaults without touching the filesystem
//! (useful in tests).
//!
//! The API key is never part of the defaults. It comes from the file, from
//! `CHANLOG_ABLY__API_KEY`, or from `ABLY_API_KEY` when nothing else set it.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[ably]
endpoint         = "wss://realtime.ably.io"
channel          = "logs"
protocol_version = "2"

[listener]
keepalive_secs = 60
"#;

pub const ENV_PREFIX: &str = "CHANLOG";
pub const API_KEY_SHORTCUT: &str = "ABLY_API_KEY";

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ably: AblyConfig,
    #[serde(default)]
    pub listener: ListenerConfig,
}

/// `[ably]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct AblyConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_channel")]
    pub channel: String,
    #[serde(default = "default_protocol_version")]
    pub protocol_version: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

fn default_endpoint() -> String { "wss://realtime.ably.io".to_string() }
fn default_channel() -> String { "logs".to_string() }
fn default_protocol_version() -> String { "2".to_string() }

impl Default for AblyConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            channel: default_channel(),
            protocol_version: default_protocol_version(),
            api_key: None,
        }
    }
}

/// `[listener]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct ListenerConfig {
    #[serde(default = "default_keepalive_secs")]
    pub keepalive_secs: u64,
}

fn default_keepalive_secs() -> u64 { 60 }

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            keepalive_secs: default_keepalive_secs(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load from `explicit` if given (the file must exist), otherwise from the
    /// per-user config file, then apply the process environment.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let env: HashMap<String, String> = std::env::vars().collect();
        match explicit {
            Some(path) => Self::load_with(path, true, env),
            None => {
                let path = config_path();
                if !path.exists() {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, DEFAULT_CONFIG.trim_start())?;
                }
                Self::load_with(&path, false, env)
            }
        }
    }

    /// Layer the defaults, the file at `path`, and the variables in `env`.
    pub fn load_with(
        path: &Path,
        required: bool,
        env: HashMap<String, String>,
    ) -> Result<Self, ConfigError> {
        let shortcut_key = env.get(API_KEY_SHORTCUT).cloned();

        let mut cfg: Config = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from(path).required(required))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(Some(env)),
            )
            .build()?
            .try_deserialize()?;

        if cfg.ably.api_key.as_deref().map_or(true, str::is_empty) {
            cfg.ably.api_key = shortcut_key.filter(|k| !k.is_empty());
        }
        Ok(cfg)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }

    pub fn api_key(&self) -> Result<&str, ConfigError> {
        self.ably
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey)
    }

    pub fn keepalive(&self) -> Result<Duration, ConfigError> {
        match self.listener.keepalive_secs {
            0 => Err(ConfigError::InvalidKeepalive),
            secs => Ok(Duration::from_secs(secs)),
        }
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("chanlog")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
