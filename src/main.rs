use std::path::PathBuf;

use anyhow::Context;
use chanlog::listen;
use chanlog_core::config::Config;
use chanlog_feeds::{AblyFeed, AblyOptions, ChannelFeed, StdinFeed};
use clap::{Parser, ValueEnum};

#[derive(Parser)]
#[command(name = "chanlog", about = "Print log records published on a realtime channel")]
struct Cli {
    /// Config file to use instead of ~/.config/chanlog/config.toml.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where messages come from.
    #[arg(long, value_enum, default_value_t = FeedSource::Ably)]
    feed: FeedSource,

    /// Channel to subscribe to (overrides the config file).
    #[arg(long)]
    channel: Option<String>,

    /// Seconds between keep-alive status lines.
    #[arg(long)]
    keepalive_secs: Option<u64>,

    /// Write debug logs to /tmp/chanlog-debug.log (tail -f to inspect).
    #[arg(long)]
    debug: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum FeedSource {
    /// Ably realtime channel.
    Ably,
    /// One payload per line on stdin.
    Stdin,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug)?;

    let mut config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(channel) = cli.channel {
        config.ably.channel = channel;
    }
    if let Some(secs) = cli.keepalive_secs {
        config.listener.keepalive_secs = secs;
    }
    let keepalive = config.keepalive()?;

    let feed: Box<dyn ChannelFeed> = match cli.feed {
        FeedSource::Ably => {
            let options = AblyOptions::from_config(&config)?;
            let feed = AblyFeed::connect(options)
                .await
                .context("failed to connect to Ably")?;
            Box::new(feed)
        }
        FeedSource::Stdin => {
            tracing::info!("reading messages from stdin");
            Box::new(StdinFeed::new())
        }
    };

    let mut stdout = std::io::stdout();
    let summary = listen(feed, &mut stdout, keepalive, shutdown_signal()).await?;
    tracing::info!(
        messages = summary.messages,
        ticks = summary.ticks,
        reason = ?summary.reason,
        "listener stopped"
    );
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "cannot listen for Ctrl-C; run until the feed ends");
        std::future::pending::<()>().await;
    }
}

fn init_tracing(debug: bool) -> anyhow::Result<()> {
    if debug {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open("/tmp/chanlog-debug.log")?;
        tracing_subscriber::fmt()
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .init();
        tracing::info!("chanlog debug log started, tail -f /tmp/chanlog-debug.log");
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .init();
    }
    Ok(())
}
