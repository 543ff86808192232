use std::sync::Arc;

use clap::Parser;
use teloxide::Bot;
use tokio_util::task::TaskTracker;
use tracing::{error, info, warn};

use castbridge_core::config::BridgeConfig;
use castbridge_telegram::TelegramAdapter;

mod app;

/// Used when RUST_LOG is unset. `castbridge` is the binary's own target.
const DEFAULT_LOG_FILTER: &str = "castbridge=info,castbridge_pipeline=info,castbridge_telegram=info,castbridge_clients=info,castbridge_core=info,teloxide=warn";

/// Bridge Telegram channel posts to Farcaster casts.
#[derive(Debug, Parser)]
#[command(name = "castbridge", version)]
struct Cli {
    /// Path to castbridge.toml (default: ~/.castbridge/castbridge.toml).
    #[arg(long, env = "CASTBRIDGE_CONFIG")]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional; real environment variables win.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .init();

    let cli = Cli::parse();

    // load config: --config / CASTBRIDGE_CONFIG > ~/.castbridge/castbridge.toml, then env
    let config = match BridgeConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!(code = e.code(), "{e}");
            std::process::exit(1);
        }
    };

    let bot = Bot::new(&config.telegram.bot_token);
    let bridge = Arc::new(app::build_bridge(&config, &bot));
    info!(
        default_channel = %config.farcaster.default_channel_id,
        channels = config.farcaster.channels.len(),
        "castbridge starting"
    );

    let tracker = TaskTracker::new();
    TelegramAdapter::new(bot, bridge, tracker.clone())
        .run(shutdown_signal())
        .await;

    // let in-flight posts reach cleanup before exiting
    tracker.close();
    if !tracker.is_empty() {
        info!(in_flight = tracker.len(), "waiting for in-flight posts");
    }
    let grace = config.bridge.shutdown_grace();
    if tokio::time::timeout(grace, tracker.wait()).await.is_err() {
        warn!(
            in_flight = tracker.len(),
            grace_secs = grace.as_secs(),
            "shutdown grace period elapsed with posts still in flight"
        );
    }

    info!("castbridge stopped");
    Ok(())
}

/// Resolves on Ctrl-C, or on SIGTERM where signals exist.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => info!("Ctrl-C received"),
                    _ = sigterm.recv() => info!("SIGTERM received"),
                }
            }
            Err(e) => {
                warn!(error = %e, "cannot listen for SIGTERM, only Ctrl-C stops castbridge");
                wait_for_ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    wait_for_ctrl_c().await;
}

async fn wait_for_ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
