//! Telegram channel adapter.
//!
//! Wraps a teloxide `Bot` + `Dispatcher` and drives the long-polling event loop
//! until the caller's shutdown future resolves. Only `channel_post` updates are
//! routed; everything else is dropped by the default handler.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use teloxide::prelude::*;
use tokio_util::task::TaskTracker;
use tracing::{debug, info};

use castbridge_pipeline::Bridge;

use crate::handler::handle_channel_post;

/// Delay between shutdown attempts while the dispatcher is still starting up.
const SHUTDOWN_RETRY: Duration = Duration::from_millis(100);

pub struct TelegramAdapter {
    bot: Bot,
    bridge: Arc<Bridge>,
    tracker: TaskTracker,
}

impl TelegramAdapter {
    /// Posts are processed on tasks spawned into `tracker`, so the caller can
    /// wait for them after [`run`](Self::run) returns.
    pub fn new(bot: Bot, bridge: Arc<Bridge>, tracker: TaskTracker) -> Self {
        Self {
            bot,
            bridge,
            tracker,
        }
    }

    /// Connect to Telegram and drive the long-polling loop.
    ///
    /// Returns once `shutdown` has resolved and the dispatcher has stopped
    /// polling. In-flight posts keep running on the tracker.
    pub async fn run<F>(self, shutdown: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        info!("Telegram: starting long-polling dispatcher for channel posts");

        let handler = Update::filter_channel_post().endpoint(handle_channel_post);

        let mut dispatcher = Dispatcher::builder(self.bot, handler)
            .dependencies(dptree::deps![self.bridge, self.tracker])
            .default_handler(|_upd| async {})
            .build();

        let token = dispatcher.shutdown_token();
        tokio::spawn(async move {
            shutdown.await;
            info!("Telegram: shutdown requested, stopping dispatcher");
            loop {
                match token.shutdown() {
                    Ok(stopped) => {
                        stopped.await;
                        break;
                    }
                    Err(_) => {
                        debug!("Telegram: dispatcher not running yet, retrying shutdown");
                        tokio::time::sleep(SHUTDOWN_RETRY).await;
                    }
                }
            }
        });

        dispatcher.dispatch().await;

        info!("Telegram: dispatcher stopped");
    }
}
