use std::sync::Arc;

use teloxide::Bot;

use castbridge_clients::{ImgurClient, NeynarClient};
use castbridge_core::config::BridgeConfig;
use castbridge_pipeline::{Bridge, BridgeServices};
use castbridge_telegram::{TelegramMediaSource, TelegramNotifier};

/// Wire the real service clients into a [`Bridge`].
///
/// `bot` is shared: media downloads and acknowledgments use the same
/// connection as the dispatcher.
pub fn build_bridge(config: &BridgeConfig, bot: &Bot) -> Bridge {
    let services = BridgeServices {
        media: Arc::new(TelegramMediaSource::new(
            bot.clone(),
            config.bridge.max_media_bytes,
        )),
        image_host: Arc::new(ImgurClient::new(
            config.imgur.client_id.clone(),
            Some(config.imgur.base_url.clone()),
        )),
        casts: Arc::new(NeynarClient::new(
            config.farcaster.api_key.clone(),
            Some(config.farcaster.base_url.clone()),
        )),
        notifier: Arc::new(TelegramNotifier::new(bot.clone())),
    };
    Bridge::new(config, services)
}
