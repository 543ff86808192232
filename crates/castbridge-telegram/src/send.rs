//! Outbound chat notifications (hash acknowledgments, delete confirmations).
//! Plain text, no parse mode.

use async_trait::async_trait;
use teloxide::prelude::*;

use castbridge_core::error::{BridgeError, Result};
use castbridge_core::service::Notifier;

pub struct TelegramNotifier {
    bot: Bot,
}

impl TelegramNotifier {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, chat_id: i64, text: &str) -> Result<()> {
        self.bot
            .send_message(ChatId(chat_id), text)
            .await
            .map(|_| ())
            .map_err(|e| BridgeError::NotifyFailed(e.to_string()))
    }
}
