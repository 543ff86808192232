//! Inbound media download for the Telegram adapter.
//!
//! Resolves a `file_id` via `get_file`, then pulls the bytes with
//! `download_file`. Files above the configured limit are refused before any
//! bytes are transferred.

use async_trait::async_trait;
use teloxide::net::Download;
use teloxide::prelude::*;
use tracing::warn;

use castbridge_core::error::{BridgeError, Result};
use castbridge_core::service::{DownloadedMedia, MediaSource};

use crate::error::TelegramError;

pub struct TelegramMediaSource {
    bot: Bot,
    max_bytes: u64,
}

impl TelegramMediaSource {
    pub fn new(bot: Bot, max_bytes: u64) -> Self {
        Self { bot, max_bytes }
    }

    async fn fetch(&self, file_id: &str) -> std::result::Result<DownloadedMedia, TelegramError> {
        let file = self.bot.get_file(file_id).await?;

        let size = u64::from(file.size);
        if size > self.max_bytes {
            return Err(TelegramError::TooLarge {
                size,
                max: self.max_bytes,
            });
        }

        let mut buf: Vec<u8> = Vec::with_capacity(file.size as usize);
        self.bot.download_file(&file.path, &mut buf).await?;

        // `file.path` is relative to the bot's file endpoint and carries no token.
        Ok(DownloadedMedia {
            bytes: buf,
            source_url: file.path,
        })
    }
}

#[async_trait]
impl MediaSource for TelegramMediaSource {
    async fn download(&self, retrieval_handle: &str) -> Result<DownloadedMedia> {
        self.fetch(retrieval_handle).await.map_err(|e| {
            warn!(file_id = retrieval_handle, error = %e, "Telegram: media download failed");
            BridgeError::DownloadFailed(e.to_string())
        })
    }
}
