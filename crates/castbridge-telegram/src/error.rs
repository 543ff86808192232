/// Errors produced by the Telegram adapter.
#[derive(Debug, thiserror::Error)]
pub enum TelegramError {
    #[error("teloxide error: {0}")]
    Teloxide(#[from] teloxide::RequestError),

    #[error("download error: {0}")]
    Download(#[from] teloxide::DownloadError),

    #[error("file is {size} bytes, limit is {max}")]
    TooLarge { size: u64, max: u64 },
}
