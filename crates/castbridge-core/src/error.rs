use thiserror::Error;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("Missing required configuration: {key}")]
    ConfigurationMissing { key: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Message too long: {len} chars (max {max})")]
    MessageTooLong { len: usize, max: usize },

    #[error("Malformed delete command: expected `/delete <hash>`, got {tokens} token(s)")]
    MalformedDeleteCommand { tokens: usize },

    #[error("Media download failed: {0}")]
    DownloadFailed(String),

    #[error("Media upload failed: {0}")]
    UploadFailed(String),

    #[error("Publish failed: {0}")]
    PublishFailed(String),

    #[error("Retract failed: {0}")]
    RetractFailed(String),

    #[error("Notification failed: {0}")]
    NotifyFailed(String),

    #[error("{stage} timed out after {ms}ms")]
    Timeout { stage: &'static str, ms: u64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BridgeError {
    /// Short error code string attached to diagnostics.
    pub fn code(&self) -> &'static str {
        match self {
            BridgeError::ConfigurationMissing { .. } => "CONFIGURATION_MISSING",
            BridgeError::Config(_) => "CONFIG_ERROR",
            BridgeError::MessageTooLong { .. } => "MESSAGE_TOO_LONG",
            BridgeError::MalformedDeleteCommand { .. } => "MALFORMED_DELETE_COMMAND",
            BridgeError::DownloadFailed(_) => "DOWNLOAD_FAILED",
            BridgeError::UploadFailed(_) => "UPLOAD_FAILED",
            BridgeError::PublishFailed(_) => "PUBLISH_FAILED",
            BridgeError::RetractFailed(_) => "RETRACT_FAILED",
            BridgeError::NotifyFailed(_) => "NOTIFY_FAILED",
            BridgeError::Timeout { .. } => "TIMEOUT",
            BridgeError::Io(_) => "IO_ERROR",
        }
    }

    /// Only configuration problems stop the process; everything else is
    /// handled inside the stage that produced it.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            BridgeError::ConfigurationMissing { .. } | BridgeError::Config(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
