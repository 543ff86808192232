//! Data model shared by every stage of the bridge.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum embeds Farcaster accepts on a single cast.
pub const MAX_EMBEDS: usize = 2;

/// Maximum cast length in characters.
pub const MAX_CAST_LENGTH: usize = 320;

/// One resolution of a photo attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoVariant {
    /// Opaque handle the media source resolves to bytes (a Telegram `file_id`).
    pub retrieval_handle: String,
    /// Position in the sender's ordering; higher means larger.
    pub resolution_rank: u32,
}

/// Immutable snapshot of one inbound channel post.
#[derive(Debug, Clone)]
pub struct InboundPost {
    pub text: Option<String>,
    pub caption: Option<String>,
    /// Ordered from smallest to largest resolution.
    pub photo_variants: Vec<PhotoVariant>,
    pub chat_id: i64,
    pub message_id: i32,
    pub timestamp: DateTime<Utc>,
}

impl InboundPost {
    /// `text`, else `caption`, else empty.
    pub fn effective_text(&self) -> &str {
        self.text
            .as_deref()
            .or(self.caption.as_deref())
            .unwrap_or("")
    }

    /// Highest-resolution variant; by convention the last one.
    pub fn best_photo(&self) -> Option<&PhotoVariant> {
        self.photo_variants.last()
    }
}

/// Why a post was classified as [`ParsedCommand::Invalid`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidReason {
    /// `/delete` with a token count other than two.
    MalformedDelete { tokens: usize },
    /// No text, no caption, no photo.
    EmptyPost,
}

/// A post routed for publishing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishCommand {
    pub channel_id: String,
    /// Set only when the prefix matched the channel table.
    pub channel_prefix: Option<String>,
    pub remainder_text: String,
    pub photo: Option<PhotoVariant>,
}

/// Result of normalizing an [`InboundPost`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedCommand {
    Publish(PublishCommand),
    Delete { target_hash: String },
    Invalid(InvalidReason),
}

/// Structured URL attachment on a cast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Embed {
    pub url: String,
}

impl Embed {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// Outbound cast; serializes as the Neynar publish body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CastRequest {
    pub text: String,
    pub channel_id: String,
    pub signer_uuid: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub embeds: Vec<Embed>,
}

/// Outcome of a publish call. `hash` is the correlation handle for a later delete.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CastResult {
    pub hash: Option<String>,
    pub success: bool,
}

impl CastResult {
    pub fn published(hash: impl Into<String>) -> Self {
        Self {
            hash: Some(hash.into()),
            success: true,
        }
    }

    /// The hash, only when the publish counts as successful.
    pub fn correlation_hash(&self) -> Option<&str> {
        if self.success {
            self.hash.as_deref().filter(|h| !h.is_empty())
        } else {
            None
        }
    }
}

/// Retraction of a previously published cast; serializes as the Neynar delete body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteRequest {
    pub target_hash: String,
    pub signer_uuid: String,
}
