//! Seams to the external endpoints the bridge talks to.
//!
//! Each trait is implemented once against the real service and once by the
//! in-memory fakes used in tests. Implementations must be `Send + Sync` so a
//! single instance can be shared by every per-post task.

use std::path::Path;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{CastRequest, CastResult, DeleteRequest};

/// Bytes fetched for one photo variant.
#[derive(Debug, Clone)]
pub struct DownloadedMedia {
    pub bytes: Vec<u8>,
    /// Where the bytes came from. Never contains credentials.
    pub source_url: String,
}

/// Resolves a retrieval handle to media bytes.
#[async_trait]
pub trait MediaSource: Send + Sync {
    /// Fails with `DownloadFailed` on any non-success response.
    async fn download(&self, retrieval_handle: &str) -> Result<DownloadedMedia>;
}

/// Public image host.
#[async_trait]
pub trait ImageHost: Send + Sync {
    /// Upload the file at `path` and return its public URL.
    async fn upload(&self, path: &Path) -> Result<String>;
}

/// The social network's cast endpoint.
#[async_trait]
pub trait CastApi: Send + Sync {
    /// Single attempt. A 200 without a hash comes back as an unsuccessful [`CastResult`].
    async fn publish(&self, request: &CastRequest) -> Result<CastResult>;

    /// Single attempt. `Ok(())` only on 200.
    async fn delete(&self, request: &DeleteRequest) -> Result<()>;
}

/// Plain-text message back to the originating chat.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, chat_id: i64, text: &str) -> Result<()>;
}
