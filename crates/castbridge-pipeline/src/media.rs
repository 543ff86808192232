//! Photo attachment handling: download → transient file → image host → cleanup.
//!
//! ```text
//! Idle ─► Downloading ─► Uploading ─► CleaningUp ─► Done
//!             │              │             │
//!             ▼              └─────────────┴──► Failed
//!           Failed (no file was created, nothing to clean)
//! ```
//!
//! Once the transient file exists it is released exactly once: explicitly in
//! `CleaningUp`, or by `Drop` if the task is cancelled before it gets there.

use std::fmt;
use std::io;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use castbridge_core::error::Result;
use castbridge_core::service::DownloadedMedia;
use castbridge_core::types::PhotoVariant;

use crate::bridge::Bridge;

const TRANSIENT_PREFIX: &str = "castbridge-";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaStage {
    Idle,
    Downloading,
    Uploading,
    CleaningUp,
    Done,
    Failed,
}

impl fmt::Display for MediaStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Downloading => write!(f, "downloading"),
            Self::Uploading => write!(f, "uploading"),
            Self::CleaningUp => write!(f, "cleaning-up"),
            Self::Done => write!(f, "done"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Downloaded media on local disk, owned by one post's task.
pub struct TransientFile {
    file: NamedTempFile,
    source_url: String,
}

impl TransientFile {
    /// Write `media` to a fresh uniquely named file in `dir`.
    ///
    /// If the write fails the partially written file is removed before returning.
    pub async fn create(dir: &Path, media: &DownloadedMedia) -> Result<Self> {
        let file = tempfile::Builder::new()
            .prefix(TRANSIENT_PREFIX)
            .suffix(".jpg")
            .tempfile_in(dir)?;
        tokio::fs::write(file.path(), &media.bytes).await?;
        Ok(Self {
            file,
            source_url: media.source_url.clone(),
        })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    /// Delete the file, reporting the outcome instead of swallowing it.
    pub fn release(self) -> io::Result<()> {
        self.file.close()
    }
}

/// What the media stage produced for one post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaOutcome {
    pub media_url: Option<String>,
    /// Every stage entered, in order, starting with `Idle`.
    pub trail: Vec<MediaStage>,
}

/// Per-post media state machine.
pub struct MediaPipeline<'a> {
    bridge: &'a Bridge,
    chat_id: i64,
    trail: Vec<MediaStage>,
}

impl<'a> MediaPipeline<'a> {
    pub fn new(bridge: &'a Bridge, chat_id: i64) -> Self {
        Self {
            bridge,
            chat_id,
            trail: vec![MediaStage::Idle],
        }
    }

    pub fn stage(&self) -> MediaStage {
        self.trail.last().copied().unwrap_or(MediaStage::Idle)
    }

    fn enter(&mut self, next: MediaStage) {
        debug!(chat_id = self.chat_id, from = %self.stage(), to = %next, "media stage");
        self.trail.push(next);
    }

    fn finish(mut self, media_url: Option<String>) -> MediaOutcome {
        self.enter(if media_url.is_some() {
            MediaStage::Done
        } else {
            MediaStage::Failed
        });
        MediaOutcome {
            media_url,
            trail: self.trail,
        }
    }

    /// Move `photo` to the image host. Any failure yields `media_url: None`;
    /// nothing here aborts the surrounding publish.
    pub async fn run(mut self, photo: &PhotoVariant) -> MediaOutcome {
        let bridge = self.bridge;

        self.enter(MediaStage::Downloading);
        let downloaded = match bridge
            .bounded("download", bridge.media().download(&photo.retrieval_handle))
            .await
        {
            Ok(media) => media,
            Err(e) => {
                warn!(chat_id = self.chat_id, code = e.code(), error = %e, "photo download failed");
                return self.finish(None);
            }
        };

        let transient = match TransientFile::create(&bridge.runtime().transient_dir(), &downloaded).await {
            Ok(file) => file,
            Err(e) => {
                warn!(chat_id = self.chat_id, code = e.code(), error = %e, "could not store downloaded photo");
                return self.finish(None);
            }
        };
        drop(downloaded);

        self.enter(MediaStage::Uploading);
        let uploaded = bridge
            .bounded("upload", bridge.image_host().upload(transient.path()))
            .await;

        self.enter(MediaStage::CleaningUp);
        let path = transient.path().to_path_buf();
        let source = transient.source_url().to_string();
        if let Err(e) = transient.release() {
            warn!(chat_id = self.chat_id, path = %path.display(), error = %e, "failed to remove transient media file");
        }

        match uploaded {
            Ok(url) => {
                debug!(chat_id = self.chat_id, source = %source, url = %url, "photo hosted");
                self.finish(Some(url))
            }
            Err(e) => {
                warn!(chat_id = self.chat_id, code = e.code(), error = %e, "photo upload failed");
                self.finish(None)
            }
        }
    }
}
