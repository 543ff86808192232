//! In-memory service fakes and a ready-made [`Bridge`] for pipeline tests.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;

use castbridge_core::config::BridgeConfig;
use castbridge_core::error::{BridgeError, Result};
use castbridge_core::service::{CastApi, DownloadedMedia, ImageHost, MediaSource, Notifier};
use castbridge_core::types::{CastRequest, CastResult, DeleteRequest};

use crate::bridge::{Bridge, BridgeServices};

pub const DEFAULT_CHANNEL: &str = "farcaster";
pub const SIGNER: &str = "signer-test";

pub struct FakeMedia {
    fail: bool,
    handles: Mutex<Vec<String>>,
}

impl FakeMedia {
    pub fn ok() -> Self {
        Self { fail: false, handles: Mutex::new(Vec::new()) }
    }

    pub fn failing() -> Self {
        Self { fail: true, handles: Mutex::new(Vec::new()) }
    }

    pub fn handles(&self) -> Vec<String> {
        self.handles.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaSource for FakeMedia {
    async fn download(&self, retrieval_handle: &str) -> Result<DownloadedMedia> {
        self.handles.lock().unwrap().push(retrieval_handle.to_string());
        if self.fail {
            return Err(BridgeError::DownloadFailed("getFile returned 400".to_string()));
        }
        Ok(DownloadedMedia {
            bytes: vec![0xFF, 0xD8, 0xFF, 0xE0],
            source_url: format!("photos/{retrieval_handle}.jpg"),
        })
    }
}

#[derive(Debug, Clone)]
pub struct UploadCall {
    pub path: PathBuf,
    pub existed: bool,
}

enum HostMode {
    Ok,
    Fail,
    Hang,
}

pub struct FakeHost {
    mode: HostMode,
    uploads: Mutex<Vec<UploadCall>>,
}

impl FakeHost {
    pub const DEFAULT_URL: &'static str = "https://i.imgur.com/hosted.jpg";

    pub fn ok() -> Self {
        Self { mode: HostMode::Ok, uploads: Mutex::new(Vec::new()) }
    }

    pub fn failing() -> Self {
        Self { mode: HostMode::Fail, uploads: Mutex::new(Vec::new()) }
    }

    pub fn hanging() -> Self {
        Self { mode: HostMode::Hang, uploads: Mutex::new(Vec::new()) }
    }

    pub fn uploads(&self) -> Vec<UploadCall> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageHost for FakeHost {
    async fn upload(&self, path: &Path) -> Result<String> {
        self.uploads.lock().unwrap().push(UploadCall {
            path: path.to_path_buf(),
            existed: path.exists(),
        });
        match self.mode {
            HostMode::Ok => Ok(Self::DEFAULT_URL.to_string()),
            HostMode::Fail => Err(BridgeError::UploadFailed("API error (403)".to_string())),
            HostMode::Hang => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(Self::DEFAULT_URL.to_string())
            }
        }
    }
}

pub enum PublishMode {
    Hash(String),
    NoHash,
    Fail,
}

pub struct FakeCasts {
    publish_mode: PublishMode,
    published: Mutex<Vec<CastRequest>>,
    deletes: Mutex<Vec<DeleteRequest>>,
    deleted: Mutex<HashSet<String>>,
}

impl FakeCasts {
    pub const DEFAULT_HASH: &'static str = "0x71f2a9c4";

    pub fn new(publish_mode: PublishMode) -> Self {
        Self {
            publish_mode,
            published: Mutex::new(Vec::new()),
            deletes: Mutex::new(Vec::new()),
            deleted: Mutex::new(HashSet::new()),
        }
    }

    pub fn published(&self) -> Vec<CastRequest> {
        self.published.lock().unwrap().clone()
    }

    pub fn deletes(&self) -> Vec<DeleteRequest> {
        self.deletes.lock().unwrap().clone()
    }
}

#[async_trait]
impl CastApi for FakeCasts {
    async fn publish(&self, request: &CastRequest) -> Result<CastResult> {
        self.published.lock().unwrap().push(request.clone());
        match &self.publish_mode {
            PublishMode::Hash(hash) => Ok(CastResult::published(hash.clone())),
            PublishMode::NoHash => Ok(CastResult::default()),
            PublishMode::Fail => Err(BridgeError::PublishFailed("API error (500)".to_string())),
        }
    }

    /// Succeeds the first time a hash is deleted, 404s afterwards.
    async fn delete(&self, request: &DeleteRequest) -> Result<()> {
        self.deletes.lock().unwrap().push(request.clone());
        if self.deleted.lock().unwrap().insert(request.target_hash.clone()) {
            Ok(())
        } else {
            Err(BridgeError::RetractFailed("API error (404): cast not found".to_string()))
        }
    }
}

#[derive(Default)]
pub struct FakeNotifier {
    sent: Mutex<Vec<(i64, String)>>,
}

impl FakeNotifier {
    pub fn sent(&self) -> Vec<(i64, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for FakeNotifier {
    async fn notify(&self, chat_id: i64, text: &str) -> Result<()> {
        self.sent.lock().unwrap().push((chat_id, text.to_string()));
        Ok(())
    }
}

/// A [`Bridge`] wired to fakes, with transient files kept in a private temp dir.
pub struct TestBridge {
    pub bridge: Bridge,
    pub media: Arc<FakeMedia>,
    pub host: Arc<FakeHost>,
    pub casts: Arc<FakeCasts>,
    pub notifier: Arc<FakeNotifier>,
    dir: TempDir,
}

impl TestBridge {
    pub fn builder() -> TestBridgeBuilder {
        TestBridgeBuilder {
            media: FakeMedia::ok(),
            host: FakeHost::ok(),
            casts: FakeCasts::new(PublishMode::Hash(FakeCasts::DEFAULT_HASH.to_string())),
            timeout_secs: 5,
        }
    }

    /// Transient media files still present on disk.
    pub fn transient_files(&self) -> usize {
        std::fs::read_dir(self.dir.path())
            .map(|entries| entries.filter_map(|e| e.ok()).count())
            .unwrap_or(0)
    }
}

pub struct TestBridgeBuilder {
    media: FakeMedia,
    host: FakeHost,
    casts: FakeCasts,
    timeout_secs: u64,
}

impl TestBridgeBuilder {
    pub fn media(mut self, media: FakeMedia) -> Self {
        self.media = media;
        self
    }

    pub fn host(mut self, host: FakeHost) -> Self {
        self.host = host;
        self
    }

    pub fn casts(mut self, casts: FakeCasts) -> Self {
        self.casts = casts;
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn build(self) -> TestBridge {
        let dir = tempfile::tempdir().unwrap();

        let mut config = BridgeConfig::default();
        config.telegram.bot_token = "123:test".to_string();
        config.farcaster.api_key = "key".to_string();
        config.farcaster.signer_uuid = SIGNER.to_string();
        config.farcaster.default_channel_id = DEFAULT_CHANNEL.to_string();
        config.imgur.client_id = "client".to_string();
        config.bridge.request_timeout_secs = self.timeout_secs;
        config.bridge.transient_dir = Some(dir.path().to_path_buf());
        config.validate().unwrap();

        let media = Arc::new(self.media);
        let host = Arc::new(self.host);
        let casts = Arc::new(self.casts);
        let notifier = Arc::new(FakeNotifier::default());

        let bridge = Bridge::new(
            &config,
            BridgeServices {
                media: media.clone(),
                image_host: host.clone(),
                casts: casts.clone(),
                notifier: notifier.clone(),
            },
        );

        TestBridge { bridge, media, host, casts, notifier, dir }
    }
}
