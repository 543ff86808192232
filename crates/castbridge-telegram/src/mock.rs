//! Fake Bot API server for adapter tests.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::extract::{Path as UrlPath, State};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::{Json, Router};
use serde_json::{json, Value};
use teloxide::Bot;

use castbridge_core::config::BridgeConfig;
use castbridge_core::error::{BridgeError, Result};
use castbridge_core::service::{CastApi, ImageHost};
use castbridge_core::types::{CastRequest, CastResult, DeleteRequest};
use castbridge_pipeline::{Bridge, BridgeServices};

use crate::{TelegramMediaSource, TelegramNotifier};

pub(crate) const FILE_PATH: &str = "photos/file_1.jpg";

/// What `getFile` reports and what the file download returns.
#[derive(Clone)]
pub(crate) struct FakeBotApi {
    pub file_size: u32,
    pub file_bytes: Vec<u8>,
}

impl Default for FakeBotApi {
    fn default() -> Self {
        Self {
            file_size: 3,
            file_bytes: vec![1, 2, 3],
        }
    }
}

/// Serve `api` on an ephemeral localhost port and return a bot pointed at it.
pub(crate) async fn spawn_bot(api: FakeBotApi) -> Bot {
    let app = Router::new()
        .route("/{*path}", any(bot_api))
        .with_state(api);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fake bot api");
    let addr = listener.local_addr().expect("fake bot api address");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    let api_url = format!("http://{addr}/").parse().expect("fake bot api url");
    Bot::new("test-token").set_api_url(api_url)
}

async fn bot_api(State(api): State<FakeBotApi>, UrlPath(path): UrlPath<String>) -> Response {
    if path.starts_with("file/") {
        return api.file_bytes.into_response();
    }

    let method = path.rsplit('/').next().unwrap_or_default().to_ascii_lowercase();
    let result = match method.as_str() {
        "getme" => json!({
            "id": 42,
            "is_bot": true,
            "first_name": "castbridge",
            "username": "castbridge_bot",
            "can_join_groups": false,
            "can_read_all_group_messages": false,
            "supports_inline_queries": false,
            "can_connect_to_business": false,
            "has_main_web_app": false
        }),
        "getupdates" => {
            tokio::time::sleep(Duration::from_millis(20)).await;
            json!([])
        }
        "getfile" => json!({
            "file_id": "photo-large",
            "file_unique_id": "photo-large-unique",
            "file_size": api.file_size,
            "file_path": FILE_PATH
        }),
        _ => json!(true),
    };
    Json::<Value>(json!({"ok": true, "result": result})).into_response()
}

/// Image host and cast API that refuse every call.
struct Offline;

#[async_trait]
impl ImageHost for Offline {
    async fn upload(&self, _path: &Path) -> Result<String> {
        Err(BridgeError::UploadFailed("offline".to_string()))
    }
}

#[async_trait]
impl CastApi for Offline {
    async fn publish(&self, _request: &CastRequest) -> Result<CastResult> {
        Err(BridgeError::PublishFailed("offline".to_string()))
    }

    async fn delete(&self, _request: &DeleteRequest) -> Result<()> {
        Err(BridgeError::RetractFailed("offline".to_string()))
    }
}

pub(crate) fn offline_bridge(bot: &Bot) -> Arc<Bridge> {
    let mut config = BridgeConfig::default();
    config.farcaster.default_channel_id = "farcaster".to_string();
    let services = BridgeServices {
        media: Arc::new(TelegramMediaSource::new(bot.clone(), config.bridge.max_media_bytes)),
        image_host: Arc::new(Offline),
        casts: Arc::new(Offline),
        notifier: Arc::new(TelegramNotifier::new(bot.clone())),
    };
    Arc::new(Bridge::new(&config, services))
}
