//! Imgur client: anonymous image upload authorized by an application Client-ID.

use std::path::Path;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::{debug, warn};

use castbridge_core::config::DEFAULT_IMGUR_BASE_URL;
use castbridge_core::error::{BridgeError, Result};
use castbridge_core::service::ImageHost;

use crate::error::ClientError;

const UPLOAD_PATH: &str = "/3/image";

pub struct ImgurClient {
    client: reqwest::Client,
    client_id: String,
    base_url: String,
}

impl ImgurClient {
    pub fn new(client_id: String, base_url: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            client_id,
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_IMGUR_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
        }
    }

    /// Upload raw image bytes as the multipart `image` field; returns `data.link`.
    pub async fn upload_bytes(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
    ) -> std::result::Result<String, ClientError> {
        debug!(size = bytes.len(), "uploading image to Imgur");

        let form = Form::new()
            .text("type", "file")
            .part("image", Part::bytes(bytes).file_name(file_name.to_string()));

        let resp = self
            .client
            .post(format!("{}{}", self.base_url, UPLOAD_PATH))
            .header("Authorization", format!("Client-ID {}", self.client_id))
            .multipart(form)
            .send()
            .await?;

        let status = resp.status().as_u16();
        if !resp.status().is_success() {
            let text = resp.text().await.unwrap_or_default();
            warn!(status, body = %text, "Imgur upload rejected");
            return Err(ClientError::Api {
                status,
                message: text,
            });
        }

        let body: UploadResponse = resp
            .json()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))?;

        body.data
            .and_then(|d| d.link)
            .filter(|link| !link.is_empty())
            .ok_or_else(|| ClientError::Parse("response has no data.link".to_string()))
    }

    /// Read `path` and upload its contents.
    pub async fn upload_file(&self, path: &Path) -> std::result::Result<String, ClientError> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("photo.jpg");
        self.upload_bytes(bytes, file_name).await
    }
}

#[async_trait]
impl ImageHost for ImgurClient {
    async fn upload(&self, path: &Path) -> Result<String> {
        self.upload_file(path)
            .await
            .map_err(|e| BridgeError::UploadFailed(e.to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(default)]
    data: Option<UploadData>,
}

#[derive(Debug, Deserialize)]
struct UploadData {
    #[serde(default)]
    link: Option<String>,
}
