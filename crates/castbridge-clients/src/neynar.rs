//! Neynar client for publishing and deleting Farcaster casts.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use castbridge_core::config::DEFAULT_NEYNAR_BASE_URL;
use castbridge_core::error::{BridgeError, Result};
use castbridge_core::service::CastApi;
use castbridge_core::types::{CastRequest, CastResult, DeleteRequest};

use crate::error::ClientError;

const CAST_PATH: &str = "/v2/farcaster/cast";

pub struct NeynarClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl NeynarClient {
    pub fn new(api_key: String, base_url: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_NEYNAR_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
        }
    }

    fn cast_url(&self) -> String {
        format!("{}{}", self.base_url, CAST_PATH)
    }

    /// POST a cast. Only HTTP 200 counts; a 200 whose body lacks `cast.hash`
    /// yields an unsuccessful result rather than an error.
    pub async fn publish_cast(&self, req: &CastRequest) -> std::result::Result<CastResult, ClientError> {
        debug!(channel = %req.channel_id, embeds = req.embeds.len(), "publishing cast");

        let resp = self
            .client
            .post(self.cast_url())
            .header("accept", "application/json")
            .header("api_key", &self.api_key)
            .json(req)
            .send()
            .await?;

        let status = resp.status().as_u16();
        if status != 200 {
            let text = resp.text().await.unwrap_or_default();
            warn!(status, body = %text, "Neynar publish rejected");
            return Err(ClientError::Api {
                status,
                message: text,
            });
        }

        let body: PublishResponse = resp
            .json()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))?;

        match body.cast.and_then(|c| c.hash).filter(|h| !h.is_empty()) {
            Some(hash) => Ok(CastResult::published(hash)),
            None => {
                warn!("Neynar publish returned 200 without a cast hash");
                Ok(CastResult::default())
            }
        }
    }

    /// DELETE a cast by hash. Only HTTP 200 counts.
    pub async fn delete_cast(&self, req: &DeleteRequest) -> std::result::Result<(), ClientError> {
        debug!(hash = %req.target_hash, "deleting cast");

        let resp = self
            .client
            .delete(self.cast_url())
            .header("accept", "application/json")
            .header("api_key", &self.api_key)
            .json(req)
            .send()
            .await?;

        let status = resp.status().as_u16();
        if status != 200 {
            let text = resp.text().await.unwrap_or_default();
            warn!(status, body = %text, hash = %req.target_hash, "Neynar delete rejected");
            return Err(ClientError::Api {
                status,
                message: text,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl CastApi for NeynarClient {
    async fn publish(&self, request: &CastRequest) -> Result<CastResult> {
        self.publish_cast(request)
            .await
            .map_err(|e| BridgeError::PublishFailed(e.to_string()))
    }

    async fn delete(&self, request: &DeleteRequest) -> Result<()> {
        self.delete_cast(request)
            .await
            .map_err(|e| BridgeError::RetractFailed(e.to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct PublishResponse {
    #[serde(default)]
    cast: Option<PublishedCast>,
}

#[derive(Debug, Deserialize)]
struct PublishedCast {
    #[serde(default)]
    hash: Option<String>,
}
