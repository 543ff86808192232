//! Process-wide, read-only state shared by every per-post task.

use std::future::Future;
use std::sync::Arc;

use castbridge_core::command::ChannelRouter;
use castbridge_core::config::{BridgeConfig, RuntimeConfig};
use castbridge_core::error::{BridgeError, Result};
use castbridge_core::service::{CastApi, ImageHost, MediaSource, Notifier};

/// Implementations of the external endpoints.
#[derive(Clone)]
pub struct BridgeServices {
    pub media: Arc<dyn MediaSource>,
    pub image_host: Arc<dyn ImageHost>,
    pub casts: Arc<dyn CastApi>,
    pub notifier: Arc<dyn Notifier>,
}

/// Everything a post needs to become a cast.
///
/// Built once before the adapter starts and handed to each task behind an
/// `Arc`; nothing in here is mutated afterwards.
pub struct Bridge {
    router: ChannelRouter,
    signer_uuid: String,
    runtime: RuntimeConfig,
    services: BridgeServices,
}

impl Bridge {
    pub fn new(config: &BridgeConfig, services: BridgeServices) -> Self {
        Self {
            router: ChannelRouter::new(
                config.farcaster.channels.clone(),
                config.farcaster.default_channel_id.clone(),
            ),
            signer_uuid: config.farcaster.signer_uuid.clone(),
            runtime: config.bridge.clone(),
            services,
        }
    }

    pub fn router(&self) -> &ChannelRouter {
        &self.router
    }

    pub fn signer_uuid(&self) -> &str {
        &self.signer_uuid
    }

    pub fn runtime(&self) -> &RuntimeConfig {
        &self.runtime
    }

    pub fn media(&self) -> &dyn MediaSource {
        self.services.media.as_ref()
    }

    pub fn image_host(&self) -> &dyn ImageHost {
        self.services.image_host.as_ref()
    }

    pub fn casts(&self) -> &dyn CastApi {
        self.services.casts.as_ref()
    }

    pub fn notifier(&self) -> &dyn Notifier {
        self.services.notifier.as_ref()
    }

    /// Run one network call under the per-call timeout.
    ///
    /// Expiry surfaces as [`BridgeError::Timeout`] and is handled like any
    /// other failure of that stage.
    pub async fn bounded<T, F>(&self, stage: &'static str, call: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let limit = self.runtime.request_timeout();
        match tokio::time::timeout(limit, call).await {
            Ok(result) => result,
            Err(_) => Err(BridgeError::Timeout {
                stage,
                ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
            }),
        }
    }
}
