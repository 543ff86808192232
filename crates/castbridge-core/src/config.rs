use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Toml},
    value::{Uncased, UncasedStr},
    Figment,
};
use serde::{de, Deserialize, Deserializer, Serialize};

use crate::error::{BridgeError, Result};
use crate::types::MAX_CAST_LENGTH;

pub const DEFAULT_NEYNAR_BASE_URL: &str = "https://api.neynar.com";
pub const DEFAULT_IMGUR_BASE_URL: &str = "https://api.imgur.com";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_SHUTDOWN_GRACE_SECS: u64 = 60;
pub const DEFAULT_MAX_MEDIA_BYTES: u64 = 20 * 1024 * 1024; // Bot API download cap

/// Channels routed out of the box. Neynar addresses a channel by its name,
/// so each prefix maps to itself.
pub const DEFAULT_CHANNELS: &[&str] = &[
    "gaming",
    "sonata",
    "replyguys",
    "history",
    "farcaster",
    "dev",
    "ethereum",
    "base",
    "degen",
];

/// Flat environment variable names accepted alongside `CASTBRIDGE_*`, and the
/// config path each one fills.
pub const LEGACY_ENV_KEYS: &[(&str, &str)] = &[
    ("BOT_TOKEN", "telegram.bot_token"),
    ("FARCASTER_API_KEY", "farcaster.api_key"),
    ("SIGNER_UUID", "farcaster.signer_uuid"),
    ("DEFAULT_CHANNEL_ID", "farcaster.default_channel_id"),
    ("IMGUR_CLIENT_ID", "imgur.client_id"),
];

/// Top-level config (castbridge.toml + legacy env + CASTBRIDGE_* env overrides).
///
/// Built once at startup and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BridgeConfig {
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub farcaster: FarcasterConfig,
    #[serde(default)]
    pub imgur: ImgurConfig,
    #[serde(default)]
    pub bridge: RuntimeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TelegramConfig {
    #[serde(default, deserialize_with = "opaque_string")]
    pub bot_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FarcasterConfig {
    /// Neynar API key, sent as the `api_key` header.
    #[serde(default, deserialize_with = "opaque_string")]
    pub api_key: String,
    /// Signer that authorizes casts on behalf of the publishing account.
    #[serde(default, deserialize_with = "opaque_string")]
    pub signer_uuid: String,
    /// Channel used when a post carries no recognized prefix.
    #[serde(default, deserialize_with = "opaque_string")]
    pub default_channel_id: String,
    #[serde(default = "default_neynar_base_url")]
    pub base_url: String,
    /// Prefix → channel id. Lookup is exact and case-sensitive.
    #[serde(default = "default_channel_map")]
    pub channels: BTreeMap<String, String>,
}

impl Default for FarcasterConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            signer_uuid: String::new(),
            default_channel_id: String::new(),
            base_url: default_neynar_base_url(),
            channels: default_channel_map(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImgurConfig {
    /// Sent as `Authorization: Client-ID {client_id}`.
    #[serde(default, deserialize_with = "opaque_string")]
    pub client_id: String,
    #[serde(default = "default_imgur_base_url")]
    pub base_url: String,
}

impl Default for ImgurConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            base_url: default_imgur_base_url(),
        }
    }
}

/// Limits and timing for message processing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default = "default_max_cast_length")]
    pub max_cast_length: usize,
    /// Upper bound on every download, upload, publish, delete and notify call.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// How long shutdown waits for in-flight posts to finish.
    #[serde(default = "default_shutdown_grace_secs")]
    pub shutdown_grace_secs: u64,
    #[serde(default = "default_max_media_bytes")]
    pub max_media_bytes: u64,
    /// Directory for transient media files. Defaults to the OS temp dir.
    #[serde(default)]
    pub transient_dir: Option<PathBuf>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            max_cast_length: default_max_cast_length(),
            request_timeout_secs: default_request_timeout_secs(),
            shutdown_grace_secs: default_shutdown_grace_secs(),
            max_media_bytes: default_max_media_bytes(),
            transient_dir: None,
        }
    }
}

impl RuntimeConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }

    pub fn transient_dir(&self) -> PathBuf {
        self.transient_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}

/// Credentials are opaque. Environment values that happen to look like numbers
/// are parsed as numbers, so accept those and turn them back into text.
fn opaque_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct OpaqueString;

    impl de::Visitor<'_> for OpaqueString {
        type Value = String;

        fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("a string or a number")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<String, E> {
            Ok(v)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u128<E: de::Error>(self, v: u128) -> std::result::Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_i128<E: de::Error>(self, v: i128) -> std::result::Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<String, E> {
            Ok(v.to_string())
        }
    }

    deserializer.deserialize_any(OpaqueString)
}

fn default_neynar_base_url() -> String {
    DEFAULT_NEYNAR_BASE_URL.to_string()
}
fn default_imgur_base_url() -> String {
    DEFAULT_IMGUR_BASE_URL.to_string()
}
fn default_max_cast_length() -> usize {
    MAX_CAST_LENGTH
}
fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}
fn default_shutdown_grace_secs() -> u64 {
    DEFAULT_SHUTDOWN_GRACE_SECS
}
fn default_max_media_bytes() -> u64 {
    DEFAULT_MAX_MEDIA_BYTES
}

pub fn default_channel_map() -> BTreeMap<String, String> {
    DEFAULT_CHANNELS
        .iter()
        .map(|c| (c.to_string(), c.to_string()))
        .collect()
}

impl BridgeConfig {
    /// Load config from a TOML file with env var overrides, then validate it.
    ///
    /// Sources, later ones winning:
    ///   1. TOML file: explicit path, else ~/.castbridge/castbridge.toml (may be absent)
    ///   2. Flat variables: BOT_TOKEN, FARCASTER_API_KEY, SIGNER_UUID, ...
    ///   3. CASTBRIDGE_<SECTION>__<KEY>
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);

        let figment = Figment::new()
            .merge(Toml::file(&path))
            .merge(
                Env::raw()
                    .only(&legacy_env_names())
                    .map(legacy_env_key),
            )
            .merge(Env::prefixed("CASTBRIDGE_").split("__"));

        Self::from_figment(figment)
    }

    /// Extract and validate from an already-assembled figment.
    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: BridgeConfig = figment
            .extract()
            .map_err(|e| BridgeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Every credential must be present and non-blank.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("telegram.bot_token", &self.telegram.bot_token),
            ("farcaster.api_key", &self.farcaster.api_key),
            ("farcaster.signer_uuid", &self.farcaster.signer_uuid),
            ("farcaster.default_channel_id", &self.farcaster.default_channel_id),
            ("imgur.client_id", &self.imgur.client_id),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(BridgeError::ConfigurationMissing {
                    key: key.to_string(),
                });
            }
        }

        if self.bridge.max_cast_length == 0 {
            return Err(BridgeError::Config(
                "bridge.max_cast_length must be greater than 0".to_string(),
            ));
        }
        if self.bridge.request_timeout_secs == 0 {
            return Err(BridgeError::Config(
                "bridge.request_timeout_secs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

fn legacy_env_names() -> Vec<&'static str> {
    LEGACY_ENV_KEYS.iter().map(|(env, _)| *env).collect()
}

fn legacy_env_key(key: &UncasedStr) -> Uncased<'_> {
    LEGACY_ENV_KEYS
        .iter()
        .find(|(env, _)| key.as_str().eq_ignore_ascii_case(env))
        .map(|(_, path)| Uncased::from(*path))
        .unwrap_or_else(|| Uncased::from(key.as_str()))
}

fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.castbridge/castbridge.toml", home)
}
