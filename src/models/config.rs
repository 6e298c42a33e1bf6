//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Target storefront and acquisition limits
    #[serde(default)]
    pub store: StoreConfig,

    /// HTTP client and retry behavior
    #[serde(default)]
    pub http: HttpConfig,

    /// Tracked-brand matching rules
    #[serde(default)]
    pub brand: BrandConfig,

    /// Notification sink settings
    #[serde(default)]
    pub notify: NotifyConfig,

    /// Snapshot persistence settings
    #[serde(default)]
    pub snapshot: SnapshotConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Apply env-style overrides, read once at startup.
    ///
    /// Recognized variables: `SHELFWATCH_STORE_URL`,
    /// `SHELFWATCH_WEBHOOK_URL`, `SHELFWATCH_SNAPSHOT_PATH`.
    pub fn apply_env(&mut self) {
        if let Ok(value) = std::env::var("SHELFWATCH_STORE_URL") {
            if !value.trim().is_empty() {
                self.store.base_url = value;
            }
        }
        if let Ok(value) = std::env::var("SHELFWATCH_WEBHOOK_URL") {
            if !value.trim().is_empty() {
                self.notify.webhook_url = Some(value);
            }
        }
        if let Ok(value) = std::env::var("SHELFWATCH_SNAPSHOT_PATH") {
            if !value.trim().is_empty() {
                self.snapshot.path = value;
            }
        }
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if Url::parse(&self.store.base_url).is_err() {
            return Err(AppError::validation(format!(
                "store.base_url is not a valid URL: {}",
                self.store.base_url
            )));
        }
        if self.store.feed_page_limit == 0 {
            return Err(AppError::validation("store.feed_page_limit must be > 0"));
        }
        if self.store.max_feed_pages == 0 {
            return Err(AppError::validation("store.max_feed_pages must be > 0"));
        }
        if self.store.max_listing_pages == 0 {
            return Err(AppError::validation("store.max_listing_pages must be > 0"));
        }
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::validation("http.user_agent is empty"));
        }
        if self.http.timeout_secs == 0 {
            return Err(AppError::validation("http.timeout_secs must be > 0"));
        }
        if self.http.retries == 0 {
            return Err(AppError::validation("http.retries must be > 0"));
        }
        if self.brand.aliases.iter().all(|a| a.trim().is_empty()) {
            return Err(AppError::validation("brand.aliases has no usable entry"));
        }
        if self.snapshot.path.trim().is_empty() {
            return Err(AppError::validation("snapshot.path is empty"));
        }
        Ok(())
    }

    /// Parsed storefront base URL.
    pub fn base_url(&self) -> Result<Url> {
        Ok(Url::parse(&self.store.base_url)?)
    }
}

/// Target storefront and acquisition limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Storefront base URL all endpoints are joined against
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// Page size requested from the structured feed
    #[serde(default = "defaults::feed_page_limit")]
    pub feed_page_limit: u32,

    /// Runaway guard for feed pagination
    #[serde(default = "defaults::max_feed_pages")]
    pub max_feed_pages: u32,

    /// Runaway guard for the listing-page crawl
    #[serde(default = "defaults::max_listing_pages")]
    pub max_listing_pages: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            feed_page_limit: defaults::feed_page_limit(),
            max_feed_pages: defaults::max_feed_pages(),
            max_listing_pages: defaults::max_listing_pages(),
        }
    }
}

/// HTTP client and retry behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for all requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Per-request socket timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Retry budget per fetch; 403/404 short-circuit it
    #[serde(default = "defaults::retries")]
    pub retries: u32,

    /// Base for the linear backoff (attempt index times this)
    #[serde(default = "defaults::backoff_base")]
    pub backoff_base_ms: u64,

    /// Polite delay between successive paginated/per-item fetches
    #[serde(default = "defaults::request_delay")]
    pub request_delay_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            retries: defaults::retries(),
            backoff_base_ms: defaults::backoff_base(),
            request_delay_ms: defaults::request_delay(),
        }
    }
}

/// Tracked-brand matching rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandConfig {
    /// Accepted brand spellings, matched case-insensitively as substrings
    #[serde(default = "defaults::brand_aliases")]
    pub aliases: Vec<String>,
}

impl Default for BrandConfig {
    fn default() -> Self {
        Self {
            aliases: defaults::brand_aliases(),
        }
    }
}

/// Notification sink settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Webhook address; messages are printed to the log when unset
    #[serde(default)]
    pub webhook_url: Option<String>,

    /// Currency label rendered in front of prices
    #[serde(default = "defaults::currency_label")]
    pub currency_label: String,

    /// Accent color for the embed payload
    #[serde(default = "defaults::accent_color")]
    pub accent_color: u32,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            currency_label: defaults::currency_label(),
            accent_color: defaults::accent_color(),
        }
    }
}

/// Snapshot persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotConfig {
    /// Path of the snapshot file, overwritten whole every run
    #[serde(default = "defaults::snapshot_path")]
    pub path: String,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            path: defaults::snapshot_path(),
        }
    }
}

mod defaults {
    // Store defaults
    pub fn base_url() -> String {
        "https://store.miyaradventures.com/".into()
    }
    pub fn feed_page_limit() -> u32 {
        250
    }
    pub fn max_feed_pages() -> u32 {
        40
    }
    pub fn max_listing_pages() -> u32 {
        50
    }

    // HTTP defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; shelfwatch/0.1)".into()
    }
    pub fn timeout() -> u64 {
        20
    }
    pub fn retries() -> u32 {
        3
    }
    pub fn backoff_base() -> u64 {
        1000
    }
    pub fn request_delay() -> u64 {
        400
    }

    // Brand defaults: possessive-apostrophe and no-punctuation spellings
    pub fn brand_aliases() -> Vec<String> {
        vec!["arc'teryx".into(), "arcteryx".into()]
    }

    // Notify defaults
    pub fn currency_label() -> String {
        "CA$".into()
    }
    pub fn accent_color() -> u32 {
        0x2B65EC
    }

    // Snapshot defaults
    pub fn snapshot_path() -> String {
        "snapshot.json".into()
    }
}
