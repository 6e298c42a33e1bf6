// src/services/storefront.rs

//! Storefront transport seam.
//!
//! The acquirer talks to the shop through the [`Storefront`] trait instead
//! of an ambient HTTP session, so tests can drive it with canned payloads.
//! Every operation returns `Option`: by the time a call resolves, retries
//! and terminal statuses have already been absorbed and `None` simply means
//! "no data for this call".

use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use crate::error::Result;
use crate::models::Config;
use crate::utils::{self, http::Fetcher};

/// Read-only view of a storefront's three public surfaces.
#[async_trait]
pub trait Storefront {
    /// One page of the paginated structured feed, as raw JSON.
    async fn feed_page(&self, page: u32, limit: u32) -> Option<Value>;

    /// The per-handle detail payload, as raw JSON.
    async fn product_detail(&self, handle: &str) -> Option<Value>;

    /// The rendered markup of one listing page.
    async fn listing_page(&self, page: u32) -> Option<String>;
}

/// Production transport: the configured HTTP fetcher plus the endpoint
/// URL scheme shared by this family of storefronts.
pub struct HttpStorefront {
    fetcher: Fetcher,
    base: Url,
}

impl HttpStorefront {
    /// Build the transport from the application configuration.
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            fetcher: Fetcher::new(&config.http)?,
            base: config.base_url()?,
        })
    }

    fn feed_url(&self, page: u32, limit: u32) -> String {
        utils::join_url(&self.base, &format!("/products.json?limit={limit}&page={page}"))
    }

    fn detail_url(&self, handle: &str) -> String {
        utils::join_url(&self.base, &format!("/products/{handle}.js"))
    }

    fn listing_url(&self, page: u32) -> String {
        utils::join_url(&self.base, &format!("/collections/all?page={page}"))
    }
}

#[async_trait]
impl Storefront for HttpStorefront {
    async fn feed_page(&self, page: u32, limit: u32) -> Option<Value> {
        self.fetcher.json(&self.feed_url(page, limit)).await.into_option()
    }

    async fn product_detail(&self, handle: &str) -> Option<Value> {
        self.fetcher.json(&self.detail_url(handle)).await.into_option()
    }

    async fn listing_page(&self, page: u32) -> Option<String> {
        self.fetcher.text(&self.listing_url(page)).await.into_option()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport() -> HttpStorefront {
        let mut config = Config::default();
        config.store.base_url = "https://shop.example.com".to_string();
        HttpStorefront::new(&config).unwrap()
    }

    #[test]
    fn feed_url_carries_limit_and_page() {
        assert_eq!(
            transport().feed_url(3, 250),
            "https://shop.example.com/products.json?limit=250&page=3"
        );
    }

    #[test]
    fn detail_url_targets_the_js_representation() {
        assert_eq!(
            transport().detail_url("alpha-sv"),
            "https://shop.example.com/products/alpha-sv.js"
        );
    }

    #[test]
    fn listing_url_pages_the_default_collection() {
        assert_eq!(
            transport().listing_url(2),
            "https://shop.example.com/collections/all?page=2"
        );
    }
}
