// src/services/acquire.rs

//! Catalog acquisition service.
//!
//! Builds the current snapshot from the storefront using two mutually
//! exclusive strategies: the paginated structured feed first, the listing
//! crawl as fallback. One run uses exactly one source, so the diff's
//! notion of "new" always refers to a single coherent catalog view.

use std::collections::BTreeSet;
use std::time::Duration;

use serde_json::Value;
use url::Url;

use crate::error::Result;
use crate::filter::BrandFilter;
use crate::models::{Config, DetailProduct, FeedPage, FeedProduct, ProductState, Snapshot};
use crate::normalize;
use crate::services::Storefront;
use crate::utils::html;

/// Which source produced the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquireSource {
    /// Paginated structured feed
    Feed,
    /// Listing-page crawl
    Listing,
}

/// Counters for one acquisition run.
#[derive(Debug, Clone, Copy)]
pub struct AcquireStats {
    pub source: AcquireSource,
    /// Pages fetched from the source
    pub pages: usize,
    /// Raw records or handles considered
    pub seen: usize,
    /// Products that made it into the snapshot
    pub kept: usize,
    /// Records dropped by fetch failure, brand filter, or normalization
    pub skipped: usize,
}

impl AcquireStats {
    fn new(source: AcquireSource) -> Self {
        Self {
            source,
            pages: 0,
            seen: 0,
            kept: 0,
            skipped: 0,
        }
    }
}

/// Service that builds the live snapshot from an injected storefront.
pub struct Acquirer<'a, S> {
    config: &'a Config,
    storefront: &'a S,
    filter: BrandFilter,
    base: Url,
}

impl<'a, S: Storefront> Acquirer<'a, S> {
    /// Create an acquirer over the given transport.
    pub fn new(config: &'a Config, storefront: &'a S) -> Result<Self> {
        Ok(Self {
            filter: BrandFilter::new(&config.brand),
            base: config.base_url()?,
            config,
            storefront,
        })
    }

    /// Build the current snapshot: feed first, listing crawl only when the
    /// feed yields zero qualifying products. Never merges the two.
    pub async fn acquire(&self) -> (Snapshot, AcquireStats) {
        let (snapshot, stats) = self.via_feed().await;
        if !snapshot.is_empty() {
            log::info!("Snapshot via feed: {} products", snapshot.len());
            return (snapshot, stats);
        }

        log::info!("Feed yielded no qualifying products, falling back to listing crawl");
        let (snapshot, stats) = self.via_listing().await;
        log::info!("Snapshot via listing crawl: {} products", snapshot.len());
        (snapshot, stats)
    }

    /// Strategy built on the structured feed. Every record that passes the
    /// brand filter gets one detail fetch to refresh its live fields.
    async fn via_feed(&self) -> (Snapshot, AcquireStats) {
        let mut stats = AcquireStats::new(AcquireSource::Feed);
        let records = self.collect_feed_records(&mut stats).await;

        let mut snapshot = Snapshot::new();
        for record in records {
            stats.seen += 1;
            let Some(raw) = FeedProduct::from_value(record) else {
                stats.skipped += 1;
                continue;
            };
            let title = raw.title.as_deref().unwrap_or("");
            if !self.filter.matches(title, raw.vendor.as_deref(), &raw.tags.to_vec()) {
                stats.skipped += 1;
                continue;
            }
            let Some(mut product) = normalize::from_feed(&raw, &self.base) else {
                stats.skipped += 1;
                continue;
            };
            self.refresh_from_detail(&mut product).await;
            stats.kept += 1;
            snapshot.insert(product.handle.clone(), product);
            self.pause().await;
        }
        (snapshot, stats)
    }

    /// Page through the feed until an empty page, a failed fetch, or the
    /// runaway guard.
    async fn collect_feed_records(&self, stats: &mut AcquireStats) -> Vec<Value> {
        let limit = self.config.store.feed_page_limit;
        let mut records = Vec::new();
        let mut page = 1;
        loop {
            if page > self.config.store.max_feed_pages {
                log::warn!(
                    "Feed pagination stopped at the {}-page guard",
                    self.config.store.max_feed_pages
                );
                break;
            }
            let Some(payload) = self.storefront.feed_page(page, limit).await else {
                break;
            };
            let Ok(feed) = serde_json::from_value::<FeedPage>(payload) else {
                log::debug!("Malformed feed page {page}, stopping pagination");
                break;
            };
            if feed.products.is_empty() {
                break;
            }
            log::info!("Feed page {page}: {} records", feed.products.len());
            stats.pages += 1;
            records.extend(feed.products);
            page += 1;
            self.pause().await;
        }
        records
    }

    /// Refresh `available`, `inventory_quantity`, and `image` with live
    /// detail data. The feed stays authoritative for everything else; a
    /// failed fetch leaves the feed-derived values untouched.
    async fn refresh_from_detail(&self, product: &mut ProductState) {
        let Some(payload) = self.storefront.product_detail(&product.handle).await else {
            return;
        };
        let Some(raw) = DetailProduct::from_value(payload) else {
            return;
        };
        let Some(live) = normalize::from_detail(&raw, &self.base) else {
            return;
        };

        if live.image.is_some() {
            product.image = live.image;
        }
        for (vid, variant) in product.variants.iter_mut() {
            if let Some(live_variant) = live.variants.get(vid) {
                variant.available = live_variant.available;
                if let Some(quantity) = live_variant.inventory_quantity {
                    variant.inventory_quantity = Some(quantity);
                }
            }
        }
    }

    /// Fallback strategy: discover handles from the rendered listing pages,
    /// then fetch each product's detail representation.
    async fn via_listing(&self) -> (Snapshot, AcquireStats) {
        let mut stats = AcquireStats::new(AcquireSource::Listing);
        let handles = self.collect_listing_handles(&mut stats).await;
        log::info!("Listing crawl discovered {} handles", handles.len());

        let mut snapshot = Snapshot::new();
        let total = handles.len();
        for (index, handle) in handles.iter().enumerate() {
            stats.seen += 1;
            match self.product_from_detail(handle).await {
                Some(product) => {
                    snapshot.insert(product.handle.clone(), product);
                    stats.kept += 1;
                }
                None => stats.skipped += 1,
            }
            if (index + 1) % 25 == 0 {
                log::info!(
                    "Handled {}/{} handles (kept {}, skipped {})",
                    index + 1,
                    total,
                    stats.kept,
                    stats.skipped
                );
            }
            self.pause().await;
        }
        (snapshot, stats)
    }

    /// Crawl listing pages accumulating a deduplicated handle set. Stops at
    /// the page cap, on a failed fetch, or when a page after the first
    /// contributes no new handle.
    async fn collect_listing_handles(&self, stats: &mut AcquireStats) -> BTreeSet<String> {
        let mut handles = BTreeSet::new();
        for page in 1..=self.config.store.max_listing_pages {
            let Some(markup) = self.storefront.listing_page(page).await else {
                log::info!("Listing page {page} unavailable, stopping crawl");
                break;
            };
            stats.pages += 1;
            let found = html::extract_product_handles(&markup);
            log::debug!("Listing page {page}: {} handles", found.len());

            let before = handles.len();
            handles.extend(found);
            if handles.len() == before && page > 1 {
                log::info!("No new handles on listing page {page}, stopping crawl");
                break;
            }
            self.pause().await;
        }
        handles
    }

    /// Detail fetch, brand filter, normalize for one discovered handle.
    async fn product_from_detail(&self, handle: &str) -> Option<ProductState> {
        let payload = self.storefront.product_detail(handle).await?;
        let raw = DetailProduct::from_value(payload)?;
        let title = raw.title.as_deref().unwrap_or("");
        if !self.filter.matches(title, raw.vendor.as_deref(), &raw.tags.to_vec()) {
            return None;
        }
        normalize::from_detail(&raw, &self.base)
    }

    async fn pause(&self) {
        let delay = Duration::from_millis(self.config.http.request_delay_ms);
        if delay.as_millis() > 0 {
            tokio::time::sleep(delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::json;

    /// Canned storefront keyed by page and handle, recording every call.
    #[derive(Default)]
    struct FakeStorefront {
        feed_pages: HashMap<u32, Value>,
        details: HashMap<String, Value>,
        listings: HashMap<u32, String>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeStorefront {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Storefront for FakeStorefront {
        async fn feed_page(&self, page: u32, _limit: u32) -> Option<Value> {
            self.calls.lock().unwrap().push(format!("feed:{page}"));
            self.feed_pages.get(&page).cloned()
        }

        async fn product_detail(&self, handle: &str) -> Option<Value> {
            self.calls.lock().unwrap().push(format!("detail:{handle}"));
            self.details.get(handle).cloned()
        }

        async fn listing_page(&self, page: u32) -> Option<String> {
            self.calls.lock().unwrap().push(format!("listing:{page}"));
            self.listings.get(&page).cloned()
        }
    }

    fn test_config() -> Config {
        let mut config = Config::default();
        config.http.request_delay_ms = 0;
        config
    }

    fn feed_record(handle: &str, vendor: &str) -> Value {
        json!({
            "handle": handle,
            "title": format!("{vendor} Jacket"),
            "vendor": vendor,
            "tags": [],
            "images": [{"src": format!("https://cdn.example.com/{handle}.jpg")}],
            "variants": [
                {"id": 1, "title": "S", "option1": "S", "price": "450.00", "available": false}
            ]
        })
    }

    fn detail_record(handle: &str, vendor: &str, available: bool, quantity: i64) -> Value {
        json!({
            "handle": handle,
            "title": format!("{vendor} Jacket"),
            "vendor": vendor,
            "url": format!("/products/{handle}"),
            "tags": [],
            "images": [format!("https://cdn.example.com/{handle}-live.jpg")],
            "variants": [
                {"id": 1, "title": "S", "option1": "S", "price": "450.00",
                 "available": available, "inventory_quantity": quantity}
            ]
        })
    }

    #[tokio::test]
    async fn feed_strategy_refreshes_live_fields_from_detail() {
        let mut fake = FakeStorefront::default();
        fake.feed_pages
            .insert(1, json!({"products": [feed_record("alpha-sv", "Arc'teryx")]}));
        fake.details
            .insert("alpha-sv".into(), detail_record("alpha-sv", "Arc'teryx", true, 4));

        let config = test_config();
        let acquirer = Acquirer::new(&config, &fake).unwrap();
        let (snapshot, stats) = acquirer.acquire().await;

        assert_eq!(stats.source, AcquireSource::Feed);
        assert_eq!(stats.kept, 1);
        let product = &snapshot["alpha-sv"];
        let variant = &product.variants["1"];
        assert!(variant.available);
        assert_eq!(variant.inventory_quantity, Some(4));
        assert_eq!(
            product.image.as_deref(),
            Some("https://cdn.example.com/alpha-sv-live.jpg")
        );
    }

    #[tokio::test]
    async fn failed_detail_fetch_keeps_feed_values() {
        let mut fake = FakeStorefront::default();
        fake.feed_pages
            .insert(1, json!({"products": [feed_record("alpha-sv", "Arc'teryx")]}));
        // No detail canned for the handle

        let config = test_config();
        let acquirer = Acquirer::new(&config, &fake).unwrap();
        let (snapshot, stats) = acquirer.acquire().await;

        assert_eq!(stats.kept, 1);
        let product = &snapshot["alpha-sv"];
        assert!(!product.variants["1"].available);
        assert_eq!(
            product.image.as_deref(),
            Some("https://cdn.example.com/alpha-sv.jpg")
        );
    }

    #[tokio::test]
    async fn feed_pagination_stops_on_empty_page() {
        let mut fake = FakeStorefront::default();
        fake.feed_pages.insert(
            1,
            json!({"products": [feed_record("alpha-sv", "Arc'teryx")]}),
        );
        fake.feed_pages.insert(2, json!({"products": []}));
        fake.details
            .insert("alpha-sv".into(), detail_record("alpha-sv", "Arc'teryx", true, 1));

        let config = test_config();
        let acquirer = Acquirer::new(&config, &fake).unwrap();
        let (snapshot, stats) = acquirer.acquire().await;

        assert_eq!(snapshot.len(), 1);
        assert_eq!(stats.pages, 1);
        let calls = fake.calls();
        assert!(calls.contains(&"feed:2".to_string()));
        assert!(!calls.contains(&"feed:3".to_string()));
    }

    #[tokio::test]
    async fn listing_fallback_runs_when_every_feed_record_fails_the_filter() {
        let mut fake = FakeStorefront::default();
        // The feed responds with records, but none match the brand
        fake.feed_pages
            .insert(1, json!({"products": [feed_record("fleece", "Patagonia")]}));
        fake.listings.insert(
            1,
            r#"<a href="/products/alpha-sv">Alpha</a>"#.to_string(),
        );
        fake.details
            .insert("alpha-sv".into(), detail_record("alpha-sv", "Arc'teryx", true, 2));

        let config = test_config();
        let acquirer = Acquirer::new(&config, &fake).unwrap();
        let (snapshot, stats) = acquirer.acquire().await;

        assert_eq!(stats.source, AcquireSource::Listing);
        assert_eq!(snapshot.len(), 1);
        assert!(snapshot.contains_key("alpha-sv"));

        let calls = fake.calls();
        assert_eq!(calls[0], "feed:1");
        assert!(calls.contains(&"listing:1".to_string()));
    }

    #[tokio::test]
    async fn listing_crawl_stops_when_a_page_adds_nothing_new() {
        let markup = r#"<a href="/products/alpha-sv">A</a> <a href="/products/beta-lt">B</a>"#;
        let mut fake = FakeStorefront::default();
        fake.listings.insert(1, markup.to_string());
        fake.listings.insert(2, markup.to_string());
        fake.listings.insert(3, r#"<a href="/products/gamma">C</a>"#.to_string());
        fake.details
            .insert("alpha-sv".into(), detail_record("alpha-sv", "Arc'teryx", true, 1));
        fake.details
            .insert("beta-lt".into(), detail_record("beta-lt", "Arc'teryx", false, 0));

        let config = test_config();
        let acquirer = Acquirer::new(&config, &fake).unwrap();
        let (snapshot, _) = acquirer.acquire().await;

        assert_eq!(snapshot.len(), 2);
        let calls = fake.calls();
        assert!(calls.contains(&"listing:2".to_string()));
        assert!(!calls.contains(&"listing:3".to_string()));
    }

    #[tokio::test]
    async fn listing_skips_failed_and_foreign_handles() {
        let mut fake = FakeStorefront::default();
        fake.listings.insert(
            1,
            concat!(
                r#"<a href="/products/alpha-sv">A</a>"#,
                r#"<a href="/products/fleece">F</a>"#,
                r#"<a href="/products/ghost">G</a>"#,
            )
            .to_string(),
        );
        fake.details
            .insert("alpha-sv".into(), detail_record("alpha-sv", "Arc'teryx", true, 1));
        fake.details
            .insert("fleece".into(), detail_record("fleece", "Patagonia", true, 1));
        // No detail canned for "ghost"

        let config = test_config();
        let acquirer = Acquirer::new(&config, &fake).unwrap();
        let (snapshot, stats) = acquirer.acquire().await;

        assert_eq!(stats.source, AcquireSource::Listing);
        assert_eq!(stats.kept, 1);
        assert_eq!(stats.skipped, 2);
        assert_eq!(snapshot.len(), 1);
    }
}
