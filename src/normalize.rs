// src/normalize.rs

//! Raw record to canonical state conversion.
//!
//! Both source schemas converge here: [`from_feed`] for structured-feed
//! records, [`from_detail`] for per-handle detail payloads. The two share
//! one variant normalization path, so a snapshot never depends on which
//! source a product came from.

use std::collections::BTreeMap;

use serde_json::Value;
use url::Url;

use crate::models::{DetailProduct, FeedProduct, ProductState, RawVariant, VariantState};
use crate::utils::{self, money};

/// Convert one structured-feed record into canonical product state.
///
/// Returns `None` when the record has no handle or none of its variants
/// survive normalization. The product URL is rebuilt from the handle; the
/// feed carries no canonical one.
pub fn from_feed(raw: &FeedProduct, base: &Url) -> Option<ProductState> {
    let handle = usable_handle(raw.handle.as_deref())?;
    let variants = normalize_variants(&raw.variants, handle);
    if variants.is_empty() {
        return None;
    }
    Some(ProductState {
        handle: handle.to_string(),
        title: raw.title.clone().unwrap_or_default(),
        vendor: raw.vendor.clone(),
        url: utils::join_url(base, &format!("/products/{handle}")),
        image: first_image(&raw.images),
        variants,
    })
}

/// Convert one detail payload into canonical product state.
///
/// Detail payloads usually report their own canonical `url`, typically as a
/// relative path; it is joined onto the base so the stored URL is always
/// absolute. When absent, the URL is rebuilt from the handle as for feed
/// records.
pub fn from_detail(raw: &DetailProduct, base: &Url) -> Option<ProductState> {
    let handle = usable_handle(raw.handle.as_deref())?;
    let variants = normalize_variants(&raw.variants, handle);
    if variants.is_empty() {
        return None;
    }
    let url = match raw.url.as_deref() {
        Some(path) if !path.is_empty() => utils::join_url(base, path),
        _ => utils::join_url(base, &format!("/products/{handle}")),
    };
    Some(ProductState {
        handle: handle.to_string(),
        title: raw.title.clone().unwrap_or_default(),
        vendor: raw.vendor.clone(),
        url,
        image: first_image(&raw.images),
        variants,
    })
}

fn usable_handle(handle: Option<&str>) -> Option<&str> {
    handle.filter(|h| !h.is_empty())
}

/// Normalize every variant sub-record, keyed by its id rendered as a string.
///
/// A sub-record without a usable id is dropped; the rest of the product
/// keeps going.
fn normalize_variants(raw: &[RawVariant], handle: &str) -> BTreeMap<String, VariantState> {
    let mut variants = BTreeMap::new();
    for variant in raw {
        let Some(id) = variant_id(&variant.id) else {
            log::debug!("Dropping variant without usable id on {handle}");
            continue;
        };
        variants.insert(
            id.to_string(),
            VariantState {
                id,
                title: variant.title.clone().unwrap_or_default(),
                option1: variant.option1.clone(),
                option2: variant.option2.clone(),
                option3: variant.option3.clone(),
                sku: variant.sku.clone(),
                price: money::parse_price(&variant.price),
                available: variant.available.unwrap_or(false),
                inventory_quantity: variant.inventory_quantity.as_i64(),
            },
        );
    }
    variants
}

/// Variant ids arrive as JSON integers or, on some storefronts, as digit
/// strings. Anything else disqualifies the variant.
fn variant_id(raw: &Value) -> Option<i64> {
    match raw {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// First image of the record, tolerating both source shapes: the feed nests
/// the URL under `src`, the detail endpoint ships bare strings.
fn first_image(images: &[Value]) -> Option<String> {
    let src = match images.first()? {
        Value::String(url) => url.as_str(),
        Value::Object(obj) => obj.get("src")?.as_str()?,
        _ => return None,
    };
    if src.is_empty() {
        None
    } else {
        Some(src.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn base() -> Url {
        Url::parse("https://store.example.com/").unwrap()
    }

    fn feed_record(value: Value) -> FeedProduct {
        FeedProduct::from_value(value).unwrap()
    }

    fn detail_record(value: Value) -> DetailProduct {
        DetailProduct::from_value(value).unwrap()
    }

    #[test]
    fn feed_record_normalizes_fully() {
        let raw = feed_record(json!({
            "handle": "alpha-sv",
            "title": "Alpha SV Jacket",
            "vendor": "Arc'teryx",
            "images": [{"src": "https://cdn.example.com/a.jpg"}],
            "variants": [
                {"id": 11, "title": "Black / S", "option1": "Black", "option2": "S",
                 "sku": "X001", "price": "45.00", "available": true, "inventory_quantity": 3},
                {"id": 12, "title": "Black / M", "price": 12345}
            ]
        }));

        let product = from_feed(&raw, &base()).unwrap();
        assert_eq!(product.handle, "alpha-sv");
        assert_eq!(product.url, "https://store.example.com/products/alpha-sv");
        assert_eq!(product.image.as_deref(), Some("https://cdn.example.com/a.jpg"));
        assert_eq!(product.variants.len(), 2);

        let small = &product.variants["11"];
        assert_eq!(small.price, 45.0);
        assert!(small.available);
        assert_eq!(small.inventory_quantity, Some(3));

        let medium = &product.variants["12"];
        assert_eq!(medium.price, 123.45);
        assert!(!medium.available);
        assert_eq!(medium.inventory_quantity, None);
    }

    #[test]
    fn missing_handle_drops_the_record() {
        let raw = feed_record(json!({"title": "No Handle", "variants": [{"id": 1}]}));
        assert!(from_feed(&raw, &base()).is_none());

        let raw = detail_record(json!({"handle": "", "variants": [{"id": 1}]}));
        assert!(from_detail(&raw, &base()).is_none());
    }

    #[test]
    fn zero_surviving_variants_drop_the_record() {
        let raw = feed_record(json!({"handle": "ghost", "variants": []}));
        assert!(from_feed(&raw, &base()).is_none());

        // All ids unusable, so no variant survives
        let raw = feed_record(json!({
            "handle": "ghost",
            "variants": [{"id": null, "price": "10.00"}, {"id": {"nested": 1}}]
        }));
        assert!(from_feed(&raw, &base()).is_none());
    }

    #[test]
    fn digit_string_ids_are_accepted() {
        let raw = feed_record(json!({
            "handle": "beta-lt",
            "variants": [{"id": "4411", "price": "10.00"}]
        }));
        let product = from_feed(&raw, &base()).unwrap();
        assert_eq!(product.variants["4411"].id, 4411);
    }

    #[test]
    fn detail_url_is_joined_onto_the_base() {
        let raw = detail_record(json!({
            "handle": "beta-lt",
            "url": "/products/beta-lt",
            "variants": [{"id": 7}]
        }));
        let product = from_detail(&raw, &base()).unwrap();
        assert_eq!(product.url, "https://store.example.com/products/beta-lt");

        let raw = detail_record(json!({"handle": "beta-lt", "variants": [{"id": 7}]}));
        let product = from_detail(&raw, &base()).unwrap();
        assert_eq!(product.url, "https://store.example.com/products/beta-lt");
    }

    #[test]
    fn detail_images_are_bare_strings() {
        let raw = detail_record(json!({
            "handle": "beta-lt",
            "images": ["https://cdn.example.com/b.jpg", "https://cdn.example.com/c.jpg"],
            "variants": [{"id": 7}]
        }));
        let product = from_detail(&raw, &base()).unwrap();
        assert_eq!(product.image.as_deref(), Some("https://cdn.example.com/b.jpg"));
    }

    #[test]
    fn blank_or_odd_images_normalize_to_none() {
        let raw = detail_record(json!({
            "handle": "beta-lt",
            "images": [""],
            "variants": [{"id": 7}]
        }));
        assert_eq!(from_detail(&raw, &base()).unwrap().image, None);

        let raw = feed_record(json!({
            "handle": "beta-lt",
            "images": [42],
            "variants": [{"id": 7}]
        }));
        assert_eq!(from_feed(&raw, &base()).unwrap().image, None);
    }

    #[test]
    fn quantity_must_be_a_concrete_integer() {
        let raw = feed_record(json!({
            "handle": "beta-lt",
            "variants": [{"id": 7, "inventory_quantity": "lots"}]
        }));
        let product = from_feed(&raw, &base()).unwrap();
        assert_eq!(product.variants["7"].inventory_quantity, None);
    }
}
