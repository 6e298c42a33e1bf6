//! Canonical product and variant state.
//!
//! Both acquisition schemas normalize into these shapes; the snapshot file
//! on disk is the serialized [`Snapshot`] mapping and nothing else.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Full tracked catalog state captured by one run, keyed by product handle.
///
/// A `BTreeMap` keeps serialization and diff iteration deterministic.
pub type Snapshot = BTreeMap<String, ProductState>;

/// One purchasable configuration (SKU level) of a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantState {
    /// Stable variant identifier, unique within a product
    pub id: i64,

    /// Variant title (usually the option values joined)
    pub title: String,

    /// First free-text option slot (commonly color)
    pub option1: Option<String>,

    /// Second free-text option slot (commonly size)
    pub option2: Option<String>,

    /// Third free-text option slot
    pub option3: Option<String>,

    /// Merchant SKU code
    pub sku: Option<String>,

    /// Price as a rounded monetary decimal (2 fraction digits), currency-agnostic
    pub price: f64,

    /// Whether the variant is currently purchasable
    pub available: bool,

    /// Units on hand; `None` means unknown, not zero
    pub inventory_quantity: Option<i64>,
}

/// A brand-filtered product with its variant map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductState {
    /// Stable URL-safe slug, unique within the catalog
    pub handle: String,

    /// Product display title
    pub title: String,

    /// Vendor/brand field as reported by the source
    pub vendor: Option<String>,

    /// Canonical product page URL
    pub url: String,

    /// Primary image URL, when the source exposes one
    pub image: Option<String>,

    /// Variants keyed by the variant id rendered as a string
    pub variants: BTreeMap<String, VariantState>,
}

impl ProductState {
    /// Representative variant: the first entry in variant-map order.
    ///
    /// Map order is the lexicographic order of the id strings, so the pick
    /// is stable across runs regardless of source ordering.
    pub fn first_variant(&self) -> Option<&VariantState> {
        self.variants.values().next()
    }

    /// Number of variants tracked for this product.
    pub fn variant_count(&self) -> usize {
        self.variants.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variant(id: i64, title: &str) -> VariantState {
        VariantState {
            id,
            title: title.to_string(),
            option1: Some("Black".to_string()),
            option2: Some("M".to_string()),
            option3: None,
            sku: Some(format!("SKU-{id}")),
            price: 99.99,
            available: true,
            inventory_quantity: Some(2),
        }
    }

    #[test]
    fn first_variant_is_stable() {
        let mut variants = BTreeMap::new();
        variants.insert("200".to_string(), variant(200, "B"));
        variants.insert("100".to_string(), variant(100, "A"));

        let product = ProductState {
            handle: "alpha-jacket".to_string(),
            title: "Alpha Jacket".to_string(),
            vendor: Some("Arc'teryx".to_string()),
            url: "https://store.example.com/products/alpha-jacket".to_string(),
            image: None,
            variants,
        };

        assert_eq!(product.variant_count(), 2);
        assert_eq!(product.first_variant().map(|v| v.id), Some(100));
    }

    #[test]
    fn state_round_trips_through_json() {
        let mut variants = BTreeMap::new();
        variants.insert("42".to_string(), variant(42, "Black / M"));

        let product = ProductState {
            handle: "beta-sl".to_string(),
            title: "Beta SL".to_string(),
            vendor: None,
            url: "https://store.example.com/products/beta-sl".to_string(),
            image: Some("https://cdn.example.com/beta.jpg".to_string()),
            variants,
        };

        let json = serde_json::to_string(&product).unwrap();
        let back: ProductState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, product);
    }
}
