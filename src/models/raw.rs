//! Raw product records as the storefront serves them.
//!
//! Two schemas exist for the same catalog: the paginated structured feed and
//! the per-handle detail endpoint. They are kept as distinct typed shapes
//! (not one flexible map) and converge in [`crate::normalize`]. Fields the
//! sources render inconsistently (price, inventory quantity, images) stay
//! as [`serde_json::Value`] leaves so one odd field never sinks the record.

use serde::Deserialize;
use serde_json::Value;

/// One page of the structured feed: `{"products": [...]}`.
///
/// Records are decoded individually afterwards so a single malformed entry
/// is skipped without discarding its page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedPage {
    #[serde(default)]
    pub products: Vec<Value>,
}

/// Product record in the structured-feed schema.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedProduct {
    #[serde(default)]
    pub handle: Option<String>,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub vendor: Option<String>,

    #[serde(default)]
    pub tags: RawTags,

    /// Array of image objects; the URL nests under `src`
    #[serde(default)]
    pub images: Vec<Value>,

    #[serde(default)]
    pub variants: Vec<RawVariant>,
}

impl FeedProduct {
    /// Decode one raw feed record, or `None` when the shape is unusable.
    pub fn from_value(value: Value) -> Option<Self> {
        match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(error) => {
                log::debug!("Skipping malformed feed record: {error}");
                None
            }
        }
    }
}

/// Product record in the per-handle detail schema.
#[derive(Debug, Clone, Deserialize)]
pub struct DetailProduct {
    #[serde(default)]
    pub handle: Option<String>,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub vendor: Option<String>,

    /// Canonical product URL when the endpoint reports one
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub tags: RawTags,

    /// Flat array of image URL strings
    #[serde(default)]
    pub images: Vec<Value>,

    #[serde(default)]
    pub variants: Vec<RawVariant>,
}

impl DetailProduct {
    /// Decode one raw detail payload, or `None` when the shape is unusable.
    pub fn from_value(value: Value) -> Option<Self> {
        match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(error) => {
                log::debug!("Skipping malformed detail record: {error}");
                None
            }
        }
    }
}

/// Variant sub-record shared by both product schemas.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawVariant {
    /// Variant id; anything but an integer (or digit string) counts as missing
    #[serde(default)]
    pub id: Value,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub option1: Option<String>,

    #[serde(default)]
    pub option2: Option<String>,

    #[serde(default)]
    pub option3: Option<String>,

    #[serde(default)]
    pub sku: Option<String>,

    /// String, integer, or decimal depending on the source
    #[serde(default)]
    pub price: Value,

    #[serde(default)]
    pub available: Option<bool>,

    /// Integer when tracked; missing or junk means unknown
    #[serde(default)]
    pub inventory_quantity: Value,
}

/// Tags arrive as an array of strings or as one comma-joined string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawTags {
    List(Vec<String>),
    Joined(String),
}

impl Default for RawTags {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

impl RawTags {
    /// Tags as a flat list, splitting the joined form on commas.
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            Self::List(tags) => tags.clone(),
            Self::Joined(joined) => joined
                .split(',')
                .map(|tag| tag.trim().to_string())
                .filter(|tag| !tag.is_empty())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn feed_record_decodes_with_mixed_price_shapes() {
        let record = FeedProduct::from_value(json!({
            "handle": "alpha-sv",
            "title": "Alpha SV",
            "vendor": "Arc'teryx",
            "tags": ["shell", "goretex"],
            "images": [{"src": "https://cdn.example.com/a.jpg"}],
            "variants": [
                {"id": 1, "title": "S", "price": "45.00"},
                {"id": 2, "title": "M", "price": 12345}
            ]
        }))
        .unwrap();

        assert_eq!(record.handle.as_deref(), Some("alpha-sv"));
        assert_eq!(record.variants.len(), 2);
        assert!(record.variants[0].price.is_string());
        assert!(record.variants[1].price.is_number());
    }

    #[test]
    fn detail_record_tolerates_missing_fields() {
        let record = DetailProduct::from_value(json!({
            "handle": "beta-lt",
            "variants": [{"id": 7}]
        }))
        .unwrap();

        assert_eq!(record.title, None);
        assert!(record.images.is_empty());
        assert_eq!(record.variants[0].available, None);
        assert!(record.variants[0].inventory_quantity.is_null());
    }

    #[test]
    fn unusable_shape_is_rejected() {
        assert!(FeedProduct::from_value(json!("not an object")).is_none());
        assert!(DetailProduct::from_value(json!(42)).is_none());
    }

    #[test]
    fn tags_accept_list_and_joined_forms() {
        let list = RawTags::List(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(list.to_vec(), vec!["a", "b"]);

        let joined = RawTags::Joined("alpine, arcteryx , ".to_string());
        assert_eq!(joined.to_vec(), vec!["alpine", "arcteryx"]);
    }
}
