// src/filter.rs

//! Tracked-brand predicate.

use crate::models::BrandConfig;

/// Decides whether a raw record belongs to the tracked brand.
///
/// Case-insensitive substring match against the vendor field first, then
/// the title, then each tag, short-circuiting on the first hit. The filter
/// runs before anything enters the snapshot, so foreign-brand records are
/// never persisted.
#[derive(Debug, Clone)]
pub struct BrandFilter {
    /// Accepted spellings, lowercased once at construction
    aliases: Vec<String>,
}

impl BrandFilter {
    /// Build a filter from the brand configuration.
    pub fn new(config: &BrandConfig) -> Self {
        Self {
            aliases: config
                .aliases
                .iter()
                .map(|alias| alias.trim().to_lowercase())
                .filter(|alias| !alias.is_empty())
                .collect(),
        }
    }

    /// Whether the record's vendor, title, or any tag names the brand.
    pub fn matches(&self, title: &str, vendor: Option<&str>, tags: &[String]) -> bool {
        if self.hit(&vendor.unwrap_or("").to_lowercase()) {
            return true;
        }
        if self.hit(&title.to_lowercase()) {
            return true;
        }
        tags.iter().any(|tag| self.hit(&tag.to_lowercase()))
    }

    fn hit(&self, haystack: &str) -> bool {
        self.aliases.iter().any(|alias| haystack.contains(alias))
    }
}

impl Default for BrandFilter {
    fn default() -> Self {
        Self::new(&BrandConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vendor_spellings_match() {
        let filter = BrandFilter::default();
        assert!(filter.matches("Beta Jacket", Some("ARC'TERYX"), &[]));
        assert!(filter.matches("Beta Jacket", Some("arcteryx canada"), &[]));
    }

    #[test]
    fn title_matches_without_vendor() {
        let filter = BrandFilter::default();
        assert!(filter.matches("Arcteryx Beta Jacket", None, &[]));
    }

    #[test]
    fn tag_matches_as_last_resort() {
        let filter = BrandFilter::default();
        let tags = vec!["outdoor".to_string(), "ARCTERYX-gear".to_string()];
        assert!(filter.matches("Shell Jacket", Some("Distributor"), &tags));
    }

    #[test]
    fn foreign_brand_is_rejected() {
        let filter = BrandFilter::default();
        let tags = vec!["outdoor".to_string()];
        assert!(!filter.matches("Shell Jacket", Some("Patagonia"), &tags));
        assert!(!filter.matches("", None, &[]));
    }

    #[test]
    fn custom_aliases_drive_matching() {
        let filter = BrandFilter::new(&BrandConfig {
            aliases: vec!["  Rab ".to_string(), String::new()],
        });
        assert!(filter.matches("Rab Microlight", None, &[]));
        assert!(!filter.matches("Arcteryx Beta", None, &[]));
    }
}
