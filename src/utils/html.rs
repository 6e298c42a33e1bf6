// src/utils/html.rs

//! Product-link extraction from listing-page markup.

use std::collections::BTreeSet;

use scraper::{Html, Selector};

/// Collect every product handle linked from a listing page.
///
/// Counts anchors whose href is a relative path shaped `/products/<handle>`;
/// query strings, fragments, and trailing path segments are ignored.
pub fn extract_product_handles(html: &str) -> BTreeSet<String> {
    let mut handles = BTreeSet::new();
    let Ok(anchors) = Selector::parse("a[href]") else {
        return handles;
    };
    let document = Html::parse_document(html);

    for anchor in document.select(&anchors) {
        if let Some(href) = anchor.value().attr("href") {
            if let Some(handle) = handle_from_href(href) {
                handles.insert(handle);
            }
        }
    }
    handles
}

/// Extract the handle from a relative `/products/<handle>` href.
fn handle_from_href(href: &str) -> Option<String> {
    let path = href.split(['?', '#']).next().unwrap_or(href);
    let mut segments = path.strip_prefix('/')?.split('/').filter(|s| !s.is_empty());

    match (segments.next(), segments.next()) {
        (Some(first), Some(handle)) if first.eq_ignore_ascii_case("products") => {
            Some(handle.to_string())
        }
        _ => None,
    }
}
