//! Utility functions and helpers.

pub mod html;
pub mod http;
pub mod money;

use url::Url;

/// Resolve a potentially relative path against a base URL.
pub fn join_url(base: &Url, path: &str) -> String {
    base.join(path)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| path.to_string())
}
