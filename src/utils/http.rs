// src/utils/http.rs

//! HTTP fetch helpers with bounded retry.
//!
//! Every fetch runs through one policy: up to the configured number of
//! attempts, linear backoff between them, and 403/404 treated as terminal
//! for that call. Expected network conditions never surface as errors;
//! callers receive a [`FetchOutcome`] and decide what "no data" means.

use std::time::Duration;

use reqwest::{Client, StatusCode, header};
use serde_json::Value;

use crate::error::Result;
use crate::models::HttpConfig;

/// Outcome of one fetch after the retry policy ran.
#[derive(Debug)]
pub enum FetchOutcome<T> {
    /// Usable payload.
    Ok(T),
    /// 403/404: the resource will not appear on retry.
    Gone,
    /// Retry budget exhausted, or the body was unusable.
    Failed,
}

impl<T> FetchOutcome<T> {
    /// Collapse to an `Option`; both failure modes mean "no data".
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Ok(value) => Some(value),
            Self::Gone | Self::Failed => None,
        }
    }
}

/// Build a reqwest client with the configured identity and timeout.
///
/// Both the fetcher and the webhook notifier go through this, so every
/// outbound request carries the same headers.
pub fn build_client(config: &HttpConfig) -> Result<Client> {
    Ok(Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?)
}

/// HTTP fetcher with configured identity headers and connection reuse.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    retries: u32,
    backoff_base: Duration,
}

impl Fetcher {
    /// Build a fetcher from the HTTP configuration.
    pub fn new(config: &HttpConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(config)?,
            retries: config.retries.max(1),
            backoff_base: Duration::from_millis(config.backoff_base_ms),
        })
    }

    /// GET a URL and parse the body as JSON.
    ///
    /// A 2xx response whose content type does not look like JSON (and whose
    /// URL does not end in `.js`/`.json`) counts as no data immediately.
    pub async fn json(&self, url: &str) -> FetchOutcome<Value> {
        for attempt in 1..=self.retries {
            match self.client.get(url).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let content_type = response
                            .headers()
                            .get(header::CONTENT_TYPE)
                            .and_then(|v| v.to_str().ok())
                            .unwrap_or("")
                            .to_string();

                        if !wants_json_body(&content_type, url) {
                            log::warn!("GET {url}: unexpected content type {content_type:?}");
                            return FetchOutcome::Failed;
                        }

                        match response.text().await {
                            Ok(body) => match serde_json::from_str(&body) {
                                Ok(value) => return FetchOutcome::Ok(value),
                                Err(error) => {
                                    log::warn!("GET {url}: JSON parse failed: {error}");
                                }
                            },
                            Err(error) => {
                                log::warn!("GET {url}: body read failed: {error}");
                            }
                        }
                    } else {
                        log::warn!("GET {url} -> HTTP {status}");
                        if is_terminal(status) {
                            return FetchOutcome::Gone;
                        }
                    }
                }
                Err(error) => {
                    log::warn!("GET {url} failed: {error}");
                }
            }

            if attempt < self.retries {
                tokio::time::sleep(self.backoff_base * attempt).await;
            }
        }
        FetchOutcome::Failed
    }

    /// GET a URL as text.
    pub async fn text(&self, url: &str) -> FetchOutcome<String> {
        for attempt in 1..=self.retries {
            match self.client.get(url).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        match response.text().await {
                            Ok(body) => return FetchOutcome::Ok(body),
                            Err(error) => {
                                log::warn!("GET {url}: body read failed: {error}");
                            }
                        }
                    } else {
                        log::warn!("GET {url} -> HTTP {status}");
                        if is_terminal(status) {
                            return FetchOutcome::Gone;
                        }
                    }
                }
                Err(error) => {
                    log::warn!("GET {url} failed: {error}");
                }
            }

            if attempt < self.retries {
                tokio::time::sleep(self.backoff_base * attempt).await;
            }
        }
        FetchOutcome::Failed
    }
}

/// Whether an OK response should be parsed as JSON.
fn wants_json_body(content_type: &str, url: &str) -> bool {
    content_type.to_ascii_lowercase().contains("json")
        || url.ends_with(".js")
        || url.ends_with(".json")
}

/// 403/404 short-circuit the retry budget.
fn is_terminal(status: StatusCode) -> bool {
    status == StatusCode::FORBIDDEN || status == StatusCode::NOT_FOUND
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_body_detection() {
        assert!(wants_json_body("application/json", "https://x/feed"));
        assert!(wants_json_body(
            "application/json; charset=utf-8",
            "https://x/feed"
        ));
        assert!(wants_json_body("text/html", "https://x/products/alpha.js"));
        assert!(wants_json_body("", "https://x/products.json"));
        assert!(!wants_json_body("text/html", "https://x/collections/all"));
    }

    #[test]
    fn terminal_statuses() {
        assert!(is_terminal(StatusCode::FORBIDDEN));
        assert!(is_terminal(StatusCode::NOT_FOUND));
        assert!(!is_terminal(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(!is_terminal(StatusCode::TOO_MANY_REQUESTS));
    }

    #[test]
    fn outcome_collapses_to_option() {
        assert_eq!(FetchOutcome::Ok(7).into_option(), Some(7));
        assert_eq!(FetchOutcome::<u8>::Gone.into_option(), None);
        assert_eq!(FetchOutcome::<u8>::Failed.into_option(), None);
    }
}
