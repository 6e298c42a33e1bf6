// src/notify/webhook.rs

//! Webhook delivery and the no-webhook fallback.

use async_trait::async_trait;
use reqwest::{Client, header};
use serde_json::{Value, json};

use crate::error::Result;
use crate::models::HttpConfig;
use crate::notify::{Message, Notifier};
use crate::utils::http;

/// Posts each message to a webhook endpoint as embed-shaped JSON.
pub struct WebhookNotifier {
    client: Client,
    url: String,
}

impl WebhookNotifier {
    /// Create a notifier posting to the given webhook address.
    pub fn new(config: &HttpConfig, url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: http::build_client(config)?,
            url: url.into(),
        })
    }

    fn payload(message: &Message) -> Value {
        let mut embed = json!({
            "title": message.title,
            "color": message.color,
            "description": message.body.trim(),
        });
        if let Some(thumbnail) = &message.thumbnail {
            embed["thumbnail"] = json!({ "url": thumbnail });
        }
        json!({ "embeds": [embed] })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn send(&self, message: &Message) -> Result<()> {
        let body = serde_json::to_string(&Self::payload(message))?;
        let response = self
            .client
            .post(&self.url)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() >= 300 {
            let text = response.text().await.unwrap_or_default();
            let shown: String = text.chars().take(200).collect();
            log::warn!("Webhook responded HTTP {status}: {shown}");
        }
        Ok(())
    }
}

/// Fallback sink used when no webhook is configured: messages land in the
/// log instead of being dropped.
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, message: &Message) -> Result<()> {
        log::info!("No webhook configured, printing instead:\n{}\n{}", message.title, message.body);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(thumbnail: Option<&str>) -> Message {
        Message {
            title: "🔔 Restock".to_string(),
            color: 0x2B65EC,
            body: "• Name: Alpha SV Jacket\n".to_string(),
            thumbnail: thumbnail.map(str::to_string),
        }
    }

    #[test]
    fn payload_is_a_single_embed() {
        let payload = WebhookNotifier::payload(&message(Some("https://cdn.example.com/a.jpg")));

        let embeds = payload["embeds"].as_array().unwrap();
        assert_eq!(embeds.len(), 1);
        assert_eq!(embeds[0]["title"], "🔔 Restock");
        assert_eq!(embeds[0]["color"], 0x2B65EC);
        assert_eq!(embeds[0]["description"], "• Name: Alpha SV Jacket");
        assert_eq!(embeds[0]["thumbnail"]["url"], "https://cdn.example.com/a.jpg");
    }

    #[test]
    fn payload_omits_missing_thumbnail() {
        let payload = WebhookNotifier::payload(&message(None));
        assert!(payload["embeds"][0].get("thumbnail").is_none());
    }
}
