//! Notification dispatch.
//!
//! The pipeline renders each change event into one [`Message`] (see
//! [`format`]) and hands it to a [`Notifier`]. Delivery is fire-and-forget:
//! a failed send is logged by the caller and never affects the run.

pub mod format;
pub mod webhook;

use async_trait::async_trait;

use crate::error::Result;

// Re-export for convenience
pub use webhook::{LogNotifier, WebhookNotifier};

/// Fully-formed notification payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    /// Short headline naming the event kind
    pub title: String,
    /// Accent color for sinks that render one
    pub color: u32,
    /// Free-text body
    pub body: String,
    /// Product thumbnail, when the source provided one
    pub thumbnail: Option<String>,
}

/// Outbound notification sink.
#[async_trait]
pub trait Notifier {
    /// Deliver one message. An `Err` means the transport itself failed;
    /// callers log it and carry on.
    async fn send(&self, message: &Message) -> Result<()>;
}
