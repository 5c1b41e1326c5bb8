//! Slack incoming-webhook client library.
//!
//! This crate provides a Rust client for posting messages to a Slack
//! incoming webhook. It supports:
//!
//! - Building webhook payloads (title, mrkdwn body, sender, icon, channel)
//! - Color-coded attachments
//! - Outbound proxies and bounded request timeouts
//!
//! # Example
//!
//! ```no_run
//! use slack_webhook::{Attachment, SlackMessage, WebhookClient, WebhookConfig};
//!
//! # async fn example() -> Result<(), slack_webhook::WebhookError> {
//! let config = WebhookConfig::new("https://hooks.slack.com/services/T000/B000/XXXX");
//! let client = WebhookClient::new(config)?;
//!
//! let message = SlackMessage::new("[Error] Disk full", "Disk *full* on db-01")
//!     .with_username("Monitoring")
//!     .with_attachment(Attachment::new("#e03836", "free: 0 bytes"));
//!
//! client.send(&message).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod types;

pub use client::WebhookClient;
pub use config::{WebhookConfig, DEFAULT_TIMEOUT};
pub use error::WebhookError;
pub use types::*;

/// Crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
