//! Post a single message to a Slack incoming webhook.
//!
//! Run with: cargo run --example post_message
//!
//! Examples:
//!   SLACK_WEBHOOK_URL=https://hooks.slack.com/services/T/B/X cargo run --example post_message
//!   SLACK_WEBHOOK_URL=... SLACK_CHANNEL=#ops cargo run --example post_message "Deploy finished"

use std::env;

use slack_webhook::{Attachment, SlackMessage, WebhookClient, WebhookConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let url = env::var("SLACK_WEBHOOK_URL").map_err(|_| "SLACK_WEBHOOK_URL must be set")?;
    let text = env::args()
        .nth(1)
        .unwrap_or_else(|| "Hello from slack-webhook".to_string());

    let mut config = WebhookConfig::new(url);
    if let Ok(proxy) = env::var("SLACK_PROXY") {
        config = config.with_proxy(proxy);
    }
    let client = WebhookClient::new(config)?;

    let message = SlackMessage::new(format!("[Information] {}", text), text.clone())
        .with_username("slack-webhook example")
        .with_channel(env::var("SLACK_CHANNEL").ok())
        .with_attachment(Attachment::new("#00A000", "sent by the post_message example"));

    println!("Posting: {}", serde_json::to_string_pretty(&message)?);
    client.send(&message).await?;
    println!("Done.");

    Ok(())
}
