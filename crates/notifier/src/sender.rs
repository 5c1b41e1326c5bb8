//! Message sender trait and implementations.

use std::sync::Arc;

use async_trait::async_trait;
use slack_webhook::{SlackMessage, WebhookClient, WebhookConfig};

use crate::error::NotifierError;

/// Trait for delivering rendered payloads.
///
/// Abstracted to support different transports (webhook, logging, tests).
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Deliver one payload. Called at most once per accepted event.
    async fn send(&self, message: &SlackMessage) -> Result<(), NotifierError>;

    /// Get a human-readable name for this sender.
    fn name(&self) -> &str;
}

#[async_trait]
impl<S: MessageSender + ?Sized> MessageSender for Arc<S> {
    async fn send(&self, message: &SlackMessage) -> Result<(), NotifierError> {
        self.as_ref().send(message).await
    }

    fn name(&self) -> &str {
        self.as_ref().name()
    }
}

/// Sends payloads to a Slack incoming webhook over one reused client.
#[derive(Debug, Clone)]
pub struct WebhookSender {
    client: WebhookClient,
}

impl WebhookSender {
    /// Build a sender for the given webhook configuration.
    pub fn new(config: WebhookConfig) -> Result<Self, NotifierError> {
        let client = WebhookClient::new(config)?;
        Ok(Self { client })
    }

    /// Wrap an existing client.
    pub fn from_client(client: WebhookClient) -> Self {
        Self { client }
    }

    /// Get the underlying client.
    pub fn client(&self) -> &WebhookClient {
        &self.client
    }
}

#[async_trait]
impl MessageSender for WebhookSender {
    async fn send(&self, message: &SlackMessage) -> Result<(), NotifierError> {
        self.client.send(message).await.map_err(NotifierError::from)
    }

    fn name(&self) -> &str {
        "webhook"
    }
}

/// A logging sender for dry runs that logs payloads instead of posting them.
#[derive(Debug, Clone, Default)]
pub struct LoggingSender;

#[async_trait]
impl MessageSender for LoggingSender {
    async fn send(&self, message: &SlackMessage) -> Result<(), NotifierError> {
        let payload = serde_json::to_string(message)
            .map_err(|e| NotifierError::SendFailed(e.to_string()))?;
        tracing::info!(
            "[dry-run] {} as {}: {}",
            message.text,
            message.username.as_deref().unwrap_or("-"),
            payload
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "logging"
    }
}
