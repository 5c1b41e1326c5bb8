//! Slack incoming-webhook HTTP client.

use reqwest::{Client, Proxy};
use tracing::{debug, info};

use crate::config::WebhookConfig;
use crate::error::WebhookError;
use crate::types::SlackMessage;

/// Client for posting messages to a Slack incoming webhook.
///
/// Holds one pooled `reqwest::Client`; clone it to share connections.
#[derive(Clone)]
pub struct WebhookClient {
    http: Client,
    config: WebhookConfig,
}

impl WebhookClient {
    /// Build a client for the given configuration.
    pub fn new(config: WebhookConfig) -> Result<Self, WebhookError> {
        config.validate()?;

        let mut builder = Client::builder().timeout(config.timeout);
        if let Some(ref proxy) = config.proxy {
            builder = builder.proxy(Proxy::all(proxy.as_str()).map_err(WebhookError::Http)?);
            info!("Routing webhook requests through proxy {}", proxy);
        }
        let http = builder.build().map_err(WebhookError::Http)?;

        Ok(Self { http, config })
    }

    /// Post a message to the configured webhook URL.
    pub async fn send(&self, message: &SlackMessage) -> Result<(), WebhookError> {
        self.post(&self.config.url, message).await
    }

    /// Post a message to an explicit webhook URL.
    ///
    /// Makes exactly one attempt. A non-2xx answer is reported as
    /// [`WebhookError::Status`] with the response body.
    pub async fn post(&self, url: &str, message: &SlackMessage) -> Result<(), WebhookError> {
        let body = serde_json::to_vec(message)?;
        debug!("POST webhook ({} bytes)", body.len());

        let response = self
            .http
            .post(url)
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
            .map_err(WebhookError::Http)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WebhookError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }

    /// Get the configuration.
    pub fn config(&self) -> &WebhookConfig {
        &self.config
    }

    /// Get the underlying HTTP client.
    pub fn http_client(&self) -> &Client {
        &self.http
    }
}

impl std::fmt::Debug for WebhookClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookClient")
            .field("proxy", &self.config.proxy)
            .field("timeout", &self.config.timeout)
            .finish()
    }
}
