//! Configuration types for slack-webhook.

use std::time::Duration;

use url::Url;

use crate::error::WebhookError;

/// Default timeout for a single webhook request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for posting to a Slack incoming webhook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookConfig {
    /// Incoming webhook URL (e.g., "https://hooks.slack.com/services/...").
    pub url: String,
    /// Outbound proxy address. If None, connects directly.
    pub proxy: Option<String>,
    /// Upper bound for one request, connect included.
    pub timeout: Duration,
}

impl WebhookConfig {
    /// Create a new configuration with the given webhook URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            proxy: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Route requests through an outbound proxy.
    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Check that the URL and proxy are usable.
    pub fn validate(&self) -> Result<(), WebhookError> {
        if self.url.trim().is_empty() {
            return Err(WebhookError::Config("webhook URL is empty".to_string()));
        }

        let url = Url::parse(&self.url)
            .map_err(|e| WebhookError::Config(format!("invalid webhook URL: {}", e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(WebhookError::Config(format!(
                "webhook URL must be http or https, got {}",
                url.scheme()
            )));
        }

        if let Some(ref proxy) = self.proxy {
            Url::parse(proxy)
                .map_err(|e| WebhookError::Config(format!("invalid proxy address: {}", e)))?;
        }

        if self.timeout.is_zero() {
            return Err(WebhookError::Config("timeout must be positive".to_string()));
        }

        Ok(())
    }
}
