//! Configuration for the notifier.

use std::env;
use std::time::Duration;

use slack_webhook::{WebhookConfig, DEFAULT_TIMEOUT};

use crate::error::NotifierError;
use crate::render::{MessageTemplates, DEFAULT_APP_NAME, DEFAULT_ICON_URL};

/// Default body template.
pub const DEFAULT_MESSAGE_TEMPLATE: &str = "{{Message}}";

/// Configuration for one notifier instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifierConfig {
    /// Incoming webhook URL (required).
    pub webhook_url: String,

    /// Channel override. If None, the webhook default channel is used.
    pub channel: Option<String>,

    /// Sender-name template, e.g. `{{Properties.ProcessName}}`.
    pub username: Option<String>,

    /// Sender name when no sender template is set.
    pub app_name: String,

    /// Cooldown per event type, in minutes. Zero disables suppression.
    pub suppression_minutes: u64,

    /// Body template.
    pub message_template: Option<String>,

    /// Attachment template. If None, no attachment is sent.
    pub attachment_template: Option<String>,

    /// Sender icon. If None, the built-in icon is used.
    pub icon_url: Option<String>,

    /// Outbound proxy address.
    pub proxy: Option<String>,

    /// Timeout for one webhook request.
    pub timeout: Duration,
}

impl NotifierConfig {
    /// Create a configuration with defaults for everything but the URL.
    pub fn new(webhook_url: impl Into<String>) -> Self {
        Self {
            webhook_url: webhook_url.into(),
            channel: None,
            username: None,
            app_name: DEFAULT_APP_NAME.to_string(),
            suppression_minutes: 0,
            message_template: Some(DEFAULT_MESSAGE_TEMPLATE.to_string()),
            attachment_template: None,
            icon_url: None,
            proxy: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `SLACK_WEBHOOK_URL`
    ///
    /// Optional env vars:
    /// - `SLACK_CHANNEL` - channel override
    /// - `SLACK_USERNAME` - sender-name template
    /// - `SLACK_APP_NAME` - default sender name (default: Slack Notifier)
    /// - `SLACK_SUPPRESSION_MINUTES` - cooldown per event type (default: 0)
    /// - `SLACK_MESSAGE_TEMPLATE` - body template (default: `{{Message}}`)
    /// - `SLACK_ATTACHMENT_TEMPLATE` - attachment template
    /// - `SLACK_ICON_URL` - sender icon
    /// - `SLACK_PROXY` - outbound proxy
    /// - `SLACK_TIMEOUT_SECS` - request timeout (default: 30)
    pub fn from_env() -> Result<Self, NotifierError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, NotifierError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let webhook_url = get("SLACK_WEBHOOK_URL")
            .ok_or_else(|| NotifierError::Config("SLACK_WEBHOOK_URL not set".to_string()))?;

        let mut config = Self::new(webhook_url);
        config.channel = get("SLACK_CHANNEL");
        config.username = get("SLACK_USERNAME");
        if let Some(app_name) = get("SLACK_APP_NAME") {
            config.app_name = app_name;
        }
        if let Some(minutes) = get("SLACK_SUPPRESSION_MINUTES") {
            config.suppression_minutes = parse_number("SLACK_SUPPRESSION_MINUTES", &minutes)?;
        }
        if let Some(template) = get("SLACK_MESSAGE_TEMPLATE") {
            config.message_template = Some(template);
        }
        config.attachment_template = get("SLACK_ATTACHMENT_TEMPLATE");
        config.icon_url = get("SLACK_ICON_URL");
        config.proxy = get("SLACK_PROXY");
        if let Some(secs) = get("SLACK_TIMEOUT_SECS") {
            let secs = parse_number("SLACK_TIMEOUT_SECS", &secs)?;
            if secs == 0 {
                return Err(NotifierError::Config(
                    "SLACK_TIMEOUT_SECS must be positive".to_string(),
                ));
            }
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Cooldown as a duration.
    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.suppression_minutes.saturating_mul(60))
    }

    /// Transport settings for the webhook client.
    pub fn webhook_config(&self) -> WebhookConfig {
        let mut config = WebhookConfig::new(&self.webhook_url).with_timeout(self.timeout);
        if let Some(ref proxy) = self.proxy {
            config = config.with_proxy(proxy);
        }
        config
    }

    /// Rendering settings.
    pub fn templates(&self) -> MessageTemplates {
        MessageTemplates {
            message: self.message_template.clone(),
            username: self.username.clone(),
            attachment: self.attachment_template.clone(),
            default_username: self.app_name.clone(),
            icon_url: self
                .icon_url
                .clone()
                .unwrap_or_else(|| DEFAULT_ICON_URL.to_string()),
            channel: self.channel.clone(),
        }
    }
}

fn parse_number(key: &str, value: &str) -> Result<u64, NotifierError> {
    value.trim().parse().map_err(|_| {
        NotifierError::Config(format!(
            "{} must be a non-negative integer, got {:?}",
            key, value
        ))
    })
}
