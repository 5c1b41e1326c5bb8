//! Turns an event into a Slack webhook payload.

use std::sync::Arc;

use slack_webhook::{Attachment, SlackMessage};
use tracing::debug;

use crate::error::RenderError;
use crate::event::Event;
use crate::template::{PlaceholderEngine, RenderContext, TemplateEngine};

/// Icon used when none is configured.
pub const DEFAULT_ICON_URL: &str = "https://getseq.net/images/nuget/seq-apps.png";

/// Sender name used when none is configured.
pub const DEFAULT_APP_NAME: &str = "Slack Notifier";

/// Template and identity settings for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTemplates {
    /// Body template. Blank means "use the rendered message".
    pub message: Option<String>,
    /// Sender-name template, rendered against the same fields as the body
    /// (event field names such as `RenderedMessage` included). Blank means
    /// "use `default_username`".
    pub username: Option<String>,
    /// Attachment template. Blank means "no attachment".
    pub attachment: Option<String>,
    /// Sender name when the template is blank or renders blank.
    pub default_username: String,
    /// Sender icon.
    pub icon_url: String,
    /// Channel override.
    pub channel: Option<String>,
}

impl Default for MessageTemplates {
    fn default() -> Self {
        Self {
            message: None,
            username: None,
            attachment: None,
            default_username: DEFAULT_APP_NAME.to_string(),
            icon_url: DEFAULT_ICON_URL.to_string(),
            channel: None,
        }
    }
}

fn configured(template: &Option<String>) -> Option<&str> {
    template.as_deref().filter(|t| !t.trim().is_empty())
}

/// Renders events into webhook payloads.
pub struct MessageRenderer {
    templates: MessageTemplates,
    engine: Arc<dyn TemplateEngine>,
}

impl MessageRenderer {
    /// Create a renderer using the built-in placeholder engine.
    pub fn new(templates: MessageTemplates) -> Result<Self, RenderError> {
        Self::with_engine(templates, Arc::new(PlaceholderEngine))
    }

    /// Create a renderer with a custom template engine.
    ///
    /// Every configured template is checked here; a malformed one is an
    /// error before any event is handled.
    pub fn with_engine(
        templates: MessageTemplates,
        engine: Arc<dyn TemplateEngine>,
    ) -> Result<Self, RenderError> {
        let checks = [
            ("message", &templates.message),
            ("username", &templates.username),
            ("attachment", &templates.attachment),
        ];
        for (name, template) in checks {
            if let Some(source) = configured(template) {
                engine
                    .check(source)
                    .map_err(|source| RenderError { template: name, source })?;
            }
        }

        Ok(Self { templates, engine })
    }

    /// The configured templates.
    pub fn templates(&self) -> &MessageTemplates {
        &self.templates
    }

    /// Build the payload for an event. Any template failure aborts the whole
    /// payload.
    pub fn render(&self, event: &Event) -> Result<SlackMessage, RenderError> {
        let context = RenderContext::from_event(event);

        let body = match configured(&self.templates.message) {
            Some(template) => self.render_one("message", template, &context)?,
            None => event.rendered_message.clone(),
        };

        let username = match configured(&self.templates.username) {
            Some(template) => {
                let rendered = self.render_one("username", template, &context)?;
                if rendered.trim().is_empty() {
                    self.templates.default_username.clone()
                } else {
                    rendered
                }
            }
            None => self.templates.default_username.clone(),
        };

        let mut message = SlackMessage::new(event.title(), body)
            .with_username(username)
            .with_icon_url(self.templates.icon_url.clone())
            .with_channel(self.templates.channel.clone());

        if let Some(template) = configured(&self.templates.attachment) {
            let text = self.render_one("attachment", template, &context)?;
            message = message.with_attachment(Attachment::new(event.level.color(), text));
        }

        debug!(
            event_id = %event.id,
            attachments = message.attachments.len(),
            "Rendered webhook payload"
        );
        Ok(message)
    }

    fn render_one(
        &self,
        name: &'static str,
        template: &str,
        context: &RenderContext<'_>,
    ) -> Result<String, RenderError> {
        self.engine
            .render(template, context)
            .map_err(|source| RenderError { template: name, source })
    }
}

impl std::fmt::Debug for MessageRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageRenderer")
            .field("templates", &self.templates)
            .finish()
    }
}
