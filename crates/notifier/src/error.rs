//! Error types for notifier operations.

use slack_webhook::WebhookError;
use thiserror::Error;

/// Errors raised while parsing or rendering a template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// The template text is malformed.
    #[error("syntax error at offset {position}: {message}")]
    Syntax { position: usize, message: String },

    /// A filter name is not supported.
    #[error("unknown filter: {0}")]
    UnknownFilter(String),

    /// A filter was given a missing or invalid argument.
    #[error("invalid argument for filter {filter}: {message}")]
    FilterArgument { filter: String, message: String },
}

impl TemplateError {
    pub(crate) fn syntax(position: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            position,
            message: message.into(),
        }
    }
}

/// A template failed while building a payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{template} template: {source}")]
pub struct RenderError {
    /// Which template failed ("message", "username", "attachment").
    pub template: &'static str,
    #[source]
    pub source: TemplateError,
}

/// Errors in inbound event data.
#[derive(Debug, Error)]
pub enum EventError {
    /// The severity level is not one of the six defined levels.
    #[error("unknown severity level: {0}")]
    UnknownLevel(String),

    /// The event is missing data or is not valid JSON.
    #[error("invalid event: {0}")]
    InvalidEvent(String),
}

/// Errors that can occur while handling an event.
#[derive(Debug, Error)]
pub enum NotifierError {
    /// Missing or invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// A template could not be rendered.
    #[error("render failed: {0}")]
    Render(#[from] RenderError),

    /// The webhook rejected the message or could not be reached.
    #[error("webhook error: {0}")]
    Webhook(#[from] WebhookError),

    /// Message sending failed.
    #[error("send failed: {0}")]
    SendFailed(String),
}

impl NotifierError {
    /// Whether processing must stop. Configuration and render errors are
    /// fatal; send errors lose only the current notification.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Config(_) | Self::Render(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        let render = NotifierError::Render(RenderError {
            template: "message",
            source: TemplateError::syntax(3, "unterminated"),
        });
        assert!(render.is_fatal());
        assert!(NotifierError::Config("missing url".to_string()).is_fatal());
        assert!(!NotifierError::SendFailed("timeout".to_string()).is_fatal());
        assert!(!NotifierError::Webhook(WebhookError::Status {
            status: 500,
            body: String::new()
        })
        .is_fatal());
    }

    #[test]
    fn test_render_error_display() {
        let err = RenderError {
            template: "attachment",
            source: TemplateError::UnknownFilter("shout".to_string()),
        };
        assert_eq!(err.to_string(), "attachment template: unknown filter: shout");
    }
}
