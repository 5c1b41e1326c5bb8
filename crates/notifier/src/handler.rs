//! Per-event pipeline: suppression gate, renderer, sender.

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};

use crate::config::NotifierConfig;
use crate::error::NotifierError;
use crate::event::{Event, EventType};
use crate::render::MessageRenderer;
use crate::sender::{MessageSender, WebhookSender};
use crate::suppression::SuppressionGate;

/// Result of handling a single event.
#[derive(Debug)]
pub enum HandleResult {
    /// The event type was seen inside its cooldown window; nothing was rendered.
    Suppressed { event_type: EventType },
    /// The payload was rendered and delivered.
    Dispatched { event_type: EventType },
    /// Rendering or delivery failed. The suppression window stays anchored.
    Failed(NotifierError),
}

impl HandleResult {
    /// Whether a payload was delivered.
    pub fn is_dispatched(&self) -> bool {
        matches!(self, Self::Dispatched { .. })
    }
}

/// One configured notifier instance.
///
/// Owns the suppression state, the renderer and the sender for its
/// configuration. Share it behind an `Arc` to handle events from several
/// tasks; suppression decisions stay consistent across them.
pub struct Notifier<S: MessageSender> {
    gate: SuppressionGate,
    renderer: MessageRenderer,
    sender: S,
}

impl Notifier<WebhookSender> {
    /// Build a notifier that posts to the configured webhook.
    pub fn connect(config: &NotifierConfig) -> Result<Self, NotifierError> {
        let sender = WebhookSender::new(config.webhook_config())?;
        Self::from_config(config, sender)
    }
}

impl<S: MessageSender> Notifier<S> {
    /// Create a notifier from its parts.
    pub fn new(gate: SuppressionGate, renderer: MessageRenderer, sender: S) -> Self {
        Self {
            gate,
            renderer,
            sender,
        }
    }

    /// Build a notifier from configuration with the given sender.
    ///
    /// Fails if any configured template is malformed.
    pub fn from_config(config: &NotifierConfig, sender: S) -> Result<Self, NotifierError> {
        let renderer = MessageRenderer::new(config.templates())?;
        let gate = SuppressionGate::new(config.cooldown());

        info!(
            sender = sender.name(),
            cooldown_secs = gate.cooldown().as_secs(),
            "Notifier configured"
        );
        Ok(Self::new(gate, renderer, sender))
    }

    /// Get a reference to the suppression gate.
    pub fn gate(&self) -> &SuppressionGate {
        &self.gate
    }

    /// Get a reference to the renderer.
    pub fn renderer(&self) -> &MessageRenderer {
        &self.renderer
    }

    /// Get a reference to the sender.
    pub fn sender(&self) -> &S {
        &self.sender
    }

    /// Handle an event using the current time.
    pub async fn handle(&self, event: &Event) -> HandleResult {
        self.handle_at(event, Utc::now()).await
    }

    /// Handle an event as if it arrived at `now`.
    ///
    /// The gate is consulted first and its window is anchored before the
    /// payload is sent, so a failed send is not retried by a later
    /// occurrence inside the window.
    pub async fn handle_at(&self, event: &Event, now: DateTime<Utc>) -> HandleResult {
        let event_type = event.event_type;

        if self.gate.should_suppress(event_type, now).await {
            debug!(event_type = %event_type, event_id = %event.id, "Event suppressed");
            return HandleResult::Suppressed { event_type };
        }

        let message = match self.renderer.render(event) {
            Ok(message) => message,
            Err(e) => {
                error!(event_type = %event_type, event_id = %event.id, "Render failed: {}", e);
                return HandleResult::Failed(NotifierError::Render(e));
            }
        };

        match self.sender.send(&message).await {
            Ok(()) => {
                info!(
                    event_type = %event_type,
                    event_id = %event.id,
                    "Sent notification: {}",
                    message.text
                );
                HandleResult::Dispatched { event_type }
            }
            Err(e) => {
                warn!(event_type = %event_type, event_id = %event.id, "Send failed: {}", e);
                HandleResult::Failed(e)
            }
        }
    }
}

impl<S: MessageSender> std::fmt::Debug for Notifier<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("gate", &self.gate)
            .field("renderer", &self.renderer)
            .field("sender", &self.sender.name())
            .finish()
    }
}
