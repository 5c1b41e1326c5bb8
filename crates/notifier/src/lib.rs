//! Event suppression and Slack message rendering for log/alert notifications.
//!
//! This crate provides the [`Notifier`] type which decides, per incoming
//! event, whether a notification goes out and what it looks like.
//!
//! # Architecture
//!
//! ```text
//! Event (from the host)
//!          ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         NOTIFIER                            │
//! │                                                             │
//! │  1. Suppression gate: same event type inside cooldown?      │
//! │     • yes → stop (nothing rendered, nothing sent)           │
//! │         ↓                                                   │
//! │  2. Render payload                                          │
//! │     • title "[Level] message"                               │
//! │     • body, sender name from templates                      │
//! │     • attachment colored by level (if configured)           │
//! │         ↓                                                   │
//! │  3. Send through the MessageSender (one attempt)            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use notifier::{Event, HandleResult, Notifier, NotifierConfig};
//!
//! # async fn example(event: Event) -> Result<(), notifier::NotifierError> {
//! let config = NotifierConfig::from_env()?;
//! let notifier = Notifier::connect(&config)?;
//!
//! match notifier.handle(&event).await {
//!     HandleResult::Dispatched { .. } => println!("sent"),
//!     HandleResult::Suppressed { .. } => println!("inside cooldown"),
//!     HandleResult::Failed(e) => eprintln!("failed: {}", e),
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod event;
pub mod handler;
pub mod level;
pub mod render;
pub mod sender;
pub mod suppression;
pub mod template;

pub use config::{NotifierConfig, DEFAULT_MESSAGE_TEMPLATE};
pub use error::{EventError, NotifierError, RenderError, TemplateError};
pub use event::{Event, EventType};
pub use handler::{HandleResult, Notifier};
pub use level::{color_for, Level};
pub use render::{MessageRenderer, MessageTemplates, DEFAULT_APP_NAME, DEFAULT_ICON_URL};
pub use sender::{LoggingSender, MessageSender, WebhookSender};
pub use suppression::SuppressionGate;
pub use template::{PlaceholderEngine, RenderContext, Template, TemplateEngine};

// Re-export for implementors of MessageSender.
pub use async_trait::async_trait;
pub use slack_webhook::{Attachment, SlackMessage};

/// Crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
