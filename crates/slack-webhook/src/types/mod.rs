//! Wire types for Slack incoming webhooks.

mod message;

pub use message::*;
