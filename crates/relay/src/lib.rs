//! Line-oriented event relay for the Slack notifier.
//!
//! Reads one event per line (native JSON or CLEF), runs each through a
//! [`notifier::Notifier`] and reports what happened.

pub mod input;
pub mod relay;

pub use input::{derive_event_type, from_clef, parse_line, render_message_template, InputFormat};
pub use relay::{Relay, RelayError, RelayStats};

/// Crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
