//! Inbound log/alert event types.

use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::EventError;
use crate::level::Level;

/// Stable tag grouping recurring events of the same shape
/// (e.g., the same log statement).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventType(pub u32);

impl EventType {
    /// Event type assigned to alert notifications raised by the host.
    pub const ALERT: EventType = EventType(0xA1E7_7000);

    /// Parse a hex tag such as `$A1E77000`, `0xa1e77000` or `a1e77000`.
    pub fn from_hex(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let digits = trimmed
            .strip_prefix('$')
            .or_else(|| trimmed.strip_prefix("0x"))
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        if digits.is_empty() || digits.len() > 8 {
            return None;
        }
        u32::from_str_radix(digits, 16).ok().map(EventType)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:08X}", self.0)
    }
}

impl From<u32> for EventType {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// A log or alert event delivered by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Event {
    /// Host-assigned event id.
    pub id: String,

    /// Severity.
    pub level: Level,

    /// Message with property values already substituted.
    pub rendered_message: String,

    /// Exception text, if the event carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exception: Option<String>,

    /// Structured properties.
    #[serde(default)]
    pub properties: Map<String, Value>,

    /// Timestamp in the host's local offset.
    pub local_timestamp: DateTime<FixedOffset>,

    /// Event type tag.
    pub event_type: EventType,
}

impl Event {
    /// Create an event with no exception and no properties.
    pub fn new(
        id: impl Into<String>,
        level: Level,
        rendered_message: impl Into<String>,
        local_timestamp: DateTime<FixedOffset>,
        event_type: impl Into<EventType>,
    ) -> Self {
        Self {
            id: id.into(),
            level,
            rendered_message: rendered_message.into(),
            exception: None,
            properties: Map::new(),
            local_timestamp,
            event_type: event_type.into(),
        }
    }

    /// Attach exception text.
    pub fn with_exception(mut self, exception: impl Into<String>) -> Self {
        self.exception = Some(exception.into());
        self
    }

    /// Add a property.
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    /// Parse an event from its JSON form.
    pub fn from_json(raw: &str) -> Result<Self, EventError> {
        let value: Value =
            serde_json::from_str(raw).map_err(|e| EventError::InvalidEvent(e.to_string()))?;
        Self::from_value(value)
    }

    /// Convert an already-parsed JSON value.
    pub fn from_value(value: Value) -> Result<Self, EventError> {
        serde_json::from_value(value).map_err(|e| {
            // Level failures surface through serde as custom messages.
            let message = e.to_string();
            match message.strip_prefix("unknown severity level: ") {
                Some(raw) => EventError::UnknownLevel(raw.to_string()),
                None => EventError::InvalidEvent(message),
            }
        })
    }

    /// The fixed summary line: `[Level] message`.
    pub fn title(&self) -> String {
        format!("[{}] {}", self.level, self.rendered_message)
    }
}
