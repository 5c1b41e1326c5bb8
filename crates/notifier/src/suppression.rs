//! Per-event-type suppression window.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::debug;

use crate::event::EventType;

/// Drops repeat occurrences of an event type inside a cooldown window.
///
/// The window is anchored at the last *accepted* occurrence: suppressed
/// occurrences do not extend it. Entries are never evicted.
#[derive(Debug)]
pub struct SuppressionGate {
    cooldown: Duration,
    /// Last accepted occurrence per event type.
    last_accepted: Mutex<HashMap<EventType, DateTime<Utc>>>,
}

impl SuppressionGate {
    /// Create a gate. A zero cooldown never suppresses.
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last_accepted: Mutex::new(HashMap::new()),
        }
    }

    /// Create a gate from a cooldown in whole minutes.
    pub fn from_minutes(minutes: u64) -> Self {
        Self::new(Duration::from_secs(minutes.saturating_mul(60)))
    }

    /// The configured cooldown.
    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Decide whether the occurrence of `event_type` at `now` is dropped.
    ///
    /// Returns `false` and records `now` when there is no previous
    /// acceptance, the cooldown is zero, or at least `cooldown` has passed
    /// since the previous acceptance. Otherwise returns `true` and leaves the
    /// recorded time untouched. Lookup and update happen under one lock.
    pub async fn should_suppress(&self, event_type: EventType, now: DateTime<Utc>) -> bool {
        let mut last_accepted = self.last_accepted.lock().await;

        if let Some(last) = last_accepted.get(&event_type) {
            if !self.cooldown.is_zero() {
                // A clock that went backwards counts as no time elapsed.
                let elapsed = (now - *last).to_std().unwrap_or(Duration::ZERO);
                if elapsed < self.cooldown {
                    debug!(
                        event_type = %event_type,
                        elapsed_secs = elapsed.as_secs(),
                        "Suppressing event inside cooldown window"
                    );
                    return true;
                }
            }
        }

        last_accepted.insert(event_type, now);
        false
    }

    /// Last accepted time for an event type.
    pub async fn last_accepted(&self, event_type: EventType) -> Option<DateTime<Utc>> {
        self.last_accepted.lock().await.get(&event_type).copied()
    }

    /// Number of event types being tracked.
    pub async fn tracked(&self) -> usize {
        self.last_accepted.lock().await.len()
    }
}
