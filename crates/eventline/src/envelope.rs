//! The event envelope: one captured event plus its subject id, capture
//! timestamp and attribute map. Envelopes are immutable once constructed and
//! live in the buffer until they are drained into a batch.

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

/// Open-ended attribute map attached to an event.
pub type Attributes = Map<String, Value>;

/// A single captured event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope {
    /// Hashed or anonymous subject id, never empty.
    pub user: String,
    /// Capture time, RFC 3339 UTC with millisecond precision. Assigned at
    /// construction, not at send time.
    pub timestamp: String,
    /// Event attributes; always carries `platform` and `event` keys.
    pub event: Attributes,
}

impl Envelope {
    /// Capture an event now.
    pub fn new(user: String, event: Attributes) -> Self {
        Self {
            user,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            event,
        }
    }
}

/// Wire shape of one delivery attempt: the drained batch under a single
/// wrapper field, batch order equal to drain order.
#[derive(Debug, Serialize)]
pub struct BatchPayload<'a> {
    pub events: &'a [Envelope],
}

/// Build the attribute map for an event: the fixed base keys merged with
/// caller-supplied extras, extras winning on key collisions.
#[must_use]
pub fn merge_attributes(platform: &str, event_name: &str, extra: Attributes) -> Attributes {
    let mut attributes = Attributes::new();
    attributes.insert("platform".to_string(), Value::String(platform.to_string()));
    attributes.insert("event".to_string(), Value::String(event_name.to_string()));
    // Last write wins: extras override same-named base keys
    for (key, value) in extra {
        attributes.insert(key, value);
    }
    attributes
}
