//! Outbound messages sent through the host data channel

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundMessage {
    /// Action tag understood by the bot
    pub action: String,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
    /// Optional extra fields, flattened next to `action`
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl OutboundMessage {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            timestamp: Utc::now().timestamp_millis(),
            extra: Map::new(),
        }
    }

    /// Attach an extra field; `action` and `timestamp` are reserved
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        if key == "action" || key == "timestamp" {
            tracing::debug!(key = %key, "Ignoring reserved message field");
            return self;
        }
        self.extra.insert(key, value.into());
        self
    }

    pub fn with_fields(mut self, fields: Map<String, Value>) -> Self {
        for (key, value) in fields {
            self = self.with_field(key, value);
        }
        self
    }

    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
