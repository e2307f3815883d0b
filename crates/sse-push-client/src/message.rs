//! Messages delivered to event handlers

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::transport::Frame;

/// Event name used when a frame carries no `event:` field
pub const DEFAULT_EVENT: &str = "message";

/// One event received from the push server
///
/// Built once per inbound frame and handed by value to a single handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Event type (never empty, `"message"` by default)
    #[serde(rename = "event")]
    pub event_type: String,

    /// Event data, possibly empty
    pub data: String,

    /// Last event ID reported by the server
    #[serde(rename = "id")]
    pub last_event_id: String,

    /// Reconnection delay hint in milliseconds, as sent by the server
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry: Option<String>,
}

impl Message {
    /// Create a message with no last event ID and no retry hint
    pub fn new(event_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            data: data.into(),
            last_event_id: String::new(),
            retry: None,
        }
    }

    /// Build the message for `frame`, already resolved to `event_type`
    pub(crate) fn from_frame(event_type: &str, frame: Frame) -> Self {
        Self {
            event_type: event_type.to_string(),
            data: frame.data,
            last_event_id: frame.last_event_id,
            retry: frame.retry.map(|ms| ms.to_string()),
        }
    }

    /// Set the last event ID
    pub fn with_last_event_id(mut self, id: impl Into<String>) -> Self {
        self.last_event_id = id.into();
        self
    }

    /// Set the retry hint
    pub fn with_retry(mut self, retry: impl Into<String>) -> Self {
        self.retry = Some(retry.into());
        self
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn data(&self) -> &str {
        &self.data
    }

    pub fn last_event_id(&self) -> &str {
        &self.last_event_id
    }

    pub fn retry(&self) -> Option<&str> {
        self.retry.as_deref()
    }

    /// The retry hint as a number of milliseconds
    ///
    /// Returns `None` when the server sent no hint or it is not numeric.
    pub fn retry_millis(&self) -> Option<u64> {
        self.retry.as_deref().and_then(|r| r.parse().ok())
    }

    /// Deserialize the data payload as JSON
    pub fn json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_str(&self.data)
    }
}

/// Resolve the event name a frame should be routed under
pub(crate) fn effective_event_name(name: &str) -> &str {
    if name.is_empty() {
        DEFAULT_EVENT
    } else {
        name
    }
}
