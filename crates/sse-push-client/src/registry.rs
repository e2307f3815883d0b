//! Event handler registry

use dashmap::DashMap;
use std::sync::Arc;

use crate::message::{effective_event_name, Message, DEFAULT_EVENT};

/// Message handler callback type
pub type MessageHandler = Arc<dyn Fn(Message) + Send + Sync>;

/// Maps event names to their handler
///
/// One handler per name; registering a name again replaces its handler.
/// Entries are never removed. Safe to register from any thread while frames
/// are being resolved on the transport's thread.
#[derive(Clone, Default)]
pub struct EventRegistry {
    handlers: Arc<DashMap<String, MessageHandler>>,
}

impl EventRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `name`, replacing any previous one
    ///
    /// The empty string is stored as its own key; it is not an alias for
    /// the default event.
    pub fn register(&self, name: impl Into<String>, handler: MessageHandler) {
        self.handlers.insert(name.into(), handler);
    }

    /// Register `handler` for the default `"message"` event
    pub fn register_default(&self, handler: MessageHandler) {
        self.register(DEFAULT_EVENT, handler);
    }

    /// Find the handler for a frame's event name
    ///
    /// An empty name resolves as `"message"`. The handler is cloned out of
    /// the map so it can be invoked without holding any lock.
    pub fn resolve(&self, frame_event_name: &str) -> Option<MessageHandler> {
        self.handlers
            .get(effective_event_name(frame_event_name))
            .map(|entry| entry.value().clone())
    }

    /// Whether a handler is registered under exactly `name`
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Number of registered event names
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Registered event names, sorted
    pub fn event_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.handlers.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }
}

impl std::fmt::Debug for EventRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventRegistry")
            .field("events", &self.event_names())
            .finish()
    }
}
