//! Transport error forwarding

use parking_lot::RwLock;
use std::sync::Arc;

use crate::transport::TransportResponse;

/// Error callback type, receives the HTTP status code and the response
pub type ErrorHandler = Arc<dyn Fn(u16, &TransportResponse) + Send + Sync>;

/// Forwards transport HTTP failures to the application
///
/// Holds a single handler; registering a new one replaces the previous one.
/// Errors arriving while no handler is set are only traced.
#[derive(Default)]
pub struct ErrorNotifier {
    handler: RwLock<Option<ErrorHandler>>,
}

impl ErrorNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the error handler, replacing any previous one
    pub fn set_handler(&self, handler: ErrorHandler) {
        *self.handler.write() = Some(handler);
    }

    pub fn has_handler(&self) -> bool {
        self.handler.read().is_some()
    }

    /// Forward a transport error to the handler
    ///
    /// Returns true if a handler ran.
    pub fn notify(&self, status_code: u16, response: &TransportResponse) -> bool {
        tracing::warn!(
            status_code,
            body_len = response.body.len(),
            "Error response from push server"
        );

        let handler = self.handler.read().clone();
        match handler {
            Some(handler) => {
                handler(status_code, response);
                true
            }
            None => false,
        }
    }
}

impl std::fmt::Debug for ErrorNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorNotifier")
            .field("has_handler", &self.has_handler())
            .finish()
    }
}
