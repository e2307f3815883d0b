//! Error types for the SSE push client

use thiserror::Error;

/// Result type alias using the library's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced synchronously by the client
///
/// HTTP-level failures reported while streaming are not represented here;
/// they are delivered through the handler registered with
/// [`Client::register_on_error`](crate::Client::register_on_error).
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid configuration (missing URI, partial credentials, ...)
    #[error("Configuration error: {0}")]
    Config(String),

    /// The transport refused to start
    #[error("Transport error: {0}")]
    Transport(#[from] anyhow::Error),
}

impl Error {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Error::Config(message.into())
    }

    /// Returns true if this is a configuration error
    pub fn is_config(&self) -> bool {
        matches!(self, Error::Config(_))
    }
}
