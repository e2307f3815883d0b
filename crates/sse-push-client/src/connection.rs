//! Connection control and lifecycle notifications

use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use url::Url;

use crate::error::{Error, Result};
use crate::transport::{ConnectionState, Transport};

/// Open/close callback type
pub type LifecycleHandler = Arc<dyn Fn() + Send + Sync>;

/// Basic-Auth credentials passed through to the transport
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Build credentials from optional parts
    ///
    /// Neither part gives `None` (no authentication), both give `Some`.
    /// Exactly one part is a configuration error.
    pub fn from_parts<U, P>(username: Option<U>, password: Option<P>) -> Result<Option<Self>>
    where
        U: Into<String>,
        P: Into<String>,
    {
        match (username, password) {
            (None, None) => Ok(None),
            (Some(username), Some(password)) => Ok(Some(Self::new(username, password))),
            (Some(_), None) => Err(Error::config("username supplied without a password")),
            (None, Some(_)) => Err(Error::config("password supplied without a username")),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Ordered open/close subscribers
#[derive(Default)]
pub(crate) struct LifecycleHandlers {
    on_open: RwLock<Vec<LifecycleHandler>>,
    on_close: RwLock<Vec<LifecycleHandler>>,
}

impl LifecycleHandlers {
    pub(crate) fn add_open(&self, handler: LifecycleHandler) {
        self.on_open.write().push(handler);
    }

    pub(crate) fn add_close(&self, handler: LifecycleHandler) {
        self.on_close.write().push(handler);
    }

    /// Run the subscribers for `state` in registration order
    ///
    /// Returns how many handlers ran. Handlers are snapshotted first so one
    /// of them may register further handlers; those only see later
    /// transitions.
    pub(crate) fn dispatch(&self, state: ConnectionState) -> usize {
        let handlers = match state {
            ConnectionState::Open => self.on_open.read().clone(),
            ConnectionState::Closed => self.on_close.read().clone(),
            ConnectionState::Connecting | ConnectionState::Error => return 0,
        };

        for handler in &handlers {
            handler();
        }
        handlers.len()
    }

    pub(crate) fn counts(&self) -> (usize, usize) {
        (self.on_open.read().len(), self.on_close.read().len())
    }
}

/// Owns the transport and mediates open/close
pub struct ConnectionController<T: Transport> {
    transport: Arc<T>,
    endpoint: Url,
    lifecycle: Arc<LifecycleHandlers>,
}

impl<T: Transport> ConnectionController<T> {
    pub(crate) fn new(transport: Arc<T>, endpoint: Url, lifecycle: Arc<LifecycleHandlers>) -> Self {
        Self {
            transport,
            endpoint,
            lifecycle,
        }
    }

    /// Ask the transport to start streaming
    ///
    /// Returns as soon as the transport accepted the request; the open
    /// handlers run later, when the transport reports `Open`.
    pub fn open(&self, credentials: Option<Credentials>) -> Result<()> {
        tracing::debug!(
            endpoint = %self.endpoint,
            transport = self.transport.name(),
            username = credentials.as_ref().map(|c| c.username()),
            "Opening connection"
        );

        self.transport.start(&self.endpoint, credentials.as_ref())?;

        tracing::debug!(endpoint = %self.endpoint, "Open requested");
        Ok(())
    }

    /// Ask the transport to stop streaming
    pub fn close(&self) {
        tracing::debug!(endpoint = %self.endpoint, "Closing connection");
        self.transport.stop();
        tracing::debug!(endpoint = %self.endpoint, "Close requested");
    }

    /// Add a handler run on every transition to `Open`
    pub fn register_on_open(&self, handler: LifecycleHandler) {
        self.lifecycle.add_open(handler);
    }

    /// Add a handler run on every transition to `Closed`
    pub fn register_on_close(&self, handler: LifecycleHandler) {
        self.lifecycle.add_close(handler);
    }

    /// Number of open and close subscribers
    pub fn subscriber_counts(&self) -> (usize, usize) {
        self.lifecycle.counts()
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }
}
