//! Client facade and frame dispatch

use std::sync::Arc;
use url::Url;

use crate::config::ClientConfig;
use crate::connection::{ConnectionController, Credentials, LifecycleHandlers};
use crate::error::{Error, Result};
use crate::message::{effective_event_name, Message};
use crate::notifier::ErrorNotifier;
use crate::registry::EventRegistry;
use crate::transport::{ConnectionState, Frame, Transport, TransportListener, TransportResponse};

/// SSE push client
///
/// Routes frames reported by a [`Transport`] to handlers registered by event
/// name, and forwards open/close transitions and HTTP failures to their own
/// handlers. Handlers run synchronously on the transport's delivery thread.
///
/// # Example
///
/// ```rust,no_run
/// use sse_push_client::{ChannelTransport, Client};
///
/// # #[tokio::main]
/// # async fn main() -> sse_push_client::Result<()> {
/// let (transport, _sender) = ChannelTransport::new();
/// let client = Client::new("https://push.example.com/events", transport)?;
///
/// client.register_default_event(|msg| println!("message: {}", msg.data));
/// client.register_event("alert", |msg| println!("alert: {}", msg.data));
/// client.register_on_open(|| println!("connected"));
///
/// client.open(None, None)?;
/// # Ok(())
/// # }
/// ```
pub struct Client<T: Transport> {
    id: String,
    controller: ConnectionController<T>,
    registry: EventRegistry,
    errors: Arc<ErrorNotifier>,
}

impl<T: Transport> Client<T> {
    /// Create a client for `uri` on top of `transport`
    ///
    /// Fails with [`Error::Config`] if `uri` is empty or not an absolute URL.
    /// The frame listener is attached to the transport before this returns.
    pub fn new(uri: impl AsRef<str>, transport: T) -> Result<Self> {
        Self::with_shared_transport(uri, Arc::new(transport))
    }

    /// Like [`Client::new`], for a transport the caller keeps a handle to
    pub fn with_shared_transport(uri: impl AsRef<str>, transport: Arc<T>) -> Result<Self> {
        let endpoint = parse_endpoint(Some(uri.as_ref()))?;
        Ok(Self::assemble(endpoint, transport))
    }

    /// Create a client from a [`ClientConfig`]
    pub fn from_config(config: &ClientConfig, transport: T) -> Result<Self> {
        let endpoint = parse_endpoint(config.uri.as_deref())?;
        Ok(Self::assemble(endpoint, Arc::new(transport)))
    }

    fn assemble(endpoint: Url, transport: Arc<T>) -> Self {
        let id = uuid::Uuid::new_v4().to_string();
        let registry = EventRegistry::new();
        let lifecycle = Arc::new(LifecycleHandlers::default());
        let errors = Arc::new(ErrorNotifier::new());

        let dispatcher = Dispatcher {
            client_id: id.clone(),
            registry: registry.clone(),
            lifecycle: lifecycle.clone(),
            errors: errors.clone(),
        };
        transport.attach(Arc::new(dispatcher));

        tracing::debug!(
            client_id = %id,
            endpoint = %endpoint,
            transport = transport.name(),
            "Client created"
        );

        Self {
            id,
            controller: ConnectionController::new(transport, endpoint, lifecycle),
            registry,
            errors,
        }
    }

    /// Connect to the push server
    ///
    /// Pass `None` for both to connect without authentication, or both for
    /// Basic-Auth. Exactly one of them is a configuration error and the
    /// transport is not started.
    pub fn open(&self, username: Option<&str>, password: Option<&str>) -> Result<()> {
        let credentials = Credentials::from_parts(username, password)?;
        self.open_with(credentials)
    }

    /// Connect with already validated credentials
    pub fn open_with(&self, credentials: Option<Credentials>) -> Result<()> {
        tracing::debug!(client_id = %self.id, "open() start");
        let result = self.controller.open(credentials);
        if let Err(e) = &result {
            tracing::error!(client_id = %self.id, error = %e, "Failed to open connection");
        }
        tracing::debug!(client_id = %self.id, "open() end");
        result
    }

    /// Connect with the credentials held in `config`
    pub fn open_configured(&self, config: &ClientConfig) -> Result<()> {
        self.open_with(config.credentials()?)
    }

    /// Disconnect from the push server
    ///
    /// Safe to call repeatedly. Handlers already running are not interrupted.
    pub fn close(&self) {
        tracing::debug!(client_id = %self.id, "close() start");
        self.controller.close();
        tracing::debug!(client_id = %self.id, "close() end");
    }

    /// Add a handler run each time the connection opens
    pub fn register_on_open<F>(&self, handler: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.controller.register_on_open(Arc::new(handler));
        tracing::debug!(client_id = %self.id, "Registered open handler");
    }

    /// Add a handler run each time the connection closes
    pub fn register_on_close<F>(&self, handler: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.controller.register_on_close(Arc::new(handler));
        tracing::debug!(client_id = %self.id, "Registered close handler");
    }

    /// Set the handler for HTTP failures, replacing any previous one
    pub fn register_on_error<F>(&self, handler: F)
    where
        F: Fn(u16, &TransportResponse) + Send + Sync + 'static,
    {
        self.errors.set_handler(Arc::new(handler));
        tracing::debug!(client_id = %self.id, "Registered error handler");
    }

    /// Set the handler for events named `name`, replacing any previous one
    pub fn register_event<F>(&self, name: impl Into<String>, handler: F)
    where
        F: Fn(Message) + Send + Sync + 'static,
    {
        let name = name.into();
        tracing::debug!(client_id = %self.id, event = %name, "Registering event handler");
        self.registry.register(name, Arc::new(handler));
    }

    /// Set the handler for unnamed events and events named `"message"`
    pub fn register_default_event<F>(&self, handler: F)
    where
        F: Fn(Message) + Send + Sync + 'static,
    {
        tracing::debug!(client_id = %self.id, "Registering default event handler");
        self.registry.register_default(Arc::new(handler));
    }

    /// Unique ID of this client (for logging)
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The push server endpoint
    pub fn endpoint(&self) -> &Url {
        self.controller.endpoint()
    }

    /// Event names that currently have a handler
    pub fn registered_events(&self) -> Vec<String> {
        self.registry.event_names()
    }

    pub fn transport(&self) -> &Arc<T> {
        self.controller.transport()
    }

    pub fn controller(&self) -> &ConnectionController<T> {
        &self.controller
    }
}

impl<T: Transport> std::fmt::Debug for Client<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("id", &self.id)
            .field("endpoint", &self.endpoint().as_str())
            .field("events", &self.registered_events())
            .finish()
    }
}

fn parse_endpoint(uri: Option<&str>) -> Result<Url> {
    let uri = match uri {
        Some(uri) if !uri.is_empty() => uri,
        _ => return Err(Error::config("push server URI is required")),
    };

    Url::parse(uri).map_err(|e| Error::config(format!("invalid push server URI {uri:?}: {e}")))
}

/// Transport listener routing notifications into the client's handlers
struct Dispatcher {
    client_id: String,
    registry: EventRegistry,
    lifecycle: Arc<LifecycleHandlers>,
    errors: Arc<ErrorNotifier>,
}

impl TransportListener for Dispatcher {
    fn on_state_changed(&self, state: ConnectionState) {
        match state {
            ConnectionState::Error => {
                tracing::warn!(client_id = %self.client_id, %state, "Connection state changed")
            }
            _ => tracing::info!(client_id = %self.client_id, %state, "Connection state changed"),
        }

        let invoked = self.lifecycle.dispatch(state);
        tracing::trace!(client_id = %self.client_id, %state, invoked, "Lifecycle handlers done");
    }

    fn on_frame(&self, frame: Frame) {
        let event_type = effective_event_name(&frame.event_type).to_owned();

        match self.registry.resolve(&event_type) {
            Some(handler) => handler(Message::from_frame(&event_type, frame)),
            None => tracing::trace!(
                client_id = %self.client_id,
                event = %event_type,
                "No handler registered, frame dropped"
            ),
        }
    }

    fn on_error(&self, status_code: u16, response: TransportResponse) {
        self.errors.notify(status_code, &response);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_endpoint() {
        assert!(parse_endpoint(None).unwrap_err().is_config());
        assert!(parse_endpoint(Some("")).unwrap_err().is_config());
        assert!(parse_endpoint(Some("not a uri")).unwrap_err().is_config());

        let url = parse_endpoint(Some("http://localhost:8080/sse?channel=a")).unwrap();
        assert_eq!(url.host_str(), Some("localhost"));
        assert_eq!(url.query(), Some("channel=a"));
    }
}
