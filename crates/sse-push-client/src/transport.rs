//! Transport trait and implementations
//!
//! A transport owns the HTTP streaming connection and the `text/event-stream`
//! parsing. The client only consumes what it reports: state changes, parsed
//! frames and HTTP failures. Implement [`Transport`] to plug in any SSE stack.

use std::fmt;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::connection::Credentials;

/// Connection state as reported by the transport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    /// Connection is being established
    Connecting,
    /// Streaming
    Open,
    /// Connection closed
    Closed,
    /// Connection failed
    Error,
}

impl ConnectionState {
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open)
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connecting => write!(f, "CONNECTING"),
            Self::Open => write!(f, "OPEN"),
            Self::Closed => write!(f, "CLOSED"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// One parsed SSE frame
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    /// Value of the `event:` field, empty when absent
    pub event_type: String,
    /// Value of the `data:` field(s)
    pub data: String,
    /// Value of the last `id:` field seen on the stream
    pub last_event_id: String,
    /// Value of the `retry:` field in milliseconds
    pub retry: Option<u64>,
}

impl Frame {
    /// Create a new frame
    pub fn new(event_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            data: data.into(),
            last_event_id: String::new(),
            retry: None,
        }
    }

    /// Create a frame without an event name
    pub fn unnamed(data: impl Into<String>) -> Self {
        Self::new("", data)
    }

    /// Set the last event ID
    pub fn with_last_event_id(mut self, id: impl Into<String>) -> Self {
        self.last_event_id = id.into();
        self
    }

    /// Set the retry interval
    pub fn with_retry(mut self, retry_ms: u64) -> Self {
        self.retry = Some(retry_ms);
        self
    }
}

/// Snapshot of the HTTP response that caused a transport error
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers in received order
    pub headers: Vec<(String, String)>,
    /// Response body, if the transport read one
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            ..Default::default()
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Get a header value (case-insensitive name match)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Receiver side of a transport's notifications
///
/// Called from the transport's own threads or tasks. Implementations must be
/// quick or hand work off elsewhere.
pub trait TransportListener: Send + Sync + 'static {
    /// The connection moved to `state`
    fn on_state_changed(&self, state: ConnectionState);

    /// A frame was received
    fn on_frame(&self, frame: Frame);

    /// The server answered with an HTTP failure
    fn on_error(&self, status_code: u16, response: TransportResponse);
}

/// Trait for SSE transports
///
/// # Example
///
/// ```rust,ignore
/// use sse_push_client::{Credentials, Transport, TransportListener};
/// use std::sync::Arc;
/// use url::Url;
///
/// struct MyTransport { /* http client, listener slot, ... */ }
///
/// impl Transport for MyTransport {
///     fn attach(&self, listener: Arc<dyn TransportListener>) {
///         // keep the listener; report state changes and frames to it
///     }
///
///     fn start(&self, endpoint: &Url, credentials: Option<&Credentials>) -> anyhow::Result<()> {
///         // spawn the streaming request and return immediately
///         Ok(())
///     }
///
///     fn stop(&self) {}
///
///     fn name(&self) -> &'static str { "MyTransport" }
/// }
/// ```
pub trait Transport: Send + Sync + 'static {
    /// Install the listener that receives every notification
    ///
    /// Called once, when the client is constructed.
    fn attach(&self, listener: Arc<dyn TransportListener>);

    /// Begin streaming from `endpoint`
    ///
    /// Must not wait for the connection to open. Basic-Auth credentials are
    /// passed through untouched when present.
    fn start(&self, endpoint: &Url, credentials: Option<&Credentials>) -> anyhow::Result<()>;

    /// Stop streaming
    ///
    /// Must be a no-op when the transport is not running.
    fn stop(&self);

    /// Return the transport name (for logging)
    fn name(&self) -> &'static str;
}

/// Notification pushed into a [`ChannelTransport`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// Report a state change
    State(ConnectionState),
    /// Deliver a frame
    Frame(Frame),
    /// Report an HTTP failure
    Error {
        status_code: u16,
        response: TransportResponse,
    },
}

impl TransportEvent {
    /// Create a frame event
    pub fn frame(event_type: impl Into<String>, data: impl Into<String>) -> Self {
        TransportEvent::Frame(Frame::new(event_type, data))
    }

    /// Create an error event with an empty response body
    pub fn error(status_code: u16) -> Self {
        TransportEvent::Error {
            status_code,
            response: TransportResponse::new(status_code),
        }
    }
}

impl From<Frame> for TransportEvent {
    fn from(frame: Frame) -> Self {
        TransportEvent::Frame(frame)
    }
}

impl From<ConnectionState> for TransportEvent {
    fn from(state: ConnectionState) -> Self {
        TransportEvent::State(state)
    }
}

const DEFAULT_CHANNEL_CAPACITY: usize = 1000;

/// A channel-based transport for programmatic event delivery
///
/// Useful for testing or when frames come from your own code rather than an
/// HTTP stream. Events sent before [`start`](Transport::start) are buffered
/// and delivered once the transport runs.
pub struct ChannelTransport {
    receiver: Arc<tokio::sync::Mutex<mpsc::Receiver<TransportEvent>>>,
    listener: RwLock<Option<Arc<dyn TransportListener>>>,
    running: Arc<Mutex<Option<CancellationToken>>>,
}

impl ChannelTransport {
    /// Create a new channel transport
    pub fn new() -> (Self, mpsc::Sender<TransportEvent>) {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a new channel transport buffering up to `capacity` events
    pub fn with_capacity(capacity: usize) -> (Self, mpsc::Sender<TransportEvent>) {
        let (tx, rx) = mpsc::channel(capacity);
        (
            Self {
                receiver: Arc::new(tokio::sync::Mutex::new(rx)),
                listener: RwLock::new(None),
                running: Arc::new(Mutex::new(None)),
            },
            tx,
        )
    }

    /// Whether the pump task is active
    pub fn is_running(&self) -> bool {
        self.running.lock().is_some()
    }
}

impl Transport for ChannelTransport {
    fn attach(&self, listener: Arc<dyn TransportListener>) {
        *self.listener.write() = Some(listener);
    }

    fn start(&self, endpoint: &Url, credentials: Option<&Credentials>) -> anyhow::Result<()> {
        let listener = self
            .listener
            .read()
            .clone()
            .ok_or_else(|| anyhow::anyhow!("ChannelTransport started without a listener"))?;

        let mut running = self.running.lock();
        if running.is_some() {
            tracing::debug!(%endpoint, "ChannelTransport already running");
            return Ok(());
        }

        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| anyhow::anyhow!("ChannelTransport requires a Tokio runtime: {e}"))?;

        let cancel = CancellationToken::new();
        *running = Some(cancel.clone());
        drop(running);

        tracing::info!(
            %endpoint,
            username = credentials.map(|c| c.username()),
            "ChannelTransport started"
        );

        let receiver = self.receiver.clone();
        let running = self.running.clone();
        runtime.spawn(async move {
            // Held for the whole run so a restart cannot interleave with us.
            let mut receiver = receiver.lock().await;

            // Stopped before we got to run: report nothing.
            if cancel.is_cancelled() {
                return;
            }

            listener.on_state_changed(ConnectionState::Connecting);
            listener.on_state_changed(ConnectionState::Open);

            loop {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => break,
                    event = receiver.recv() => {
                        match event {
                            Some(TransportEvent::State(state)) => listener.on_state_changed(state),
                            Some(TransportEvent::Frame(frame)) => listener.on_frame(frame),
                            Some(TransportEvent::Error { status_code, response }) => {
                                listener.on_error(status_code, response)
                            }
                            None => break,
                        }
                    }
                }
            }

            {
                let mut running = running.lock();
                if !cancel.is_cancelled() {
                    running.take();
                }
            }

            listener.on_state_changed(ConnectionState::Closed);
            tracing::info!("ChannelTransport stopped");
        });

        Ok(())
    }

    fn stop(&self) {
        let mut running = self.running.lock();
        if let Some(cancel) = running.take() {
            cancel.cancel();
        }
    }

    fn name(&self) -> &'static str {
        "Channel"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_state_display() {
        assert_eq!(ConnectionState::Connecting.to_string(), "CONNECTING");
        assert_eq!(ConnectionState::Open.to_string(), "OPEN");
        assert_eq!(ConnectionState::Closed.to_string(), "CLOSED");
        assert_eq!(ConnectionState::Error.to_string(), "ERROR");
    }

    #[test]
    fn test_connection_state_predicates() {
        assert!(ConnectionState::Open.is_open());
        assert!(!ConnectionState::Open.is_closed());
        assert!(ConnectionState::Closed.is_closed());
        assert!(!ConnectionState::Closed.is_open());
        assert!(!ConnectionState::Connecting.is_open());
        assert!(!ConnectionState::Error.is_closed());
    }

    #[test]
    fn test_response_header_lookup() {
        let response = TransportResponse::new(401)
            .with_header("WWW-Authenticate", "Basic realm=\"push\"")
            .with_body("denied");

        assert_eq!(response.header("www-authenticate"), Some("Basic realm=\"push\""));
        assert_eq!(response.header("content-type"), None);
        assert_eq!(response.body, "denied");
    }

    #[test]
    fn test_start_without_listener_fails() {
        let (transport, _tx) = ChannelTransport::new();
        let url = Url::parse("http://localhost/events").unwrap();
        assert!(transport.start(&url, None).is_err());
        assert!(!transport.is_running());
    }

    #[test]
    fn test_stop_when_not_running_is_noop() {
        let (transport, _tx) = ChannelTransport::new();
        transport.stop();
        transport.stop();
        assert!(!transport.is_running());
    }
}
