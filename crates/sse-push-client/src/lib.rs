//! # SSE Push Client
//!
//! Client-side event dispatch for Server-Sent Events (SSE) push servers.
//!
//! ## Features
//!
//! - **Named Event Handlers**: Route frames to handlers by event name, with `"message"` as the default
//! - **Lifecycle Callbacks**: Subscribe any number of handlers to connection open/close
//! - **Error Callback**: Receive HTTP failures with their status code and response
//! - **Pluggable Transport**: Implement `Transport` to use any HTTP/SSE stack
//! - **Thread Safe**: Register handlers from any thread while events are being delivered
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sse_push_client::{ChannelTransport, Client, Frame};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let (transport, sender) = ChannelTransport::new();
//!     let client = Client::new("http://localhost:8080/sse/connect", transport)?;
//!
//!     client.register_default_event(|msg| println!("{}", msg.data));
//!     client.register_on_error(|status, _response| eprintln!("HTTP {status}"));
//!     client.open(None, None)?;
//!
//!     sender.send(Frame::unnamed("hello").into()).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Custom Transport
//!
//! ```rust,ignore
//! use sse_push_client::{Credentials, Transport, TransportListener};
//! use std::sync::Arc;
//! use url::Url;
//!
//! struct MyTransport;
//!
//! impl Transport for MyTransport {
//!     fn attach(&self, listener: Arc<dyn TransportListener>) { /* store it */ }
//!     fn start(&self, endpoint: &Url, credentials: Option<&Credentials>) -> anyhow::Result<()> {
//!         // spawn the request; call listener.on_frame(..) for each parsed event
//!         Ok(())
//!     }
//!     fn stop(&self) {}
//!     fn name(&self) -> &'static str { "MyTransport" }
//! }
//! ```

mod client;
pub mod config;
mod connection;
mod error;
mod message;
mod notifier;
mod registry;
pub mod transport;

// Re-exports
pub use client::Client;
pub use config::ClientConfig;
pub use connection::{ConnectionController, Credentials, LifecycleHandler};
pub use error::{Error, Result};
pub use message::{Message, DEFAULT_EVENT};
pub use notifier::{ErrorHandler, ErrorNotifier};
pub use registry::{EventRegistry, MessageHandler};
pub use transport::{
    ChannelTransport, ConnectionState, Frame, Transport, TransportEvent, TransportListener,
    TransportResponse,
};

// Re-export commonly used types from dependencies
pub use url::Url;
