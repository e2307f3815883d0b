//! Example: Feeding a client through ChannelTransport
//!
//! Run with: cargo run -p sse-push-client --example channel_transport
//!
//! Set SSE_PUSH_URI to change the endpoint shown in the logs, and
//! SSE_PUSH_USERNAME / SSE_PUSH_PASSWORD to exercise Basic-Auth pass-through.

use serde::Deserialize;
use sse_push_client::{ChannelTransport, Client, ClientConfig, Frame, TransportEvent};
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct Tick {
    count: u32,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sse_push_client=debug,channel_transport=info".into()),
        )
        .init();

    let config = ClientConfig::new("http://localhost:8080/sse/connect?channel_id=demo").merge_env();

    let (transport, sender) = ChannelTransport::new();
    let client = Client::from_config(&config, transport)?;

    client.register_on_open(|| tracing::info!("Connected"));
    client.register_on_close(|| tracing::info!("Disconnected"));
    client.register_on_error(|status, response| {
        tracing::warn!(status, body = %response.body, "Push server error");
    });

    client.register_default_event(|msg| {
        tracing::info!(data = %msg.data, id = %msg.last_event_id, "message");
    });
    client.register_event("tick", |msg| match msg.json::<Tick>() {
        Ok(tick) => tracing::info!(count = tick.count, retry = ?msg.retry, "tick"),
        Err(e) => tracing::warn!(error = %e, "Malformed tick payload"),
    });

    client.open_configured(&config)?;

    for count in 1..=3 {
        let frame = Frame::new("tick", serde_json::json!({ "count": count }).to_string())
            .with_last_event_id(count.to_string())
            .with_retry(3000);
        sender.send(frame.into()).await?;
        tokio::time::sleep(Duration::from_millis(200)).await;
    }

    sender.send(Frame::unnamed("plain message").into()).await?;
    sender.send(TransportEvent::frame("unsubscribed", "dropped")).await?;
    sender.send(TransportEvent::error(503)).await?;

    tokio::time::sleep(Duration::from_millis(200)).await;
    client.close();
    tokio::time::sleep(Duration::from_millis(100)).await;

    Ok(())
}
