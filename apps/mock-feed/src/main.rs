//! Mock Feed Binary
//!
//! Starts the fixture WebSocket server.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p mock-feed
//! ```
//!
//! # Environment Variables
//!
//! - `MOCK_FEED_PORT`: listen port (default: 8080)
//! - `MOCK_FEED_INTERVAL_MS`: frame interval (default: 1000)
//! - `RUST_LOG`: log level (default: info)

use std::time::Duration;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let port: u16 = env_parsed("MOCK_FEED_PORT", 8080)?;
    let interval_ms: u64 = env_parsed("MOCK_FEED_INTERVAL_MS", 1000)?;
    let interval = Duration::from_millis(interval_ms.max(1));

    let listener = TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!(port, interval_ms, "Mock feed listening");

    let shutdown = CancellationToken::new();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Received Ctrl+C, shutting down");
                shutdown.cancel();
                break;
            }
            accepted = listener.accept() => {
                let (stream, peer) = accepted?;
                tracing::info!(%peer, "Client connected");
                let cancel = shutdown.clone();
                tokio::spawn(async move {
                    if let Err(e) = mock_feed::serve_client(stream, interval, cancel).await {
                        tracing::warn!(%peer, error = %e, "Client connection ended with error");
                    }
                    tracing::info!(%peer, "Client disconnected");
                });
            }
        }
    }

    Ok(())
}

fn env_parsed<T: std::str::FromStr>(var: &str, default: T) -> anyhow::Result<T> {
    match std::env::var(var) {
        Err(_) => Ok(default),
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("invalid value for {var}: {raw:?}")),
    }
}

fn init_tracing() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
