//! Trade Viewer Binary
//!
//! Connects to a trade feed and renders the latest trades as a table,
//! refreshed on a fixed interval.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p trade-viewer -- ws://localhost:8080
//! ```
//!
//! # Environment Variables
//!
//! - `TRADE_VIEWER_URL`: feed address (overridden by the argument)
//! - `TRADE_VIEWER_HISTORY_CAPACITY`: max trades retained (default: 100)
//! - `TRADE_VIEWER_REFRESH_MS`: table refresh interval (default: 1000)
//! - `RUST_LOG`: log level (default: info)

use tokio_util::sync::CancellationToken;

use trade_viewer::ingest::ConnectionState;
use trade_viewer::{StreamIngestor, ViewController, ViewerConfig, render, telemetry, view};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("failed to install rustls crypto provider"))?;

    load_dotenv();
    telemetry::init();

    let config = ViewerConfig::from_env()?;
    tracing::info!(
        history_capacity = config.history_capacity,
        refresh_ms = config.refresh_interval.as_millis() as u64,
        "Configuration loaded"
    );

    let Some(address) = std::env::args().nth(1).or_else(|| config.url.clone()) else {
        anyhow::bail!("no feed address; pass one as an argument or set TRADE_VIEWER_URL");
    };

    let mut controller = ViewController::new(StreamIngestor::new(config.history_capacity));
    controller.connect(&address)?;
    tracing::info!(address = %address, "Connecting to feed");

    let shutdown = CancellationToken::new();
    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Received Ctrl+C, shutting down");
        }
        signal_shutdown.cancel();
    });

    view::drive(&mut controller, config.refresh_interval, &shutdown, draw).await;

    controller.disconnect();
    Ok(())
}

/// Repaint the table.
fn draw(controller: &ViewController) {
    let trades = controller.trades();
    let connected = controller.state() == ConnectionState::Connected;
    // Clear screen and home the cursor before each repaint.
    print!("\x1b[2J\x1b[H");
    println!("Live Trades Viewer ({})", controller.state().as_str());
    println!();
    println!("{}", render(&trades, controller.connection_error(), connected));
}

/// Load .env from the current directory or any ancestor directory.
fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}
