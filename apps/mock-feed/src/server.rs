//! Feed Push Server
//!
//! Per-connection loop: accept the WebSocket handshake, then push one
//! payload per tick until the peer goes away or shutdown is signalled.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;

use crate::generator::next_payload;

/// Errors from a client connection.
#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    /// WebSocket protocol or transport failure.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// Payload serialization failure.
    #[error("payload encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Push payloads to one client until it disconnects or `cancel` fires.
///
/// # Errors
///
/// Returns a [`ServeError`] if the handshake, a send, or payload
/// encoding fails. A peer that simply goes away is not an error.
pub async fn serve_client(
    stream: TcpStream,
    interval: Duration,
    cancel: CancellationToken,
) -> Result<(), ServeError> {
    let ws_stream = tokio_tungstenite::accept_async(stream).await?;
    let (mut write, mut read) = ws_stream.split();
    let mut rng = StdRng::from_os_rng();
    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            () = cancel.cancelled() => {
                let _ = write.send(Message::Close(None)).await;
                return Ok(());
            }
            message = read.next() => match message {
                Some(Ok(Message::Close(_))) | None => return Ok(()),
                Some(Ok(Message::Ping(data))) => {
                    write.send(Message::Pong(data)).await?;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
            },
            _ = ticker.tick() => {
                let payload = next_payload(&mut rng);
                let text = payload.encode()?;
                if payload.is_malformed() {
                    tracing::debug!(payload = %text, "Sending malformed frame");
                }
                write.send(Message::Text(text.into())).await?;
            }
        }
    }
}
