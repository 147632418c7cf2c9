//! Feed Transport
//!
//! Owns the actual WebSocket for one connection attempt. Each spawned
//! task connects, forwards inbound text frames and lifecycle changes
//! as session-tagged [`FeedEvent`]s, and answers protocol pings. The
//! task holds no ingestor state: cancelling its token tears the socket
//! down, and anything it sends after being superseded is filtered out
//! by the session guard in [`super::ingestor::IngestorCore`].

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tokio_util::sync::CancellationToken;

/// An event from the transport, tagged with the session it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEvent {
    /// Session tag of the connection attempt that produced this event.
    pub session: u64,
    /// What happened.
    pub kind: FeedEventKind,
}

/// Transport lifecycle and data events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedEventKind {
    /// The WebSocket handshake completed.
    Opened,
    /// A text frame arrived. Untrusted; validation happens downstream.
    Frame(String),
    /// A socket-level failure (connect failure, read error).
    TransportError(String),
    /// The connection is gone. `clean` is true for an orderly close
    /// handshake, false for an abrupt drop.
    Closed {
        /// Whether the closure followed the close handshake.
        clean: bool,
    },
}

/// Spawn the transport task for one connection attempt.
///
/// Exactly one task is live per ingestor at a time; the caller cancels
/// the previous token before spawning a successor. Cancellation closes
/// the socket and produces no further events.
pub fn spawn(
    url: String,
    session: u64,
    events: mpsc::Sender<FeedEvent>,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(run(url, session, events, cancel))
}

async fn run(
    url: String,
    session: u64,
    events: mpsc::Sender<FeedEvent>,
    cancel: CancellationToken,
) {
    tracing::debug!(session, url = %url, "Opening feed connection");

    let ws_stream = tokio::select! {
        () = cancel.cancelled() => {
            tracing::debug!(session, "Connection attempt cancelled");
            return;
        }
        result = tokio_tungstenite::connect_async(&url) => match result {
            Ok((ws_stream, _response)) => ws_stream,
            Err(e) => {
                emit(
                    &events,
                    session,
                    FeedEventKind::TransportError(format!("failed to connect: {e}")),
                )
                .await;
                emit(&events, session, FeedEventKind::Closed { clean: false }).await;
                return;
            }
        }
    };

    emit(&events, session, FeedEventKind::Opened).await;

    let (mut write, mut read) = ws_stream.split();

    loop {
        tokio::select! {
            () = cancel.cancelled() => {
                tracing::debug!(session, "Closing feed connection");
                let _ = write.send(Message::Close(None)).await;
                return;
            }
            message = read.next() => match message {
                Some(Ok(Message::Text(text))) => {
                    emit(&events, session, FeedEventKind::Frame(text.to_string())).await;
                }
                Some(Ok(Message::Ping(data))) => {
                    let _ = write.send(Message::Pong(data)).await;
                }
                Some(Ok(Message::Close(_))) => {
                    emit(&events, session, FeedEventKind::Closed { clean: true }).await;
                    return;
                }
                Some(Ok(_)) => {
                    // Binary and pong frames carry nothing for us.
                }
                Some(Err(WsError::ConnectionClosed)) | None => {
                    emit(&events, session, FeedEventKind::Closed { clean: true }).await;
                    return;
                }
                Some(Err(e)) => {
                    emit(
                        &events,
                        session,
                        FeedEventKind::TransportError(format!("transport error: {e}")),
                    )
                    .await;
                    emit(&events, session, FeedEventKind::Closed { clean: false }).await;
                    return;
                }
            }
        }
    }
}

async fn emit(events: &mpsc::Sender<FeedEvent>, session: u64, kind: FeedEventKind) {
    // The receiver going away just means the ingestor is shutting down.
    let _ = events.send(FeedEvent { session, kind }).await;
}
