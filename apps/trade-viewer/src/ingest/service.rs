//! Stream Ingestor Service
//!
//! Binds the pure [`IngestorCore`] state machine to real transport
//! tasks. This is the type consumers hold: it applies the connect and
//! disconnect actions the core requests, owns the event channel the
//! transport feeds, and guarantees at most one live socket per
//! instance on every path, including teardown.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::domain::Trade;

use super::feed::{self, FeedEvent, FeedEventKind};
use super::ingestor::{ConnectionState, IngestorCore, Transition};

/// Capacity of the transport event channel. A slow consumer applies
/// backpressure to the transport task rather than growing unbounded.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// A stream ingestor with a live transport behind it.
///
/// The consumer drives it from a single loop:
///
/// ```ignore
/// let mut ingestor = StreamIngestor::new(100);
/// ingestor.set_target(Some("ws://localhost:8080"));
/// while let Some(event) = ingestor.next_event().await {
///     ingestor.handle_event(event);
///     render(&ingestor.snapshot());
/// }
/// ```
#[derive(Debug)]
pub struct StreamIngestor {
    core: IngestorCore,
    events_tx: mpsc::Sender<FeedEvent>,
    events_rx: mpsc::Receiver<FeedEvent>,
    connection: Option<CancellationToken>,
}

impl StreamIngestor {
    /// Create a disconnected ingestor with the given history capacity.
    #[must_use]
    pub fn new(history_capacity: usize) -> Self {
        let (events_tx, events_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            core: IngestorCore::new(history_capacity),
            events_tx,
            events_rx,
            connection: None,
        }
    }

    /// Change the desired connection target.
    ///
    /// Closing and opening are asynchronous; completion is observed via
    /// the events pumped through [`Self::next_event`]. Calling this
    /// again with the current target while connected is a no-op.
    pub fn set_target(&mut self, target: Option<&str>) {
        match self.core.set_target(target) {
            Transition::Unchanged => {}
            Transition::Disconnect => self.close_connection(),
            Transition::Connect(connect) => {
                self.close_connection();
                let cancel = CancellationToken::new();
                let _task = feed::spawn(
                    connect.url,
                    connect.session,
                    self.events_tx.clone(),
                    cancel.clone(),
                );
                self.connection = Some(cancel);
            }
        }
    }

    /// Empty the trade history without touching the connection.
    pub fn clear_history(&mut self) {
        self.core.clear_history();
    }

    /// Wait for the next transport event.
    ///
    /// Returns `None` only if every sender is gone, which cannot happen
    /// while the ingestor itself holds one; in practice this pends when
    /// no connection is active.
    pub async fn next_event(&mut self) -> Option<FeedEvent> {
        self.events_rx.recv().await
    }

    /// Apply one transport event to the core state machine.
    pub fn handle_event(&mut self, event: FeedEvent) {
        let FeedEvent { session, kind } = event;
        match kind {
            FeedEventKind::Opened => self.core.on_open(session),
            FeedEventKind::Frame(raw) => self.core.on_frame(session, &raw),
            FeedEventKind::TransportError(message) => {
                self.core.on_transport_error(session, &message);
            }
            FeedEventKind::Closed { clean } => {
                self.core.on_closed(session, clean);
                // The current connection is gone; release its token.
                if self.core.state() == ConnectionState::Disconnected
                    && session == self.core.session()
                {
                    self.close_connection();
                }
            }
        }
    }

    /// Newest-first snapshot of the accepted trades.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Trade> {
        self.core.snapshot()
    }

    /// Most recent connection-level failure, if any.
    #[must_use]
    pub fn connection_error(&self) -> Option<&str> {
        self.core.connection_error()
    }

    /// Current connection state.
    #[must_use]
    pub const fn state(&self) -> ConnectionState {
        self.core.state()
    }

    /// Current desired target, if any.
    #[must_use]
    pub fn target(&self) -> Option<&str> {
        self.core.target()
    }

    /// Number of frames dropped by validation since construction.
    #[must_use]
    pub const fn dropped_frames(&self) -> u64 {
        self.core.dropped_frames()
    }

    fn close_connection(&mut self) {
        if let Some(cancel) = self.connection.take() {
            cancel.cancel();
        }
    }
}

impl Drop for StreamIngestor {
    fn drop(&mut self) {
        // Teardown must release the transport even if the consumer
        // never called set_target(None).
        self.close_connection();
    }
}
