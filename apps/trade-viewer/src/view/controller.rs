//! View Controller
//!
//! Holds the user-entered feed address and forwards intents to the
//! [`StreamIngestor`]. Address validation happens here, before any
//! connection attempt, so a bad address never has connection side
//! effects.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::domain::Trade;
use crate::ingest::{ConnectionState, FeedEvent, StreamIngestor};

/// User-entered address problems, caught before connecting.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    /// Nothing was entered.
    #[error("please enter a WebSocket address")]
    Empty,

    /// The address does not use a WebSocket scheme.
    #[error("address must start with ws:// or wss://")]
    InvalidScheme,
}

/// Validate a user-entered feed address.
///
/// # Errors
///
/// Returns an [`AddressError`] when the trimmed input is empty or does
/// not carry a `ws://`/`wss://` scheme.
pub fn validate_address(raw: &str) -> Result<&str, AddressError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AddressError::Empty);
    }
    if !trimmed.starts_with("ws://") && !trimmed.starts_with("wss://") {
        return Err(AddressError::InvalidScheme);
    }
    Ok(trimmed)
}

/// The external-facing shell: start/stop/clear intents over one
/// ingestor instance.
#[derive(Debug)]
pub struct ViewController {
    ingestor: StreamIngestor,
}

impl ViewController {
    /// Wrap an ingestor.
    #[must_use]
    pub const fn new(ingestor: StreamIngestor) -> Self {
        Self { ingestor }
    }

    /// Validate `raw` and point the ingestor at it.
    ///
    /// # Errors
    ///
    /// Returns an [`AddressError`] without touching the ingestor when
    /// the address is invalid.
    pub fn connect(&mut self, raw: &str) -> Result<(), AddressError> {
        let address = validate_address(raw)?;
        self.ingestor.set_target(Some(address));
        Ok(())
    }

    /// Close the connection. History is preserved for inspection.
    pub fn disconnect(&mut self) {
        self.ingestor.set_target(None);
    }

    /// Drop all buffered trades.
    pub fn clear(&mut self) {
        self.ingestor.clear_history();
    }

    /// Wait for the next transport event.
    pub async fn next_event(&mut self) -> Option<FeedEvent> {
        self.ingestor.next_event().await
    }

    /// Apply one transport event.
    pub fn handle_event(&mut self, event: FeedEvent) {
        self.ingestor.handle_event(event);
    }

    /// Newest-first snapshot of accepted trades.
    #[must_use]
    pub fn trades(&self) -> Vec<Trade> {
        self.ingestor.snapshot()
    }

    /// Most recent connection-level failure, if any.
    #[must_use]
    pub fn connection_error(&self) -> Option<&str> {
        self.ingestor.connection_error()
    }

    /// Current connection state.
    #[must_use]
    pub const fn state(&self) -> ConnectionState {
        self.ingestor.state()
    }

    /// The address currently connected (or connecting) to.
    #[must_use]
    pub fn address(&self) -> Option<&str> {
        self.ingestor.target()
    }
}

/// Pump transport events and repaint on a fixed cadence.
///
/// The repaint ticker runs independently of the event stream, so a
/// fast feed cannot starve rendering and an idle feed still repaints
/// every `refresh`. Returns when `shutdown` fires or the event channel
/// closes.
pub async fn drive<F>(
    controller: &mut ViewController,
    refresh: Duration,
    shutdown: &CancellationToken,
    mut repaint: F,
) where
    F: FnMut(&ViewController),
{
    let mut ticker = tokio::time::interval(refresh);
    loop {
        tokio::select! {
            () = shutdown.cancelled() => return,
            _ = ticker.tick() => repaint(controller),
            event = controller.next_event() => match event {
                Some(event) => controller.handle_event(event),
                None => return,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ws_and_wss_schemes() {
        assert_eq!(validate_address("ws://localhost:8080"), Ok("ws://localhost:8080"));
        assert_eq!(validate_address("  wss://feed.example  "), Ok("wss://feed.example"));
    }

    #[test]
    fn rejects_other_schemes() {
        assert_eq!(
            validate_address("http://localhost:8080"),
            Err(AddressError::InvalidScheme)
        );
        assert_eq!(validate_address("localhost:8080"), Err(AddressError::InvalidScheme));
    }

    #[test]
    fn rejects_empty_input() {
        assert_eq!(validate_address(""), Err(AddressError::Empty));
        assert_eq!(validate_address("   "), Err(AddressError::Empty));
    }

    #[tokio::test]
    async fn invalid_address_has_no_connection_side_effects() {
        let mut controller = ViewController::new(StreamIngestor::new(100));
        assert!(controller.connect("http://nope").is_err());
        assert_eq!(controller.state(), ConnectionState::Disconnected);
        assert_eq!(controller.address(), None);
    }

    #[tokio::test]
    async fn connect_forwards_trimmed_address() {
        let mut controller = ViewController::new(StreamIngestor::new(100));
        controller.connect(" ws://127.0.0.1:1 ").unwrap();
        assert_eq!(controller.address(), Some("ws://127.0.0.1:1"));
        assert_eq!(controller.state(), ConnectionState::Connecting);

        controller.disconnect();
        assert_eq!(controller.address(), None);
    }
}
