//! Stream Ingestor Core
//!
//! The single-threaded state machine behind the viewer: it tracks the
//! desired target address, the lifecycle of the one logical connection
//! bound to it, the bounded trade history, and the last connection
//! error. It owns no I/O; the transport layer feeds it session-tagged
//! events and [`super::service::StreamIngestor`] applies the connect
//! and disconnect actions it requests.
//!
//! # Session tags
//!
//! Every connection attempt gets a fresh session number. Transport
//! events carry the session they belong to, and handlers ignore any
//! event whose session is not the current one. A late callback from a
//! superseded connection therefore can never touch the buffer or the
//! error slot of its successor.

use crate::domain::{Trade, TradeHistory};

use super::codec::{self, DecodeError};

// =============================================================================
// Connection State
// =============================================================================

/// Lifecycle state of the logical connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// No connection desired or the last one has closed.
    #[default]
    Disconnected,
    /// A connection attempt is in flight.
    Connecting,
    /// The transport reported a successful open.
    Connected,
}

impl ConnectionState {
    /// Display name of the state.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
        }
    }
}

// =============================================================================
// Transitions
// =============================================================================

/// A requested connection, to be opened by the transport owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connect {
    /// Target address.
    pub url: String,
    /// Session tag the resulting transport events must carry.
    pub session: u64,
}

/// Outcome of a `set_target` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Already bound to this target; nothing to do.
    Unchanged,
    /// Close the current connection and stay disconnected.
    Disconnect,
    /// Close the current connection (if any) and open a new one.
    Connect(Connect),
}

// =============================================================================
// Ingestor Core
// =============================================================================

/// Pure state machine for one stream-ingestion session.
///
/// All methods run to completion on the caller's thread; the expected
/// usage is a single event loop dispatching transport events in
/// arrival order, so no locking is needed around the buffer.
#[derive(Debug)]
pub struct IngestorCore {
    target: Option<String>,
    session: u64,
    state: ConnectionState,
    history: TradeHistory,
    connection_error: Option<String>,
    dropped_frames: u64,
}

impl IngestorCore {
    /// Create a disconnected core with the given history capacity.
    #[must_use]
    pub fn new(history_capacity: usize) -> Self {
        Self {
            target: None,
            session: 0,
            state: ConnectionState::Disconnected,
            history: TradeHistory::new(history_capacity),
            connection_error: None,
            dropped_frames: 0,
        }
    }

    /// Change the desired connection target.
    ///
    /// Idempotent under reentry: asking for the target we are already
    /// connected (or connecting) to is a no-op, so no duplicate
    /// connection can be opened. Any real change bumps the session,
    /// invalidating every event from the previous connection, and
    /// clears the connection error. The history buffer is deliberately
    /// preserved on disconnect so a user can still inspect it; only
    /// [`Self::clear_history`] empties it.
    pub fn set_target(&mut self, target: Option<&str>) -> Transition {
        let unchanged = self.target.as_deref() == target
            && (target.is_none() || self.state != ConnectionState::Disconnected);
        if unchanged {
            return Transition::Unchanged;
        }

        self.session += 1;
        self.connection_error = None;
        self.target = target.map(str::to_owned);

        match target {
            Some(url) => {
                self.state = ConnectionState::Connecting;
                Transition::Connect(Connect {
                    url: url.to_owned(),
                    session: self.session,
                })
            }
            None => {
                self.state = ConnectionState::Disconnected;
                Transition::Disconnect
            }
        }
    }

    /// Empty the trade history. Connection state is unaffected.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Transport reported a successful open.
    pub fn on_open(&mut self, session: u64) {
        if self.is_stale(session) {
            return;
        }
        self.state = ConnectionState::Connected;
        self.connection_error = None;
        tracing::info!(session, target = ?self.target, "Feed connected");
    }

    /// Transport delivered a raw text frame.
    ///
    /// Malformed payloads are expected and frequent; they are dropped
    /// with a diagnostic and never escalate to a connection error.
    pub fn on_frame(&mut self, session: u64, raw: &str) {
        if self.is_stale(session) {
            return;
        }
        match codec::decode_trade(raw) {
            Ok(trade) => self.history.push(trade),
            Err(e) => self.drop_frame(raw, &e),
        }
    }

    /// Transport-level failure (not a parse failure).
    pub fn on_transport_error(&mut self, session: u64, message: &str) {
        if self.is_stale(session) {
            return;
        }
        tracing::warn!(session, error = %message, "Feed transport error");
        self.connection_error = Some(message.to_owned());
    }

    /// Transport closed. `clean` distinguishes an orderly close
    /// handshake from an abrupt drop; only the latter surfaces an
    /// error to the consumer.
    pub fn on_closed(&mut self, session: u64, clean: bool) {
        if self.is_stale(session) {
            return;
        }
        self.state = ConnectionState::Disconnected;
        if clean {
            tracing::info!(session, "Feed closed");
        } else {
            tracing::warn!(session, "Feed closed unexpectedly");
            self.connection_error = Some("connection closed unexpectedly".to_owned());
        }
    }

    /// Current session tag. Events from any other session are ignored.
    #[must_use]
    pub const fn session(&self) -> u64 {
        self.session
    }

    /// Current desired target, if any.
    #[must_use]
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    /// Current connection state.
    #[must_use]
    pub const fn state(&self) -> ConnectionState {
        self.state
    }

    /// Most recent connection-level failure, if any.
    #[must_use]
    pub fn connection_error(&self) -> Option<&str> {
        self.connection_error.as_deref()
    }

    /// The bounded trade history.
    #[must_use]
    pub const fn history(&self) -> &TradeHistory {
        &self.history
    }

    /// Newest-first snapshot of the history.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Trade> {
        self.history.snapshot()
    }

    /// Number of frames dropped by validation since construction.
    #[must_use]
    pub const fn dropped_frames(&self) -> u64 {
        self.dropped_frames
    }

    fn is_stale(&self, session: u64) -> bool {
        if session == self.session {
            return false;
        }
        tracing::trace!(
            event_session = session,
            current_session = self.session,
            "Ignoring event from superseded connection"
        );
        true
    }

    fn drop_frame(&mut self, raw: &str, error: &DecodeError) {
        self.dropped_frames += 1;
        tracing::warn!(
            error = %error,
            frame = %truncate_for_log(raw),
            dropped = self.dropped_frames,
            "Dropped malformed frame"
        );
    }
}

/// Cap frame excerpts in diagnostics; feeds can send arbitrary junk.
fn truncate_for_log(raw: &str) -> &str {
    const MAX_CHARS: usize = 120;
    match raw.char_indices().nth(MAX_CHARS) {
        Some((end, _)) => &raw[..end],
        None => raw,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_A: &str = r#"{"id":"a","timestamp":1000,"symbol":"BTC/USD","price":100.5,"size":0.1,"side":"buy","exchange":"Binance"}"#;
    const VALID_B: &str = r#"{"id":"b","timestamp":2000,"symbol":"ETH/USD","price":50.0,"size":1.5,"side":"sell","exchange":"Kraken"}"#;

    fn connected_core() -> (IngestorCore, u64) {
        let mut core = IngestorCore::new(100);
        let Transition::Connect(connect) = core.set_target(Some("ws://x")) else {
            panic!("expected connect transition");
        };
        core.on_open(connect.session);
        (core, connect.session)
    }

    #[test]
    fn starts_disconnected_and_empty() {
        let core = IngestorCore::new(100);
        assert_eq!(core.state(), ConnectionState::Disconnected);
        assert!(core.snapshot().is_empty());
        assert_eq!(core.connection_error(), None);
    }

    #[test]
    fn set_target_requests_connection() {
        let mut core = IngestorCore::new(100);
        let transition = core.set_target(Some("ws://x"));
        assert_eq!(
            transition,
            Transition::Connect(Connect {
                url: "ws://x".to_string(),
                session: 1,
            })
        );
        assert_eq!(core.state(), ConnectionState::Connecting);
    }

    #[test]
    fn set_target_is_idempotent_while_connected() {
        let (mut core, session) = connected_core();
        assert_eq!(core.set_target(Some("ws://x")), Transition::Unchanged);
        assert_eq!(core.session(), session);
        assert_eq!(core.state(), ConnectionState::Connected);
    }

    #[test]
    fn set_target_same_address_reconnects_after_close() {
        let (mut core, session) = connected_core();
        core.on_closed(session, false);
        assert_eq!(core.state(), ConnectionState::Disconnected);

        let Transition::Connect(connect) = core.set_target(Some("ws://x")) else {
            panic!("expected reconnect after closure");
        };
        assert!(connect.session > session);
        assert_eq!(core.connection_error(), None);
    }

    #[test]
    fn disconnect_clears_error_and_preserves_history() {
        let (mut core, session) = connected_core();
        core.on_frame(session, VALID_A);
        core.on_transport_error(session, "socket error");
        assert!(core.connection_error().is_some());

        assert_eq!(core.set_target(None), Transition::Disconnect);
        assert_eq!(core.state(), ConnectionState::Disconnected);
        assert_eq!(core.connection_error(), None);
        assert_eq!(core.snapshot().len(), 1);
    }

    #[test]
    fn disconnect_when_idle_is_unchanged() {
        let mut core = IngestorCore::new(100);
        assert_eq!(core.set_target(None), Transition::Unchanged);
    }

    #[test]
    fn valid_frames_land_newest_first() {
        let (mut core, session) = connected_core();
        core.on_frame(session, VALID_A);
        core.on_frame(session, VALID_B);

        let snapshot = core.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].id.as_deref(), Some("b"));
        assert_eq!(snapshot[1].id.as_deref(), Some("a"));
    }

    #[test]
    fn malformed_frames_leave_state_untouched() {
        let (mut core, session) = connected_core();
        for raw in [
            "not-a-json-string",
            r#"{"bad":"data","missing":"fields"}"#,
            "{ unclosed json",
            "12345",
            "null",
            r#"["not","an","object"]"#,
        ] {
            core.on_frame(session, raw);
        }
        assert!(core.snapshot().is_empty());
        assert_eq!(core.connection_error(), None);
        assert_eq!(core.dropped_frames(), 6);
    }

    #[test]
    fn interleaved_valid_and_malformed_frames() {
        let (mut core, session) = connected_core();
        core.on_frame(session, VALID_A);
        core.on_frame(session, "{ unclosed json");
        core.on_frame(session, VALID_B);

        let snapshot = core.snapshot();
        let ids: Vec<_> = snapshot.iter().filter_map(|t| t.id.as_deref()).collect();
        assert_eq!(ids, ["b", "a"]);
        assert_eq!(core.connection_error(), None);
    }

    #[test]
    fn late_frames_from_closed_session_are_ignored() {
        let (mut core, session) = connected_core();
        core.set_target(None);
        core.on_frame(session, VALID_A);
        assert!(core.snapshot().is_empty());
    }

    #[test]
    fn target_change_race_only_new_session_wins() {
        let mut core = IngestorCore::new(100);
        let Transition::Connect(a) = core.set_target(Some("ws://a")) else {
            panic!("expected connect");
        };
        // Switch to B before A ever opened.
        let Transition::Connect(b) = core.set_target(Some("ws://b")) else {
            panic!("expected connect");
        };

        // A's in-flight completion and frames arrive late.
        core.on_open(a.session);
        core.on_frame(a.session, VALID_A);
        assert_eq!(core.state(), ConnectionState::Connecting);
        assert!(core.snapshot().is_empty());

        core.on_open(b.session);
        core.on_frame(b.session, VALID_B);
        assert_eq!(core.state(), ConnectionState::Connected);
        assert_eq!(core.snapshot()[0].id.as_deref(), Some("b"));
    }

    #[test]
    fn open_clears_previous_error() {
        let (mut core, session) = connected_core();
        core.on_transport_error(session, "blip");
        core.on_open(session);
        assert_eq!(core.connection_error(), None);
    }

    #[test]
    fn unclean_close_sets_error_clean_close_does_not() {
        let (mut core, session) = connected_core();
        core.on_closed(session, true);
        assert_eq!(core.connection_error(), None);

        let Transition::Connect(connect) = core.set_target(Some("ws://y")) else {
            panic!("expected connect");
        };
        core.on_open(connect.session);
        core.on_closed(connect.session, false);
        assert_eq!(
            core.connection_error(),
            Some("connection closed unexpectedly")
        );
    }

    #[test]
    fn transport_error_is_last_write_wins() {
        let (mut core, session) = connected_core();
        core.on_transport_error(session, "first");
        core.on_closed(session, false);
        assert_eq!(
            core.connection_error(),
            Some("connection closed unexpectedly")
        );
    }

    #[test]
    fn clear_history_does_not_touch_connection() {
        let (mut core, session) = connected_core();
        core.on_frame(session, VALID_A);
        core.clear_history();
        assert!(core.snapshot().is_empty());
        assert_eq!(core.state(), ConnectionState::Connected);
    }
}
