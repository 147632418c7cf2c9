#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::too_many_lines,
        clippy::needless_pass_by_value
    )
)]

//! Trade Viewer - Live Trades Terminal
//!
//! Connects to a streaming trade feed over a WebSocket, validates
//! every inbound frame, and keeps the most recent trades in a bounded
//! history for display. The feed is untrusted by contract: roughly a
//! fifth of the companion mock feed's frames are deliberately
//! malformed, and the ingestor must shrug all of them off.
//!
//! # Layers (inside -> outside)
//!
//! - **Domain**: canonical trade record and bounded history buffer
//! - **Ingest**: the core - frame codec, session-guarded state
//!   machine, and the WebSocket transport tasks
//! - **View**: address validation, user intents, table rendering
//!
//! # Data Flow
//!
//! ```text
//! user intent ──► ViewController ──► StreamIngestor ──► WebSocket
//!                       ▲                  │
//!                       │    validated     ▼
//!                  snapshot ◄── TradeHistory ◄── codec ◄── frames
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Module Declarations
// =============================================================================

/// Domain layer - trade record and bounded history.
pub mod domain;

/// Stream ingestion core - codec, state machine, transport.
pub mod ingest;

/// View layer - controller shell and table rendering.
pub mod view;

/// Environment-driven configuration.
pub mod config;

/// Tracing subscriber setup.
pub mod telemetry;

// =============================================================================
// Re-exports
// =============================================================================

// Domain types
pub use domain::{DEFAULT_CAPACITY, Side, Trade, TradeHistory};

// Ingestion core
pub use ingest::{
    ConnectionState, DecodeError, FeedEvent, FeedEventKind, IngestorCore, StreamIngestor,
    decode_trade,
};

// View shell
pub use view::{AddressError, ViewController, drive, render};

// Configuration
pub use config::{ConfigError, ViewerConfig};
