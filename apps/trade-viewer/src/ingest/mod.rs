//! Stream Ingestion - The core of the viewer.
//!
//! Converts raw WebSocket frames from an untrusted feed into a bounded
//! history of validated trades, and tracks connection state and the
//! last connection-level error for the presentation layer.
//!
//! Split into three pieces:
//! - [`codec`]: frame parsing and field validation,
//! - [`ingestor`]: the pure, session-guarded state machine,
//! - [`feed`] + [`service`]: the tokio transport tasks and the
//!   [`StreamIngestor`] that owns them.

/// Frame decode and validation.
pub mod codec;

/// WebSocket transport task and its events.
pub mod feed;

/// Pure ingestion state machine.
pub mod ingestor;

/// Transport-owning ingestor service.
pub mod service;

pub use codec::{DecodeError, decode_trade};
pub use feed::{FeedEvent, FeedEventKind};
pub use ingestor::{Connect, ConnectionState, IngestorCore, Transition};
pub use service::StreamIngestor;
