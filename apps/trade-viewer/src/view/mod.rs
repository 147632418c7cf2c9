//! View Layer - Consumer shell around the ingestor.
//!
//! Purely reactive glue: it validates user-entered addresses, forwards
//! connect/disconnect/clear intents to the ingestor, and renders
//! snapshots. No stream or buffer logic lives here.

/// Address validation and user intents.
pub mod controller;

/// Plain-text table rendering of a snapshot.
pub mod table;

pub use controller::{AddressError, ViewController, drive};
pub use table::render;
