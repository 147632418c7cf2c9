#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp))]

//! Mock Feed - Trade Stream Fixture
//!
//! A WebSocket server that pushes one synthetic trade frame per
//! interval to every connected client. Roughly one frame in five is
//! deliberately malformed, covering every shape the viewer's codec
//! must reject: plain text, an object missing the required fields,
//! truncated JSON, a bare scalar, JSON null, and a JSON array. The
//! viewer treats whatever arrives as untrusted bytes; this crate is
//! the conformance target for that posture.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

/// Payload synthesis, well-formed and malformed.
pub mod generator;

/// WebSocket push server.
pub mod server;

pub use generator::{
    EXCHANGES, MALFORMED_PAYLOADS, MALFORMED_RATE, Payload, SYMBOLS, Side, Trade, generate_trade,
    next_payload,
};
pub use server::serve_client;
