//! Domain Layer - Core trade types and buffer policy.
//!
//! This layer contains the canonical trade record and the bounded
//! history buffer. All types here are pure Rust with serialization
//! support and no transport dependencies.

/// Canonical trade record and side enumeration.
pub mod trade;

/// Bounded, newest-first trade history buffer.
pub mod history;

pub use history::{DEFAULT_CAPACITY, TradeHistory};
pub use trade::{Side, Trade};
