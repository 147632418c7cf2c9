//! Trade Record Types
//!
//! The canonical internal representation of a trade tick. The wire
//! format is a single JSON object per WebSocket text frame:
//!
//! ```json
//! {"id":"a","timestamp":1000,"symbol":"BTC/USD","price":100.5,"size":0.1,"side":"buy","exchange":"Binance"}
//! ```
//!
//! `timestamp`, `symbol`, `price`, and `size` are required; `id`,
//! `side`, and `exchange` are passed through when present. Validation
//! of inbound frames lives in [`crate::ingest::codec`]; a constructed
//! `Trade` is always well-formed.

use serde::{Deserialize, Serialize};

/// Trade direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Buyer-initiated trade.
    Buy,
    /// Seller-initiated trade.
    Sell,
}

impl Side {
    /// Wire/display name of the side.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
        }
    }
}

/// A validated trade tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    /// Opaque unique token (e.g. a UUID). Passed through, never validated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Milliseconds since the Unix epoch.
    #[serde(rename = "timestamp")]
    pub timestamp_ms: i64,

    /// Traded instrument, e.g. "BTC/USD".
    pub symbol: String,

    /// Trade price. Always finite.
    pub price: f64,

    /// Trade quantity. Always finite.
    pub size: f64,

    /// Trade direction, when the feed provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<Side>,

    /// Venue the trade printed on, e.g. "Binance".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exchange: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_as_str() {
        assert_eq!(Side::Buy.as_str(), "buy");
        assert_eq!(Side::Sell.as_str(), "sell");
    }

    #[test]
    fn trade_round_trips_through_json() {
        let trade = Trade {
            id: Some("a".to_string()),
            timestamp_ms: 1000,
            symbol: "BTC/USD".to_string(),
            price: 100.5,
            size: 0.1,
            side: Some(Side::Buy),
            exchange: Some("Binance".to_string()),
        };

        let json = serde_json::to_string(&trade).unwrap();
        assert!(json.contains("\"timestamp\":1000"));

        let back: Trade = serde_json::from_str(&json).unwrap();
        assert_eq!(back, trade);
    }

    #[test]
    fn optional_fields_deserialize_as_none() {
        let trade: Trade =
            serde_json::from_str(r#"{"timestamp":1,"symbol":"ETH/USD","price":2.0,"size":3.0}"#)
                .unwrap();
        assert_eq!(trade.id, None);
        assert_eq!(trade.side, None);
        assert_eq!(trade.exchange, None);
    }
}
