//! Trade Payload Generator
//!
//! Synthesizes well-formed trades and draws the deliberately malformed
//! payload shapes the viewer's codec must reject.

use rand::Rng;
use serde::Serialize;

/// Instruments the feed rotates through.
pub const SYMBOLS: [&str; 4] = ["BTC/USD", "ETH/USD", "SOL/USD", "DOGE/USD"];

/// Venues the feed attributes trades to.
pub const EXCHANGES: [&str; 4] = ["Binance", "Coinbase", "Kraken", "Bybit"];

/// Probability that a frame is malformed.
pub const MALFORMED_RATE: f64 = 0.2;

/// The malformed payload shapes, exactly as sent on the wire.
pub const MALFORMED_PAYLOADS: [&str; 6] = [
    "not-a-json-string",
    r#"{"bad":"data","missing":"fields"}"#,
    "{ unclosed json",
    "12345",
    "null",
    r#"["not","an","object"]"#,
];

/// Trade direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Buyer-initiated.
    Buy,
    /// Seller-initiated.
    Sell,
}

/// A synthetic trade tick, serialized as one JSON object per frame.
#[derive(Debug, Clone, Serialize)]
pub struct Trade {
    /// Unique id (UUID v4).
    pub id: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    /// Traded instrument.
    pub symbol: &'static str,
    /// Trade price, rounded to cents.
    pub price: f64,
    /// Trade quantity, rounded to two decimals.
    pub size: f64,
    /// Trade direction.
    pub side: Side,
    /// Venue.
    pub exchange: &'static str,
}

/// One outbound frame.
#[derive(Debug, Clone)]
pub enum Payload {
    /// A well-formed trade.
    Trade(Trade),
    /// One of [`MALFORMED_PAYLOADS`], verbatim.
    Malformed(&'static str),
}

impl Payload {
    /// Encode this payload to wire text.
    ///
    /// # Errors
    ///
    /// Returns a `serde_json` error if trade serialization fails.
    pub fn encode(&self) -> serde_json::Result<String> {
        match self {
            Self::Trade(trade) => serde_json::to_string(trade),
            Self::Malformed(raw) => Ok((*raw).to_string()),
        }
    }

    /// Whether this payload is one of the malformed shapes.
    #[must_use]
    pub const fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed(_))
    }
}

/// Synthesize one well-formed trade.
pub fn generate_trade<R: Rng + ?Sized>(rng: &mut R) -> Trade {
    Trade {
        id: uuid::Uuid::new_v4().to_string(),
        timestamp: chrono::Utc::now().timestamp_millis(),
        symbol: SYMBOLS[rng.random_range(0..SYMBOLS.len())],
        price: round2(rng.random_range(500.0..50_500.0)),
        size: round2(rng.random_range(0.01..5.01)),
        side: if rng.random_bool(0.5) {
            Side::Buy
        } else {
            Side::Sell
        },
        exchange: EXCHANGES[rng.random_range(0..EXCHANGES.len())],
    }
}

/// Draw the next frame: malformed with probability [`MALFORMED_RATE`].
pub fn next_payload<R: Rng + ?Sized>(rng: &mut R) -> Payload {
    if rng.random_bool(MALFORMED_RATE) {
        Payload::Malformed(MALFORMED_PAYLOADS[rng.random_range(0..MALFORMED_PAYLOADS.len())])
    } else {
        Payload::Trade(generate_trade(rng))
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
