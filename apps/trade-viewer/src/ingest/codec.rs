//! Frame Codec
//!
//! Decodes and validates inbound WebSocket text frames into [`Trade`]
//! records. Every frame is untrusted: the companion feed deliberately
//! interleaves malformed payloads (plain text, truncated JSON, bare
//! scalars, nulls, arrays, objects missing fields), and real feeds are
//! no better behaved. A frame that fails any check is dropped with a
//! diagnostic; it never tears down the connection.
//!
//! Required fields per the wire contract: `timestamp` (integer ms),
//! `symbol` (non-empty string), `price` and `size` (finite numbers).
//! `id`, `side`, and `exchange` are optional pass-through; values of
//! the wrong type are stripped rather than rejecting the frame.

use serde_json::Value;

use crate::domain::{Side, Trade};

/// Reasons a frame was rejected.
///
/// These are diagnostics, not connection errors: a rejected frame is
/// logged and dropped while the stream keeps flowing.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The frame is not valid JSON at all.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The frame parsed but is not a JSON object.
    #[error("frame is not an object (got {0})")]
    NotAnObject(&'static str),

    /// A required field is absent.
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    /// A required field has the wrong JSON type.
    #[error("field `{field}` has wrong type (expected {expected})")]
    WrongType {
        /// Name of the offending field.
        field: &'static str,
        /// Expected JSON type.
        expected: &'static str,
    },

    /// A required string field is empty.
    #[error("field `{0}` is empty")]
    EmptyField(&'static str),

    /// A numeric field is NaN or infinite.
    #[error("field `{0}` is not a finite number")]
    NonFinite(&'static str),
}

/// Decode a raw text frame into a validated [`Trade`].
///
/// # Errors
///
/// Returns a [`DecodeError`] describing the first check that failed.
pub fn decode_trade(raw: &str) -> Result<Trade, DecodeError> {
    let value: Value = serde_json::from_str(raw)?;

    let kind = json_kind(&value);
    let Value::Object(map) = value else {
        return Err(DecodeError::NotAnObject(kind));
    };

    let timestamp_ms = require_integer(&map, "timestamp")?;
    let symbol = require_non_empty_string(&map, "symbol")?;
    let price = require_finite(&map, "price")?;
    let size = require_finite(&map, "size")?;

    Ok(Trade {
        id: optional_string(&map, "id"),
        timestamp_ms,
        symbol,
        price,
        size,
        side: optional_side(&map),
        exchange: optional_string(&map, "exchange"),
    })
}

/// Human-readable JSON type name, for diagnostics.
const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn require_integer(
    map: &serde_json::Map<String, Value>,
    field: &'static str,
) -> Result<i64, DecodeError> {
    let value = map.get(field).ok_or(DecodeError::MissingField(field))?;
    match value {
        Value::Number(n) => n.as_i64().ok_or(DecodeError::WrongType {
            field,
            expected: "integer",
        }),
        _ => Err(DecodeError::WrongType {
            field,
            expected: "integer",
        }),
    }
}

fn require_string(
    map: &serde_json::Map<String, Value>,
    field: &'static str,
) -> Result<String, DecodeError> {
    let value = map.get(field).ok_or(DecodeError::MissingField(field))?;
    value
        .as_str()
        .map(str::to_owned)
        .ok_or(DecodeError::WrongType {
            field,
            expected: "string",
        })
}

fn require_non_empty_string(
    map: &serde_json::Map<String, Value>,
    field: &'static str,
) -> Result<String, DecodeError> {
    let value = require_string(map, field)?;
    if value.is_empty() {
        return Err(DecodeError::EmptyField(field));
    }
    Ok(value)
}

fn require_finite(
    map: &serde_json::Map<String, Value>,
    field: &'static str,
) -> Result<f64, DecodeError> {
    let value = map.get(field).ok_or(DecodeError::MissingField(field))?;
    let number = value.as_f64().ok_or(DecodeError::WrongType {
        field,
        expected: "number",
    })?;
    if number.is_finite() {
        Ok(number)
    } else {
        Err(DecodeError::NonFinite(field))
    }
}

/// Optional string field; non-string values are dropped, not fatal.
fn optional_string(map: &serde_json::Map<String, Value>, field: &str) -> Option<String> {
    map.get(field).and_then(Value::as_str).map(str::to_owned)
}

/// Optional side field; anything other than "buy"/"sell" is dropped.
fn optional_side(map: &serde_json::Map<String, Value>) -> Option<Side> {
    match map.get("side").and_then(Value::as_str) {
        Some("buy") => Some(Side::Buy),
        Some("sell") => Some(Side::Sell),
        _ => None,
    }
}
