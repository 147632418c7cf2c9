//! Trade Table Rendering
//!
//! Formats a snapshot into a fixed-width text table, newest trade
//! first. Pure string building so it can be tested without a terminal.

use chrono::DateTime;

use crate::domain::{Side, Trade};

/// Column layout: time, price, size, side, symbol, exchange.
const HEADER: &str = "TIME          PRICE         SIZE     SIDE  SYMBOL      EXCHANGE";

/// Render a snapshot and optional connection error as a text table.
#[must_use]
pub fn render(trades: &[Trade], connection_error: Option<&str>, connected: bool) -> String {
    let mut out = String::new();

    if let Some(error) = connection_error {
        out.push_str(&format!("! {error}\n\n"));
    }

    out.push_str(HEADER);
    out.push('\n');

    if trades.is_empty() {
        out.push_str(if connected {
            "(waiting for trades...)\n"
        } else {
            "(no connection established)\n"
        });
        return out;
    }

    for trade in trades {
        out.push_str(&render_row(trade));
        out.push('\n');
    }

    out
}

fn render_row(trade: &Trade) -> String {
    let time = DateTime::from_timestamp_millis(trade.timestamp_ms)
        .map_or_else(|| "-".to_string(), |t| t.format("%H:%M:%S%.3f").to_string());
    let side = trade.side.map_or("-", Side::as_str);
    let exchange = trade.exchange.as_deref().unwrap_or("-");

    format!(
        "{time:<12}  {price:>10.2}  {size:>9.4}  {side:<4}  {symbol:<10}  {exchange}",
        price = trade.price,
        size = trade.size,
        symbol = trade.symbol,
    )
}
