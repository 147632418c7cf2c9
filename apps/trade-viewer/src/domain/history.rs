//! Bounded Trade History
//!
//! An ordered, newest-first buffer of accepted trades, capped at a
//! fixed maximum count. When the cap is reached the oldest entry is
//! evicted, so memory use stays constant however long a feed runs.

use std::collections::VecDeque;

use super::trade::Trade;

/// Default maximum number of trades retained.
pub const DEFAULT_CAPACITY: usize = 100;

/// Bounded, newest-first sequence of accepted trades.
///
/// Trades are pushed in arrival order; index 0 is always the most
/// recent. Eviction at capacity is O(1).
#[derive(Debug, Clone)]
pub struct TradeHistory {
    trades: VecDeque<Trade>,
    capacity: usize,
}

impl TradeHistory {
    /// Create an empty history holding at most `capacity` trades.
    ///
    /// A zero capacity is bumped to 1 so a push is never a silent drop.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            trades: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Maximum number of trades retained.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of trades currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.trades.len()
    }

    /// Whether the history is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    /// Prepend a trade, evicting the oldest entry beyond capacity.
    pub fn push(&mut self, trade: Trade) {
        self.trades.push_front(trade);
        while self.trades.len() > self.capacity {
            self.trades.pop_back();
        }
    }

    /// Drop all trades. Capacity is unchanged.
    pub fn clear(&mut self) {
        self.trades.clear();
    }

    /// Iterate newest-first.
    pub fn iter(&self) -> impl Iterator<Item = &Trade> {
        self.trades.iter()
    }

    /// Clone the current contents, newest-first.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Trade> {
        self.trades.iter().cloned().collect()
    }
}

impl Default for TradeHistory {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn trade(symbol: &str, price: f64) -> Trade {
        Trade {
            id: None,
            timestamp_ms: 0,
            symbol: symbol.to_string(),
            price,
            size: 1.0,
            side: None,
            exchange: None,
        }
    }

    #[test]
    fn newest_first_ordering() {
        let mut history = TradeHistory::new(10);
        history.push(trade("A", 1.0));
        history.push(trade("B", 2.0));
        history.push(trade("C", 3.0));

        let symbols: Vec<_> = history.iter().map(|t| t.symbol.as_str()).collect();
        assert_eq!(symbols, ["C", "B", "A"]);
    }

    #[test]
    fn evicts_oldest_at_capacity() {
        let mut history = TradeHistory::new(2);
        history.push(trade("A", 1.0));
        history.push(trade("B", 2.0));
        history.push(trade("C", 3.0));

        assert_eq!(history.len(), 2);
        let symbols: Vec<_> = history.iter().map(|t| t.symbol.as_str()).collect();
        assert_eq!(symbols, ["C", "B"]);
    }

    #[test]
    fn clear_empties_but_keeps_capacity() {
        let mut history = TradeHistory::new(5);
        history.push(trade("A", 1.0));
        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.capacity(), 5);
    }

    #[test]
    fn zero_capacity_is_bumped() {
        let mut history = TradeHistory::new(0);
        history.push(trade("A", 1.0));
        assert_eq!(history.len(), 1);
    }

    proptest! {
        #[test]
        fn length_never_exceeds_capacity(prices in proptest::collection::vec(0.0f64..1e6, 0..400)) {
            let mut history = TradeHistory::new(DEFAULT_CAPACITY);
            for price in &prices {
                history.push(trade("X", *price));
            }
            prop_assert!(history.len() <= DEFAULT_CAPACITY);

            // Newest-first order matches reversed arrival order of the tail.
            let expected: Vec<_> = prices
                .iter()
                .rev()
                .take(DEFAULT_CAPACITY)
                .copied()
                .collect();
            let actual: Vec<_> = history.iter().map(|t| t.price).collect();
            prop_assert_eq!(actual, expected);
        }
    }
}
