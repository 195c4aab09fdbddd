//! Market-data snapshot and per-book statistics shapes.

use crate::orderbook::book::OrderBook;
use crate::orders::Side;
use crate::utils::{canonical, current_time_millis};
use rust_decimal::Decimal;
use serde::Serialize;

/// Default number of price levels included in a snapshot.
pub const DEFAULT_DEPTH_LEVELS: usize = 10;

/// Hard cap on the number of price levels a snapshot may carry.
pub const MAX_DEPTH_LEVELS: usize = 100;

/// A depth-capped view of one book at a point in time — the shape delivered
/// to book-update subscribers.
///
/// `bids` are ordered descending by price, `asks` ascending; each entry is a
/// `[price, quantity]` pair in canonical decimal form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookSnapshot {
    /// The symbol this snapshot describes.
    pub symbol: String,
    /// Capture time in milliseconds since the Unix epoch.
    pub timestamp: u64,
    /// Highest resting bid, if any.
    pub best_bid: Option<Decimal>,
    /// Lowest resting ask, if any.
    pub best_ask: Option<Decimal>,
    /// Top bid levels, descending, as `(price, aggregate_quantity)`.
    pub bids: Vec<(Decimal, Decimal)>,
    /// Top ask levels, ascending, as `(price, aggregate_quantity)`.
    pub asks: Vec<(Decimal, Decimal)>,
}

/// Summary statistics for one book.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookStatistics {
    /// The symbol these statistics describe.
    pub symbol: String,
    /// Highest resting bid, if any.
    pub best_bid: Option<Decimal>,
    /// Lowest resting ask, if any.
    pub best_ask: Option<Decimal>,
    /// `best_ask − best_bid` when both sides are populated.
    pub spread: Option<Decimal>,
    /// Aggregate resting quantity on the bid side.
    pub total_bid_quantity: Decimal,
    /// Aggregate resting quantity on the ask side.
    pub total_ask_quantity: Decimal,
    /// Number of bid price levels.
    pub bid_levels: usize,
    /// Number of ask price levels.
    pub ask_levels: usize,
    /// Number of resting orders across both sides.
    pub total_orders: usize,
    /// Price of the most recent trade, if any.
    pub last_trade_price: Option<Decimal>,
}

impl OrderBook {
    /// Capture a depth-capped snapshot of this book.
    ///
    /// `depth_levels` is clamped to [`MAX_DEPTH_LEVELS`].
    #[must_use]
    pub fn snapshot(&self, depth_levels: usize) -> BookSnapshot {
        let depth = depth_levels.min(MAX_DEPTH_LEVELS);
        BookSnapshot {
            symbol: self.symbol().to_string(),
            timestamp: current_time_millis(),
            best_bid: self.best_bid().map(canonical),
            best_ask: self.best_ask().map(canonical),
            bids: self.depth(Side::Buy, depth),
            asks: self.depth(Side::Sell, depth),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::{Order, OrderType};
    use rust_decimal_macros::dec;

    fn book_with_levels() -> OrderBook {
        let mut book = OrderBook::new("BTC-USDT");
        for price in [dec!(49000), dec!(48500)] {
            book.submit(
                Order::new("BTC-USDT", OrderType::Limit, Side::Buy, dec!(1), Some(price)).unwrap(),
            )
            .unwrap();
        }
        for price in [dec!(50000), dec!(50500)] {
            book.submit(
                Order::new("BTC-USDT", OrderType::Limit, Side::Sell, dec!(2), Some(price))
                    .unwrap(),
            )
            .unwrap();
        }
        book
    }

    #[test]
    fn snapshot_orders_sides_toward_the_touch() {
        let snapshot = book_with_levels().snapshot(DEFAULT_DEPTH_LEVELS);
        assert_eq!(snapshot.best_bid, Some(dec!(49000)));
        assert_eq!(snapshot.best_ask, Some(dec!(50000)));
        assert_eq!(
            snapshot.bids,
            vec![(dec!(49000), dec!(1)), (dec!(48500), dec!(1))]
        );
        assert_eq!(
            snapshot.asks,
            vec![(dec!(50000), dec!(2)), (dec!(50500), dec!(2))]
        );
    }

    #[test]
    fn snapshot_depth_is_clamped() {
        let mut book = OrderBook::new("BTC-USDT");
        for i in 0..150u32 {
            let price = dec!(40000) + Decimal::from(i);
            book.submit(
                Order::new("BTC-USDT", OrderType::Limit, Side::Buy, dec!(1), Some(price)).unwrap(),
            )
            .unwrap();
        }
        let snapshot = book.snapshot(1000);
        assert_eq!(snapshot.bids.len(), MAX_DEPTH_LEVELS);
    }

    #[test]
    fn snapshot_serialises_to_the_boundary_shape() {
        let snapshot = book_with_levels().snapshot(DEFAULT_DEPTH_LEVELS);
        let value: serde_json::Value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value["symbol"], "BTC-USDT");
        assert_eq!(value["best_bid"], "49000");
        assert_eq!(value["bids"][0][0], "49000");
        assert_eq!(value["bids"][0][1], "1");
        assert_eq!(value["asks"][1][0], "50500");
    }
}
