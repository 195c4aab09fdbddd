//! Core OrderBook implementation: two-sided price levels and the order index.

use crate::orderbook::error::OrderBookError;
use crate::orderbook::level::PriceLevel;
use crate::orderbook::snapshot::BookStatistics;
use crate::orders::{ExecutionReport, Order, OrderId, OrderStatus, OrderType, Side};
use crate::utils::canonical;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};
use tracing::{error, info, trace};

/// The order book for one symbol.
///
/// Both sides are ordered maps keyed by price, so the best bid is the last
/// bid key and the best ask the first ask key — O(log n) insertion, O(1)
/// best-price peek, and no stale-price bookkeeping. `order_locations` maps a
/// resting order's id to its `(price, side)` so cancel and lookup avoid
/// scanning the whole book.
///
/// All mutation of one book is expected to happen on a single logical thread
/// of control; the engine's per-symbol entry lock enforces this when books
/// are driven through [`crate::engine::MatchingEngine`].
#[derive(Debug)]
pub struct OrderBook {
    /// The symbol this book trades.
    pub(super) symbol: String,

    /// Bid side (buy orders), keyed by price. Best bid is the highest key.
    pub(super) bids: BTreeMap<Decimal, PriceLevel>,

    /// Ask side (sell orders), keyed by price. Best ask is the lowest key.
    pub(super) asks: BTreeMap<Decimal, PriceLevel>,

    /// Resting order id → (price, side), for O(log n) cancel and lookup.
    pub(super) order_locations: HashMap<OrderId, (Decimal, Side)>,

    /// Price of the most recent trade on this book.
    pub(super) last_trade_price: Option<Decimal>,
}

impl OrderBook {
    /// Create an empty book for `symbol`.
    #[must_use]
    pub fn new(symbol: &str) -> Self {
        info!(%symbol, "order book created");
        OrderBook {
            symbol: symbol.to_string(),
            bids: BTreeMap::new(),
            asks: BTreeMap::new(),
            order_locations: HashMap::new(),
            last_trade_price: None,
        }
    }

    /// The symbol of this order book.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Submit an order: match it against the opposite side and apply its
    /// type-specific fate to any remainder.
    ///
    /// Returns the execution report carrying every trade produced, in the
    /// order produced. A limit remainder rests in the book; IOC and FOK
    /// remainders are cancelled; a market remainder is rejected while its
    /// trades stand.
    ///
    /// # Errors
    /// [`OrderBookError::SymbolMismatch`] when the order belongs to another
    /// book, [`OrderBookError::DuplicateOrderId`] when the id is already
    /// resting here, and [`OrderBookError::BookState`] if an internal
    /// invariant is found violated mid-match.
    pub fn submit(&mut self, mut order: Order) -> Result<ExecutionReport, OrderBookError> {
        if order.symbol != self.symbol {
            return Err(OrderBookError::SymbolMismatch {
                order_id: order.id,
                order_symbol: order.symbol.clone(),
                book_symbol: self.symbol.clone(),
            });
        }
        if self.order_locations.contains_key(&order.id) {
            return Err(OrderBookError::DuplicateOrderId(order.id));
        }

        let trades = self.execute(&mut order)?;

        let remaining = order.remaining_quantity();
        match order.order_type {
            OrderType::Limit => {
                if remaining.is_zero() {
                    order.status = OrderStatus::Filled;
                } else if order.filled_quantity.is_zero() {
                    order.status = OrderStatus::Pending;
                } else {
                    order.status = OrderStatus::PartiallyFilled;
                }
            }
            // IOC never rests. FOK takes the same branch: the engine's
            // feasibility pre-check guarantees a full fill, so a non-zero
            // remainder is only reachable when the book is driven directly.
            OrderType::Ioc | OrderType::Fok => {
                if remaining.is_zero() {
                    order.status = OrderStatus::Filled;
                } else if order.filled_quantity.is_zero() {
                    order.status = OrderStatus::Cancelled;
                } else {
                    order.status = OrderStatus::PartiallyFilled;
                }
            }
            OrderType::Market => {
                if remaining.is_zero() {
                    order.status = OrderStatus::Filled;
                } else {
                    // The remainder is rejected but the fills stand.
                    order.status = OrderStatus::Rejected;
                    trace!(
                        order_id = %order.id,
                        %remaining,
                        "market order exhausted the book, rejecting remainder"
                    );
                }
            }
        }

        let report = ExecutionReport::from_order(&order, trades);
        if order.order_type == OrderType::Limit && !remaining.is_zero() {
            self.rest(order)?;
        }
        Ok(report)
    }

    /// Cancel a resting order.
    ///
    /// Removes it from its level, drops the level if emptied, and returns
    /// the order with status `Cancelled`. `None` when the id is unknown.
    pub fn cancel(&mut self, order_id: &OrderId) -> Option<Order> {
        let (price, side) = self.order_locations.remove(order_id)?;
        let side_map = match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        };
        let Some(level) = side_map.get_mut(&price) else {
            error!(%order_id, %price, "order location points at a missing level");
            return None;
        };
        let order = level.remove(order_id);
        if level.is_empty() {
            side_map.remove(&price);
        }
        match order {
            Some(mut order) => {
                order.status = OrderStatus::Cancelled;
                trace!(%order_id, %price, "order cancelled");
                Some(order)
            }
            None => {
                error!(%order_id, %price, "order missing from its recorded level");
                None
            }
        }
    }

    /// Highest resting bid price, if any.
    #[must_use]
    pub fn best_bid(&self) -> Option<Decimal> {
        self.bids.keys().next_back().copied()
    }

    /// Lowest resting ask price, if any.
    #[must_use]
    pub fn best_ask(&self) -> Option<Decimal> {
        self.asks.keys().next().copied()
    }

    /// Best bid and offer as a pair.
    #[must_use]
    pub fn bbo(&self) -> (Option<Decimal>, Option<Decimal>) {
        (self.best_bid(), self.best_ask())
    }

    /// `best_ask − best_bid` when both sides are populated.
    #[must_use]
    pub fn spread(&self) -> Option<Decimal> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some(ask - bid),
            _ => None,
        }
    }

    /// Midpoint of the best bid and ask.
    #[must_use]
    pub fn mid_price(&self) -> Option<Decimal> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some((bid + ask) / Decimal::TWO),
            _ => None,
        }
    }

    /// Price of the most recent trade, if any.
    #[must_use]
    pub fn last_trade_price(&self) -> Option<Decimal> {
        self.last_trade_price
    }

    /// Top `levels` price levels on `side` with aggregate quantity per
    /// level, ordered toward the touch: bids descending, asks ascending.
    #[must_use]
    pub fn depth(&self, side: Side, levels: usize) -> Vec<(Decimal, Decimal)> {
        match side {
            Side::Buy => self
                .bids
                .iter()
                .rev()
                .take(levels)
                .map(|(price, level)| (canonical(*price), canonical(level.total_quantity())))
                .collect(),
            Side::Sell => self
                .asks
                .iter()
                .take(levels)
                .map(|(price, level)| (canonical(*price), canonical(level.total_quantity())))
                .collect(),
        }
    }

    /// Look up a resting order by id.
    #[must_use]
    pub fn order(&self, order_id: &OrderId) -> Option<&Order> {
        let (price, side) = self.order_locations.get(order_id)?;
        let side_map = match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        };
        side_map.get(price)?.iter().find(|o| o.id == *order_id)
    }

    /// Number of resting orders across both sides.
    #[must_use]
    pub fn order_count(&self) -> usize {
        self.order_locations.len()
    }

    /// Aggregate resting quantity on the bid side.
    #[must_use]
    pub fn total_bid_quantity(&self) -> Decimal {
        self.bids.values().map(PriceLevel::total_quantity).sum()
    }

    /// Aggregate resting quantity on the ask side.
    #[must_use]
    pub fn total_ask_quantity(&self) -> Decimal {
        self.asks.values().map(PriceLevel::total_quantity).sum()
    }

    /// Summary statistics for this book.
    #[must_use]
    pub fn statistics(&self) -> BookStatistics {
        BookStatistics {
            symbol: self.symbol.clone(),
            best_bid: self.best_bid().map(canonical),
            best_ask: self.best_ask().map(canonical),
            spread: self.spread().map(canonical),
            total_bid_quantity: canonical(self.total_bid_quantity()),
            total_ask_quantity: canonical(self.total_ask_quantity()),
            bid_levels: self.bids.len(),
            ask_levels: self.asks.len(),
            total_orders: self.order_count(),
            last_trade_price: self.last_trade_price.map(canonical),
        }
    }

    /// Rest a limit remainder in its own side, creating the level if absent.
    fn rest(&mut self, order: Order) -> Result<(), OrderBookError> {
        let price = order.price.ok_or_else(|| OrderBookError::BookState {
            detail: format!("order {} would rest without a price", order.id),
        })?;
        let id = order.id;
        let side = order.side;
        let side_map = match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        };
        side_map
            .entry(price)
            .or_insert_with(|| PriceLevel::new(price))
            .append(order);
        self.order_locations.insert(id, (price, side));
        Ok(())
    }

    /// Walk the whole book and verify its structural invariants: levels
    /// non-empty with consistent cached totals, orders on the correct side
    /// at the correct price with a live status, the id index in one-to-one
    /// correspondence with the resting orders, and an uncrossed market.
    ///
    /// # Errors
    /// [`OrderBookError::BookState`] describing the first violation found.
    pub fn check_invariants(&self) -> Result<(), OrderBookError> {
        if let (Some(bid), Some(ask)) = (self.best_bid(), self.best_ask())
            && bid >= ask
        {
            return Err(OrderBookError::BookState {
                detail: format!("crossed book: best bid {bid} >= best ask {ask}"),
            });
        }

        let mut resting = 0usize;
        for (side, side_map) in [(Side::Buy, &self.bids), (Side::Sell, &self.asks)] {
            for (price, level) in side_map {
                if level.is_empty() {
                    return Err(OrderBookError::BookState {
                        detail: format!("empty level retained at {price} on {side} side"),
                    });
                }
                let mut sum = Decimal::ZERO;
                for order in level.iter() {
                    resting += 1;
                    sum += order.remaining_quantity();
                    if order.side != side {
                        return Err(OrderBookError::BookState {
                            detail: format!("order {} on the wrong side at {price}", order.id),
                        });
                    }
                    if order.price != Some(*price) {
                        return Err(OrderBookError::BookState {
                            detail: format!("order {} priced off its level {price}", order.id),
                        });
                    }
                    if !matches!(
                        order.status,
                        OrderStatus::Pending | OrderStatus::PartiallyFilled
                    ) {
                        return Err(OrderBookError::BookState {
                            detail: format!(
                                "resting order {} has terminal status {}",
                                order.id, order.status
                            ),
                        });
                    }
                    if order.remaining_quantity() <= Decimal::ZERO
                        || order.remaining_quantity() > order.quantity
                    {
                        return Err(OrderBookError::BookState {
                            detail: format!("order {} has impossible remainder", order.id),
                        });
                    }
                    match self.order_locations.get(&order.id) {
                        Some(&(loc_price, loc_side))
                            if loc_price == *price && loc_side == side => {}
                        _ => {
                            return Err(OrderBookError::BookState {
                                detail: format!("order {} missing from the id index", order.id),
                            });
                        }
                    }
                }
                if sum != level.total_quantity() {
                    return Err(OrderBookError::BookState {
                        detail: format!(
                            "level {price} caches {} but holds {sum}",
                            level.total_quantity()
                        ),
                    });
                }
            }
        }
        if resting != self.order_locations.len() {
            return Err(OrderBookError::BookState {
                detail: format!(
                    "id index holds {} entries for {resting} resting orders",
                    self.order_locations.len()
                ),
            });
        }
        Ok(())
    }
}
