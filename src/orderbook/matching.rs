//! The matching algorithm: strict price-time priority.

use crate::orderbook::book::OrderBook;
use crate::orderbook::error::OrderBookError;
use crate::orderbook::level::PriceLevel;
use crate::orders::{Order, OrderStatus, Side, Trade};
use rust_decimal::Decimal;
use tracing::trace;

impl OrderBook {
    /// Match `taker` against the opposite side until its remainder is zero,
    /// the opposite side is exhausted, or the next level fails the price
    /// check. Trades execute at the maker's resting price, never at the
    /// taker's limit.
    ///
    /// Price priority: the best opposite level is always visited first
    /// (lowest ask for a buy, highest bid for a sell). Time priority: the
    /// head of a level is filled until its remaining quantity is zero; only
    /// then does matching advance to the next maker, so a partially filled
    /// head keeps its queue position.
    pub(super) fn execute(&mut self, taker: &mut Order) -> Result<Vec<Trade>, OrderBookError> {
        let mut trades = Vec::new();

        while !taker.remaining_quantity().is_zero() {
            let best_price = match taker.side {
                Side::Buy => self.asks.keys().next().copied(),
                Side::Sell => self.bids.keys().next_back().copied(),
            };
            let Some(level_price) = best_price else {
                break;
            };

            // Market orders take any price; priced types stop at the limit.
            if let Some(limit) = taker.price
                && !crosses(taker.side, level_price, limit)
            {
                break;
            }

            let opposite = match taker.side {
                Side::Buy => &mut self.asks,
                Side::Sell => &mut self.bids,
            };
            let Some(level) = opposite.get_mut(&level_price) else {
                return Err(OrderBookError::BookState {
                    detail: format!("best price {level_price} has no level"),
                });
            };

            while !taker.remaining_quantity().is_zero() {
                let Some(maker) = level.head_mut() else {
                    break;
                };

                let fill = taker.remaining_quantity().min(maker.remaining_quantity());
                if fill <= Decimal::ZERO {
                    return Err(OrderBookError::BookState {
                        detail: format!("non-positive fill against maker {}", maker.id),
                    });
                }

                let trade = Trade::new(
                    &self.symbol,
                    level_price,
                    fill,
                    taker.side,
                    maker.id,
                    taker.id,
                );
                maker.record_fill(level_price, fill);
                taker.record_fill(level_price, fill);

                let maker_done = maker.remaining_quantity().is_zero();
                maker.status = if maker_done {
                    OrderStatus::Filled
                } else {
                    OrderStatus::PartiallyFilled
                };

                level.reduce_total(fill);
                if maker_done {
                    // Advance to the next maker only now that the head has
                    // zero remaining quantity; otherwise the taker is the
                    // one exhausted and the head keeps its position.
                    if let Some(done) = level.pop_head() {
                        self.order_locations.remove(&done.id);
                    }
                }

                self.last_trade_price = Some(level_price);
                trace!(
                    taker = %trade.taker_order_id,
                    maker = %trade.maker_order_id,
                    price = %trade.price,
                    quantity = %trade.quantity,
                    "trade executed"
                );
                trades.push(trade);
            }

            if level.is_empty() {
                opposite.remove(&level_price);
            }
        }

        Ok(trades)
    }

    /// Whether `quantity` could be fully executed right now at or better
    /// than `limit_price` (`None` means any price). Walks the opposite side
    /// accumulating crossable aggregate quantity, stopping early once the
    /// target is reached. Used for the FOK feasibility pre-check; does not
    /// mutate the book.
    #[must_use]
    pub fn can_fill_completely(
        &self,
        side: Side,
        quantity: Decimal,
        limit_price: Option<Decimal>,
    ) -> bool {
        let levels: Box<dyn Iterator<Item = (&Decimal, &PriceLevel)>> = match side {
            Side::Buy => Box::new(self.asks.iter()),
            Side::Sell => Box::new(self.bids.iter().rev()),
        };

        let mut available = Decimal::ZERO;
        for (&price, level) in levels {
            if let Some(limit) = limit_price
                && !crosses(side, price, limit)
            {
                break;
            }
            available += level.total_quantity();
            if available >= quantity {
                return true;
            }
        }
        false
    }
}

/// Whether an aggressor on `side` with limit `limit` may trade at
/// `level_price`.
fn crosses(side: Side, level_price: Decimal, limit: Decimal) -> bool {
    match side {
        Side::Buy => level_price <= limit,
        Side::Sell => level_price >= limit,
    }
}
