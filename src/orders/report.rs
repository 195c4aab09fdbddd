//! Execution report returned from order submission.

use crate::orders::order::{Order, OrderId};
use crate::orders::trade::Trade;
use crate::orders::types::OrderStatus;
use crate::utils::canonical;
use rust_decimal::Decimal;
use serde::Serialize;

/// Outcome of a `submit` call: the order's terminal-or-resting state plus
/// every trade it produced, in the order they were produced.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionReport {
    /// Id of the submitted order.
    pub order_id: OrderId,
    /// Symbol the order was routed to.
    pub symbol: String,
    /// Status after matching completed.
    pub status: OrderStatus,
    /// Quantity executed by this submission's matching pass and any earlier
    /// fills of the same order.
    pub filled_quantity: Decimal,
    /// Quantity still open (zero for terminal statuses other than the
    /// market-thin `Rejected` case).
    pub remaining_quantity: Decimal,
    /// Volume-weighted average execution price, zero when unfilled.
    pub average_price: Decimal,
    /// Trades produced by this submission.
    pub trades: Vec<Trade>,
}

impl ExecutionReport {
    pub(crate) fn from_order(order: &Order, trades: Vec<Trade>) -> Self {
        ExecutionReport {
            order_id: order.id,
            symbol: order.symbol.clone(),
            status: order.status,
            filled_quantity: canonical(order.filled_quantity),
            remaining_quantity: canonical(order.remaining_quantity()),
            average_price: canonical(order.average_price()),
            trades,
        }
    }

    pub(crate) fn rejected(order: &Order) -> Self {
        let mut order = order.clone();
        order.status = OrderStatus::Rejected;
        Self::from_order(&order, Vec::new())
    }

    /// Whether the order executed in full.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.remaining_quantity.is_zero()
    }
}
