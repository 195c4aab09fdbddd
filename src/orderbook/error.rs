//! Order book error types.

use crate::orders::OrderId;
use thiserror::Error;

/// Errors surfaced by the order book and engine.
///
/// Business outcomes — an IOC remainder cancelled, an infeasible FOK, a
/// market order hitting a thin book — are not errors; they are reported as
/// [`crate::orders::OrderStatus`] values on the execution report.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum OrderBookError {
    /// The order failed construction-time validation.
    #[error("invalid order: {reason}")]
    InvalidOrder {
        /// What the validation objected to.
        reason: String,
    },

    /// An order was submitted to a book for a different symbol.
    #[error("order {order_id} is for {order_symbol}, book handles {book_symbol}")]
    SymbolMismatch {
        /// The offending order.
        order_id: OrderId,
        /// Symbol on the order.
        order_symbol: String,
        /// Symbol of the receiving book.
        book_symbol: String,
    },

    /// An order with this id is already resting in the target book.
    #[error("duplicate order id: {0}")]
    DuplicateOrderId(OrderId),

    /// An internal invariant does not hold. This is a programmer error; the
    /// current submit is aborted and the condition surfaced loudly.
    #[error("order book state corrupted: {detail}")]
    BookState {
        /// Description of the violated invariant.
        detail: String,
    },
}
