//! The order record: submitted intent plus execution tracking.

use crate::orderbook::OrderBookError;
use crate::orders::types::{OrderStatus, OrderType, Side};
use crate::utils::current_time_millis;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique order identifier, engine-wide.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct OrderId(Uuid);

impl OrderId {
    /// Generate a fresh random identifier.
    #[must_use]
    pub fn new() -> Self {
        OrderId(Uuid::new_v4())
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for OrderId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(OrderId(Uuid::parse_str(s)?))
    }
}

/// A trading order.
///
/// The immutable intent (`symbol`, `order_type`, `side`, `quantity`,
/// `price`) is fixed by the validating constructors; the execution-tracking
/// fields (`status`, `filled_quantity`, `executed_notional`) are mutated by
/// the matching engine as fills occur.
///
/// `executed_notional` accumulates Σ trade.price × trade.quantity over this
/// order's fills, so [`Order::average_price`] is exact in state and only the
/// final division can round.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
    /// Unique identifier.
    pub id: OrderId,
    /// Trading symbol, e.g. `BTC-USDT`. Opaque to the engine.
    pub symbol: String,
    /// Order type.
    pub order_type: OrderType,
    /// Buy or sell.
    pub side: Side,
    /// Original quantity.
    pub quantity: Decimal,
    /// Limit price. `None` exactly when `order_type` is `Market`.
    pub price: Option<Decimal>,
    /// Creation time in milliseconds since the Unix epoch. Within a price
    /// level the queue position, not this field, is authoritative for time
    /// priority.
    pub timestamp: u64,
    /// Lifecycle status.
    pub status: OrderStatus,
    /// Quantity executed so far.
    pub filled_quantity: Decimal,
    /// Exact Σ price × quantity over this order's fills.
    pub executed_notional: Decimal,
}

impl Order {
    /// Create an order with a generated id.
    ///
    /// # Errors
    /// Returns [`OrderBookError::InvalidOrder`] for an empty symbol, a
    /// non-positive quantity, a missing or non-positive price on a priced
    /// type, or a price supplied on a market order.
    pub fn new(
        symbol: impl Into<String>,
        order_type: OrderType,
        side: Side,
        quantity: Decimal,
        price: Option<Decimal>,
    ) -> Result<Self, OrderBookError> {
        Self::with_id(OrderId::new(), symbol, order_type, side, quantity, price)
    }

    /// Create an order with a caller-supplied id.
    ///
    /// # Errors
    /// Same validation as [`Order::new`].
    pub fn with_id(
        id: OrderId,
        symbol: impl Into<String>,
        order_type: OrderType,
        side: Side,
        quantity: Decimal,
        price: Option<Decimal>,
    ) -> Result<Self, OrderBookError> {
        let symbol = symbol.into();
        validate(&symbol, order_type, quantity, price)?;
        Ok(Order {
            id,
            symbol,
            order_type,
            side,
            quantity,
            price,
            timestamp: current_time_millis(),
            status: OrderStatus::Pending,
            filled_quantity: Decimal::ZERO,
            executed_notional: Decimal::ZERO,
        })
    }

    /// Quantity not yet executed.
    #[must_use]
    pub fn remaining_quantity(&self) -> Decimal {
        self.quantity - self.filled_quantity
    }

    /// Whether the order is completely executed.
    #[must_use]
    pub fn is_fully_filled(&self) -> bool {
        self.remaining_quantity().is_zero()
    }

    /// Volume-weighted average execution price; zero before the first fill.
    #[must_use]
    pub fn average_price(&self) -> Decimal {
        if self.filled_quantity.is_zero() {
            Decimal::ZERO
        } else {
            self.executed_notional / self.filled_quantity
        }
    }

    /// Record one fill of `quantity` at `price`.
    pub(crate) fn record_fill(&mut self, price: Decimal, quantity: Decimal) {
        self.filled_quantity += quantity;
        self.executed_notional += price * quantity;
    }
}

fn validate(
    symbol: &str,
    order_type: OrderType,
    quantity: Decimal,
    price: Option<Decimal>,
) -> Result<(), OrderBookError> {
    if symbol.is_empty() {
        return Err(OrderBookError::InvalidOrder {
            reason: "symbol cannot be empty".to_string(),
        });
    }
    if quantity <= Decimal::ZERO {
        return Err(OrderBookError::InvalidOrder {
            reason: format!("quantity must be positive, got {quantity}"),
        });
    }
    match (order_type.requires_price(), price) {
        (true, None) => Err(OrderBookError::InvalidOrder {
            reason: format!("price is required for {order_type} orders"),
        }),
        (true, Some(p)) if p <= Decimal::ZERO => Err(OrderBookError::InvalidOrder {
            reason: format!("price must be positive, got {p}"),
        }),
        (false, Some(_)) => Err(OrderBookError::InvalidOrder {
            reason: "market orders do not take a price".to_string(),
        }),
        _ => Ok(()),
    }
}
