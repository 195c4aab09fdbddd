//! The immutable record of one match event.

use crate::orders::order::OrderId;
use crate::orders::types::Side;
use crate::utils::{canonical, current_time_millis};
use rust_decimal::Decimal;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique trade identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct TradeId(Uuid);

impl TradeId {
    /// Generate a fresh random identifier.
    #[must_use]
    pub fn new() -> Self {
        TradeId(Uuid::new_v4())
    }
}

impl Default for TradeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TradeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TradeId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(TradeId(Uuid::parse_str(s)?))
    }
}

/// One execution between a resting (maker) order and an incoming (taker)
/// order. Immutable once created.
///
/// The fee fields are pass-through: the engine never computes fees, it only
/// carries whatever an external fee layer attaches. They default to zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    /// Unique identifier for this execution.
    pub trade_id: TradeId,
    /// Trading symbol.
    pub symbol: String,
    /// Execution price — always the maker's resting price.
    pub price: Decimal,
    /// Executed quantity, strictly positive.
    pub quantity: Decimal,
    /// Side of the aggressor (taker).
    pub aggressor_side: Side,
    /// Id of the resting order.
    pub maker_order_id: OrderId,
    /// Id of the incoming order.
    pub taker_order_id: OrderId,
    /// Execution time in milliseconds since the Unix epoch.
    pub timestamp: u64,
    /// Pass-through maker fee, zero unless attached externally.
    pub maker_fee: Decimal,
    /// Pass-through taker fee, zero unless attached externally.
    pub taker_fee: Decimal,
}

impl Trade {
    /// Create a trade at the maker's resting price.
    pub(crate) fn new(
        symbol: &str,
        price: Decimal,
        quantity: Decimal,
        aggressor_side: Side,
        maker_order_id: OrderId,
        taker_order_id: OrderId,
    ) -> Self {
        Trade {
            trade_id: TradeId::new(),
            symbol: symbol.to_string(),
            price: canonical(price),
            quantity: canonical(quantity),
            aggressor_side,
            maker_order_id,
            taker_order_id,
            timestamp: current_time_millis(),
            maker_fee: Decimal::ZERO,
            taker_fee: Decimal::ZERO,
        }
    }

    /// `price × quantity`.
    #[must_use]
    pub fn notional_value(&self) -> Decimal {
        canonical(self.price * self.quantity)
    }

    /// Sum of the pass-through fees.
    #[must_use]
    pub fn total_fee(&self) -> Decimal {
        self.maker_fee + self.taker_fee
    }
}

// The event shape includes the derived notional, so Serialize is manual.
impl Serialize for Trade {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("Trade", 11)?;
        state.serialize_field("trade_id", &self.trade_id)?;
        state.serialize_field("symbol", &self.symbol)?;
        state.serialize_field("price", &self.price)?;
        state.serialize_field("quantity", &self.quantity)?;
        state.serialize_field("aggressor_side", &self.aggressor_side)?;
        state.serialize_field("maker_order_id", &self.maker_order_id)?;
        state.serialize_field("taker_order_id", &self.taker_order_id)?;
        state.serialize_field("timestamp", &self.timestamp)?;
        state.serialize_field("maker_fee", &self.maker_fee)?;
        state.serialize_field("taker_fee", &self.taker_fee)?;
        state.serialize_field("notional_value", &self.notional_value())?;
        state.end()
    }
}
