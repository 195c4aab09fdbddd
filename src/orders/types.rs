//! Closed enumerations for order side, type and lifecycle status.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The side of an order or trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// An order to purchase the base asset.
    Buy,
    /// An order to sell the base asset.
    Sell,
}

impl Side {
    /// Returns the opposite side (the side an order matches against).
    #[must_use]
    pub fn opposite(&self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "buy"),
            Side::Sell => write!(f, "sell"),
        }
    }
}

/// Supported order types.
///
/// - `Market`: execute immediately at the best available price.
/// - `Limit`: execute at the limit price or better; remainder rests.
/// - `Ioc`: immediate-or-cancel; remainder is cancelled, never rests.
/// - `Fok`: fill-or-kill; executes in full immediately or not at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    /// Execute immediately at the best available price.
    Market,
    /// Execute at the specified price or better.
    Limit,
    /// Immediate or cancel.
    Ioc,
    /// Fill or kill.
    Fok,
}

impl OrderType {
    /// Whether orders of this type must carry a limit price.
    ///
    /// Market orders forbid a price; every other type requires one.
    #[must_use]
    pub fn requires_price(&self) -> bool {
        !matches!(self, OrderType::Market)
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderType::Market => write!(f, "market"),
            OrderType::Limit => write!(f, "limit"),
            OrderType::Ioc => write!(f, "ioc"),
            OrderType::Fok => write!(f, "fok"),
        }
    }
}

/// Order lifecycle status.
///
/// `Filled`, `Cancelled` and `Rejected` are terminal. An IOC order that
/// executed partially ends in `PartiallyFilled`, which is terminal for it
/// because the remainder never rests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Accepted and resting, no fills yet.
    Pending,
    /// Some quantity executed, some remains.
    PartiallyFilled,
    /// Fully executed.
    Filled,
    /// Removed by the owner or by IOC policy.
    Cancelled,
    /// Refused: validation failure, infeasible FOK, or the unhonoured
    /// remainder of a market order.
    Rejected,
}

impl OrderStatus {
    /// Whether this status admits no further transitions.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Filled | OrderStatus::Cancelled | OrderStatus::Rejected
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "pending"),
            OrderStatus::PartiallyFilled => write!(f, "partially_filled"),
            OrderStatus::Filled => write!(f, "filled"),
            OrderStatus::Cancelled => write!(f, "cancelled"),
            OrderStatus::Rejected => write!(f, "rejected"),
        }
    }
}
