//! Prelude module that re-exports the commonly used types.
//!
//! ```rust
//! use matchbook::prelude::*;
//! ```

// Engine and configuration
pub use crate::engine::{EngineConfig, EngineStats, MatchingEngine};

// Subscriber plumbing
pub use crate::engine::{
    BookUpdateListener, TradeListener, book_update_channel, book_update_channel_tokio,
    trade_channel, trade_channel_tokio,
};

// Order book and market-data shapes
pub use crate::orderbook::{
    BookSnapshot, BookStatistics, OrderBook, OrderBookError, PriceLevel,
};

// Order, trade and report records
pub use crate::orders::{
    ExecutionReport, Order, OrderId, OrderStatus, OrderType, Side, Trade, TradeId,
};

// Utility functions
pub use crate::utils::{canonical, current_time_millis};
