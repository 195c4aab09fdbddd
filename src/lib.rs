//! # Continuous-Auction Matching Engine
//!
//! A limit order book and matching engine for a single trading venue. For
//! each trading symbol the engine maintains the two-sided book of resting
//! orders, accepts incoming orders, matches them under strict price-time
//! priority, emits trades, and publishes the resulting book state and trade
//! stream to subscribers.
//!
//! ## Key Features
//!
//! - **Price-time priority**: the best opposite price is always hit first;
//!   within a price level, orders match strictly in arrival order, and a
//!   partially filled head never loses its queue position.
//! - **Order types**: Market, Limit, Immediate-or-Cancel and Fill-or-Kill,
//!   each with its own admission and remainder policy — FOK is feasibility
//!   pre-checked and mutates nothing unless it can fill in full, IOC never
//!   rests, and a market order that exhausts the book keeps its fills while
//!   the remainder is rejected.
//! - **Exact money arithmetic**: every price, quantity and notional is a
//!   [`rust_decimal::Decimal`]; binary floating point never touches the
//!   match path, and boundary shapes serialise to canonical decimal
//!   strings.
//! - **No trade-throughs**: every execution happens at the maker's resting
//!   price, at or better than the aggressor's limit, and the book can never
//!   end a submit crossed.
//! - **Subscriber fan-out**: trades and depth-capped book snapshots are
//!   delivered synchronously from the match site; FIFO channel bridges
//!   (std and Tokio) adapt the stream to external transports.
//!
//! ## Example
//!
//! ```rust
//! use matchbook::prelude::*;
//! use rust_decimal::Decimal;
//!
//! let engine = MatchingEngine::new();
//!
//! let sell = Order::new(
//!     "BTC-USDT",
//!     OrderType::Limit,
//!     Side::Sell,
//!     Decimal::ONE,
//!     Some(Decimal::from(50_000)),
//! )
//! .unwrap();
//! engine.submit(sell).unwrap();
//!
//! let buy = Order::new(
//!     "BTC-USDT",
//!     OrderType::Market,
//!     Side::Buy,
//!     Decimal::ONE,
//!     None,
//! )
//! .unwrap();
//! let report = engine.submit(buy).unwrap();
//!
//! assert_eq!(report.status, OrderStatus::Filled);
//! assert_eq!(report.trades.len(), 1);
//! // Executions always happen at the maker's resting price.
//! assert_eq!(report.trades[0].price, Decimal::from(50_000));
//! ```
//!
//! ## Concurrency model
//!
//! The matching core is single-threaded cooperative per symbol: every
//! mutation of one book, and the callback dispatch arising from it, runs on
//! the thread driving that symbol. Independent symbols can be driven from
//! independent threads; the engine's per-symbol locking keeps a single book
//! from ever being entered re-entrantly.

pub mod engine;
pub mod orderbook;
pub mod orders;
pub mod prelude;
mod utils;

pub use engine::{
    BookRef, BookUpdateListener, EngineConfig, EngineStats, MatchingEngine, TradeListener,
    book_update_channel, book_update_channel_tokio, trade_channel, trade_channel_tokio,
};
pub use orderbook::{
    BookSnapshot, BookStatistics, DEFAULT_DEPTH_LEVELS, MAX_DEPTH_LEVELS, OrderBook,
    OrderBookError, PriceLevel,
};
pub use orders::{ExecutionReport, Order, OrderId, OrderStatus, OrderType, Side, Trade, TradeId};
pub use utils::{canonical, current_time_millis};
