//! Multi-symbol matching engine: admission policy, dispatch, statistics and
//! subscriber fan-out.

mod config;
#[allow(clippy::module_inception)]
mod engine;
mod listeners;
mod stats;

pub use config::EngineConfig;
pub use engine::{BookRef, MatchingEngine};
pub use listeners::{
    BookUpdateListener, TradeListener, book_update_channel, book_update_channel_tokio,
    trade_channel, trade_channel_tokio,
};
pub use stats::EngineStats;
