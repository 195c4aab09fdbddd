//! Aggregate engine statistics.

use rust_decimal::Decimal;
use serde::Serialize;

/// Best-effort snapshot of the engine's aggregate counters.
#[derive(Debug, Clone, Serialize)]
pub struct EngineStats {
    /// Seconds since the engine was created.
    pub uptime_seconds: f64,
    /// Orders accepted for processing (including rejected ones).
    pub total_orders_processed: u64,
    /// Trades executed across all books.
    pub total_trades_executed: u64,
    /// Sum of trade notionals across all books.
    pub total_volume: Decimal,
    /// Symbols with an active book.
    pub active_symbols: Vec<String>,
    /// `total_orders_processed / uptime_seconds`.
    pub orders_per_second: f64,
    /// `total_trades_executed / uptime_seconds`.
    pub trades_per_second: f64,
}
