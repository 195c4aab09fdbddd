//! The engine that owns the per-symbol books and fans events out.

use crate::engine::config::EngineConfig;
use crate::engine::listeners::{BookUpdateListener, TradeListener};
use crate::engine::stats::EngineStats;
use crate::orderbook::{BookSnapshot, BookStatistics, OrderBook, OrderBookError};
use crate::orders::{ExecutionReport, Order, OrderId, OrderStatus, OrderType, Side, Trade};
use crate::utils::canonical;
use crossbeam::atomic::AtomicCell;
use dashmap::DashMap;
use dashmap::mapref::one::Ref;
use parking_lot::RwLock;
use rust_decimal::Decimal;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::{error, info, trace, warn};

/// Shared read guard over one order book.
pub type BookRef<'a> = Ref<'a, String, OrderBook>;

/// Multi-symbol matching engine.
///
/// Owns one [`OrderBook`] per symbol, applies order-type admission and
/// cancellation policy (FOK feasibility pre-check, IOC post-match cancel,
/// market reject-on-exhaustion), and delivers trades and book updates to
/// subscribers synchronously from the match site.
///
/// All methods take `&self`: the symbol map's per-entry lock serialises all
/// mutation of one book on the calling thread while independent symbols
/// proceed in parallel, and a single book is never entered re-entrantly.
pub struct MatchingEngine {
    /// Order books indexed by symbol, created lazily on first order.
    books: DashMap<String, OrderBook>,

    /// Trade subscribers, invoked per trade in execution order.
    trade_listeners: RwLock<Vec<TradeListener>>,

    /// Book-update subscribers, invoked once per affecting submit/cancel.
    book_update_listeners: RwLock<Vec<BookUpdateListener>>,

    /// Orders dispatched to a book (admission rejects excluded).
    orders_processed: AtomicU64,

    /// Trades executed across all books.
    trades_executed: AtomicU64,

    /// Sum of trade notionals across all books.
    total_volume: AtomicCell<Decimal>,

    /// Creation instant, for uptime and rate statistics.
    started_at: Instant,

    /// Admission bounds and snapshot depth.
    config: EngineConfig,
}

impl MatchingEngine {
    /// Create an engine with the default [`EngineConfig`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Create an engine with explicit admission bounds and snapshot depth.
    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self {
        info!("matching engine initialized");
        MatchingEngine {
            books: DashMap::new(),
            trade_listeners: RwLock::new(Vec::new()),
            book_update_listeners: RwLock::new(Vec::new()),
            orders_processed: AtomicU64::new(0),
            trades_executed: AtomicU64::new(0),
            total_volume: AtomicCell::new(Decimal::ZERO),
            started_at: Instant::now(),
            config,
        }
    }

    /// Submit an order: admission, FOK pre-check, dispatch to the symbol's
    /// book (created lazily), statistics and subscriber notification.
    ///
    /// Admission failures and an infeasible FOK return `Ok` with status
    /// [`OrderStatus::Rejected`], an empty trade list and no book mutation.
    ///
    /// # Errors
    /// [`OrderBookError::DuplicateOrderId`] when the id is already resting
    /// in the target book, and [`OrderBookError::BookState`] if the book
    /// detects internal corruption mid-match.
    pub fn submit(&self, mut order: Order) -> Result<ExecutionReport, OrderBookError> {
        if let Some(reason) = self.admission_failure(&order) {
            warn!(order_id = %order.id, %reason, "order rejected at admission");
            order.status = OrderStatus::Rejected;
            return Ok(ExecutionReport::rejected(&order));
        }

        let symbol = order.symbol.clone();
        let mut book = self
            .books
            .entry(symbol.clone())
            .or_insert_with(|| OrderBook::new(&symbol));

        // A FOK order mutates nothing unless it can execute in full. The
        // crossable aggregate is counted under the same per-symbol guard
        // that serialises the dispatch below, so the liquidity it sees is
        // the liquidity the match will consume.
        if order.order_type == OrderType::Fok
            && !book.can_fill_completely(order.side, order.quantity, order.price)
        {
            warn!(order_id = %order.id, "fill-or-kill order cannot be filled in full");
            order.status = OrderStatus::Rejected;
            return Ok(ExecutionReport::rejected(&order));
        }

        let report = book.submit(order)?;
        let snapshot = book.snapshot(self.config.effective_depth());
        drop(book);

        self.orders_processed.fetch_add(1, Ordering::Relaxed);
        self.trades_executed
            .fetch_add(report.trades.len() as u64, Ordering::Relaxed);
        if !report.trades.is_empty() {
            let volume: Decimal = report.trades.iter().map(Trade::notional_value).sum();
            // Written only from dispatching threads; stats reads are
            // best-effort snapshots.
            self.total_volume.store(self.total_volume.load() + volume);
        }

        trace!(
            order_id = %report.order_id,
            status = %report.status,
            trades = report.trades.len(),
            "order processed"
        );
        self.notify_trades(&report.trades);
        self.notify_book_update(&snapshot);
        Ok(report)
    }

    /// Cancel a resting order. Returns whether anything was removed; a
    /// successful cancel publishes a book update for the symbol.
    pub fn cancel(&self, order_id: &OrderId, symbol: &str) -> bool {
        let Some(mut book) = self.books.get_mut(symbol) else {
            warn!(%order_id, %symbol, "cancel for a symbol with no book");
            return false;
        };
        if book.cancel(order_id).is_none() {
            warn!(%order_id, %symbol, "cancel for an unknown order");
            return false;
        }
        let snapshot = book.snapshot(self.config.effective_depth());
        drop(book);
        info!(%order_id, %symbol, "order cancelled");
        self.notify_book_update(&snapshot);
        true
    }

    /// Current state of a resting order, cloned out of the book.
    #[must_use]
    pub fn order(&self, order_id: &OrderId, symbol: &str) -> Option<Order> {
        self.books.get(symbol)?.order(order_id).cloned()
    }

    /// Guarded read access to a symbol's book.
    #[must_use]
    pub fn book(&self, symbol: &str) -> Option<BookRef<'_>> {
        self.books.get(symbol)
    }

    /// Best bid and offer for `symbol`; `(None, None)` when no book exists.
    #[must_use]
    pub fn bbo(&self, symbol: &str) -> (Option<Decimal>, Option<Decimal>) {
        self.books
            .get(symbol)
            .map(|book| book.bbo())
            .unwrap_or((None, None))
    }

    /// Top-`levels` depth on `side` of `symbol`; empty when no book exists.
    #[must_use]
    pub fn depth(&self, symbol: &str, side: Side, levels: usize) -> Vec<(Decimal, Decimal)> {
        self.books
            .get(symbol)
            .map(|book| book.depth(side, levels))
            .unwrap_or_default()
    }

    /// Depth-capped market-data snapshot of `symbol`.
    #[must_use]
    pub fn book_snapshot(&self, symbol: &str) -> Option<BookSnapshot> {
        self.books
            .get(symbol)
            .map(|book| book.snapshot(self.config.effective_depth()))
    }

    /// Summary statistics for one symbol's book.
    #[must_use]
    pub fn symbol_statistics(&self, symbol: &str) -> Option<BookStatistics> {
        self.books.get(symbol).map(|book| book.statistics())
    }

    /// Explicitly create a book for `symbol`. A no-op when one exists.
    pub fn add_book(&self, symbol: &str) {
        if self.books.contains_key(symbol) {
            warn!(%symbol, "order book already exists");
            return;
        }
        self.books
            .insert(symbol.to_string(), OrderBook::new(symbol));
    }

    /// Remove and return the book for `symbol`, if any.
    pub fn remove_book(&self, symbol: &str) -> Option<OrderBook> {
        let removed = self.books.remove(symbol).map(|(_, book)| book);
        if removed.is_some() {
            info!(%symbol, "order book removed");
        }
        removed
    }

    /// Whether a book exists for `symbol`.
    #[must_use]
    pub fn has_book(&self, symbol: &str) -> bool {
        self.books.contains_key(symbol)
    }

    /// Number of active books.
    #[must_use]
    pub fn book_count(&self) -> usize {
        self.books.len()
    }

    /// Symbols with an active book.
    #[must_use]
    pub fn symbols(&self) -> Vec<String> {
        self.books.iter().map(|entry| entry.key().clone()).collect()
    }

    /// Register a trade subscriber. Registration may happen at runtime.
    pub fn subscribe_trades(&self, listener: TradeListener) {
        self.trade_listeners.write().push(listener);
    }

    /// Register a book-update subscriber. Registration may happen at
    /// runtime.
    pub fn subscribe_book_updates(&self, listener: BookUpdateListener) {
        self.book_update_listeners.write().push(listener);
    }

    /// Aggregate counters and uptime.
    #[must_use]
    pub fn stats(&self) -> EngineStats {
        let uptime = self.started_at.elapsed().as_secs_f64();
        let orders = self.orders_processed.load(Ordering::Relaxed);
        let trades = self.trades_executed.load(Ordering::Relaxed);
        EngineStats {
            uptime_seconds: uptime,
            total_orders_processed: orders,
            total_trades_executed: trades,
            total_volume: canonical(self.total_volume.load()),
            active_symbols: self.symbols(),
            orders_per_second: orders as f64 / uptime.max(1.0),
            trades_per_second: trades as f64 / uptime.max(1.0),
        }
    }

    /// Reason this order fails admission, if any. Admission rejects never
    /// touch a book.
    fn admission_failure(&self, order: &Order) -> Option<String> {
        if order.symbol.is_empty() {
            return Some("symbol cannot be empty".to_string());
        }
        if order.quantity <= Decimal::ZERO {
            return Some(format!("quantity must be positive, got {}", order.quantity));
        }
        if order.quantity < self.config.min_quantity || order.quantity > self.config.max_quantity {
            return Some(format!(
                "quantity {} outside [{}, {}]",
                order.quantity, self.config.min_quantity, self.config.max_quantity
            ));
        }
        match (order.order_type.requires_price(), order.price) {
            (true, None) => Some(format!("price required for {} orders", order.order_type)),
            (true, Some(price)) if price <= Decimal::ZERO => {
                Some(format!("price must be positive, got {price}"))
            }
            (true, Some(price))
                if price < self.config.min_price || price > self.config.max_price =>
            {
                Some(format!(
                    "price {} outside [{}, {}]",
                    price, self.config.min_price, self.config.max_price
                ))
            }
            (false, Some(_)) => Some("market orders do not take a price".to_string()),
            _ => None,
        }
    }

    /// Deliver every trade to every subscriber, trades outermost so each
    /// subscriber sees execution order. A panicking subscriber is logged
    /// and skipped; it never unwinds into the match state or starves later
    /// subscribers.
    fn notify_trades(&self, trades: &[Trade]) {
        if trades.is_empty() {
            return;
        }
        let listeners = self.trade_listeners.read();
        for trade in trades {
            for listener in listeners.iter() {
                if catch_unwind(AssertUnwindSafe(|| listener(trade))).is_err() {
                    error!(trade_id = %trade.trade_id, "trade subscriber panicked; continuing");
                }
            }
        }
    }

    /// Deliver one book update to every subscriber, with the same panic
    /// isolation as trade delivery.
    fn notify_book_update(&self, snapshot: &BookSnapshot) {
        let listeners = self.book_update_listeners.read();
        for listener in listeners.iter() {
            if catch_unwind(AssertUnwindSafe(|| listener(snapshot))).is_err() {
                error!(symbol = %snapshot.symbol, "book-update subscriber panicked; continuing");
            }
        }
    }
}

impl Default for MatchingEngine {
    fn default() -> Self {
        Self::new()
    }
}
