//! Subscriber callback types and FIFO channel bridges.
//!
//! The engine dispatches synchronously from the match site; callers that
//! want to consume events on their own thread or task bridge through one of
//! the channel constructors here. The channels are FIFO, so the engine's
//! ordering guarantees carry across the bridge, and the core neither knows
//! nor cares what runs on the far side.

use crate::orderbook::BookSnapshot;
use crate::orders::Trade;
use std::sync::Arc;
use std::sync::mpsc;
use tracing::error;

/// Callback invoked for every trade, in execution order.
pub type TradeListener = Arc<dyn Fn(&Trade) + Send + Sync>;

/// Callback invoked with the post-submit book snapshot of the affected
/// symbol.
pub type BookUpdateListener = Arc<dyn Fn(&BookSnapshot) + Send + Sync>;

/// Trade listener bridged to a standard-library mpsc channel.
///
/// Events are cloned into the channel; drop the receiver to stop consuming
/// (sends onto a disconnected channel are logged and discarded).
#[must_use]
pub fn trade_channel() -> (TradeListener, mpsc::Receiver<Trade>) {
    let (sender, receiver) = mpsc::channel();
    let listener: TradeListener = Arc::new(move |trade: &Trade| {
        if let Err(e) = sender.send(trade.clone()) {
            error!("failed to forward trade event: {e}");
        }
    });
    (listener, receiver)
}

/// Trade listener bridged to a Tokio unbounded mpsc channel, for async
/// consumers.
#[must_use]
pub fn trade_channel_tokio() -> (TradeListener, tokio::sync::mpsc::UnboundedReceiver<Trade>) {
    let (sender, receiver) = tokio::sync::mpsc::unbounded_channel();
    let listener: TradeListener = Arc::new(move |trade: &Trade| {
        if let Err(e) = sender.send(trade.clone()) {
            error!("failed to forward trade event: {e}");
        }
    });
    (listener, receiver)
}

/// Book-update listener bridged to a standard-library mpsc channel.
#[must_use]
pub fn book_update_channel() -> (BookUpdateListener, mpsc::Receiver<BookSnapshot>) {
    let (sender, receiver) = mpsc::channel();
    let listener: BookUpdateListener = Arc::new(move |snapshot: &BookSnapshot| {
        if let Err(e) = sender.send(snapshot.clone()) {
            error!("failed to forward book update: {e}");
        }
    });
    (listener, receiver)
}

/// Book-update listener bridged to a Tokio unbounded mpsc channel.
#[must_use]
pub fn book_update_channel_tokio() -> (
    BookUpdateListener,
    tokio::sync::mpsc::UnboundedReceiver<BookSnapshot>,
) {
    let (sender, receiver) = tokio::sync::mpsc::unbounded_channel();
    let listener: BookUpdateListener = Arc::new(move |snapshot: &BookSnapshot| {
        if let Err(e) = sender.send(snapshot.clone()) {
            error!("failed to forward book update: {e}");
        }
    });
    (listener, receiver)
}
