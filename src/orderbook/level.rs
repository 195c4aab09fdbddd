//! A single price level: the FIFO queue of resting orders at one price.

use crate::orders::{Order, OrderId};
use rust_decimal::Decimal;
use std::collections::VecDeque;
use tracing::trace;

/// All resting orders at one price on one side of the book.
///
/// Orders are kept in arrival order; appending is the only way in, so the
/// queue position realises time priority. A partial fill of the head never
/// moves it — it stays at the front until fully consumed or cancelled.
///
/// `total_quantity` caches Σ remaining quantity over the queue and is kept
/// in lockstep by [`append`](Self::append), [`pop_head`](Self::pop_head),
/// [`remove`](Self::remove) and [`reduce_total`](Self::reduce_total).
#[derive(Debug, Clone)]
pub struct PriceLevel {
    price: Decimal,
    orders: VecDeque<Order>,
    total_quantity: Decimal,
}

impl PriceLevel {
    /// Create an empty level at `price`.
    #[must_use]
    pub fn new(price: Decimal) -> Self {
        PriceLevel {
            price,
            orders: VecDeque::new(),
            total_quantity: Decimal::ZERO,
        }
    }

    /// The price shared by every order in this level.
    #[must_use]
    pub fn price(&self) -> Decimal {
        self.price
    }

    /// Aggregate remaining quantity across the queue.
    #[must_use]
    pub fn total_quantity(&self) -> Decimal {
        self.total_quantity
    }

    /// Number of resting orders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Whether the queue is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Place `order` at the tail of the time queue.
    pub fn append(&mut self, order: Order) {
        trace!(order_id = %order.id, price = %self.price, "resting order appended");
        self.total_quantity += order.remaining_quantity();
        self.orders.push_back(order);
    }

    /// The order at the head of the queue, if any.
    #[must_use]
    pub fn peek_head(&self) -> Option<&Order> {
        self.orders.front()
    }

    /// Mutable access to the head for fill bookkeeping.
    pub(crate) fn head_mut(&mut self) -> Option<&mut Order> {
        self.orders.front_mut()
    }

    /// Remove and return the head, subtracting its remaining quantity.
    pub fn pop_head(&mut self) -> Option<Order> {
        let order = self.orders.pop_front()?;
        self.total_quantity -= order.remaining_quantity();
        Some(order)
    }

    /// Remove a specific order regardless of queue position. Used only for
    /// cancellation; O(k) in the queue length.
    pub fn remove(&mut self, order_id: &OrderId) -> Option<Order> {
        let position = self.orders.iter().position(|o| o.id == *order_id)?;
        let order = self.orders.remove(position)?;
        self.total_quantity -= order.remaining_quantity();
        trace!(%order_id, price = %self.price, "resting order removed");
        Some(order)
    }

    /// Subtract an executed fill from the cached total.
    pub(crate) fn reduce_total(&mut self, quantity: Decimal) {
        self.total_quantity -= quantity;
    }

    /// Iterate the queue in time-priority order.
    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter()
    }
}
