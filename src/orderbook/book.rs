//! Core book state: arena, ladders, index, counters and collaborator handles.
//!
//! One `OrderBook` instance is bound to one symbol and is mutated by exactly
//! one executor at a time; every public operation completes synchronously
//! before returning. Parallelism belongs a layer up, one book per symbol.

use std::sync::Arc;

use slab::Slab;
use tracing::trace;

use super::error::OrderBookError;
use super::events::{BestPrices, BookUpdate, BookUpdateKind, MarketEvent};
use super::index::{OrderIndex, OrderLocation};
use super::ladder::Ladder;
use super::node::OrderNode;
use super::order::{Order, OrderId, Side};
use super::publisher::{NullPublisher, Publisher};
use super::risk::RiskGate;
use super::snapshot::{DepthLevel, DepthSnapshot};
use crate::utils::current_time_millis;

/// A single-symbol limit order book with a continuous matching engine.
///
/// The book owns every resting order: orders live in a slab arena, price
/// levels thread FIFO queues through it, and an id index gives O(1) cancel
/// and modify. Matching follows strict price-time priority: best price
/// first, oldest order first at a price, maker sets the trade price.
///
/// # Examples
/// ```
/// use matchbook_rs::{Order, OrderBook, Side, TimeInForce};
///
/// let mut book = OrderBook::new("BTC/USD");
/// book.submit(Order::limit(1, Side::Buy, 10_000, 5, TimeInForce::Gtc)).unwrap();
/// book.submit(Order::limit(2, Side::Sell, 10_050, 3, TimeInForce::Gtc)).unwrap();
///
/// assert_eq!(book.best_bid(), Some(10_000));
/// assert_eq!(book.best_ask(), Some(10_050));
/// assert_eq!(book.spread(), Some(50));
/// ```
pub struct OrderBook {
    /// The symbol this book trades
    pub(super) symbol: String,

    /// Arena of resting order nodes; levels link through it by slab key
    pub(super) arena: Slab<OrderNode>,

    /// Bid side, best = highest price
    pub(super) bids: Ladder,

    /// Ask side, best = lowest price
    pub(super) asks: Ladder,

    /// Order id -> (side, price, arena key) for O(1) cancel/modify
    pub(super) order_index: OrderIndex,

    /// Logical admission clock; bumped once per admitted order
    pub(super) admit_counter: u64,

    /// Last sequence number handed out; every emitted event gets the next one
    pub(super) sequence: u64,

    /// Last trade id handed out
    pub(super) next_trade_id: u64,

    /// Price of the most recent fill, if any
    pub(super) last_trade_price: Option<u128>,

    /// When set, limit prices must be exact multiples of this value
    pub(super) tick_size: Option<u128>,

    /// When set, quantities must be exact multiples of this value
    pub(super) lot_size: Option<u64>,

    /// Pre-trade validation hook; `None` admits everything
    pub(super) risk_gate: Option<Arc<dyn RiskGate>>,

    /// Sink for every emitted event
    pub(super) publisher: Arc<dyn Publisher>,
}

impl OrderBook {
    /// Create an empty book for `symbol` with no publisher or risk gate.
    pub fn new(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            arena: Slab::new(),
            bids: Ladder::new(Side::Buy),
            asks: Ladder::new(Side::Sell),
            order_index: OrderIndex::new(),
            admit_counter: 0,
            sequence: 0,
            next_trade_id: 0,
            last_trade_price: None,
            tick_size: None,
            lot_size: None,
            risk_gate: None,
            publisher: Arc::new(NullPublisher),
        }
    }

    /// Create a book that pre-allocates arena capacity for `order_capacity`
    /// resting orders.
    pub fn with_capacity(symbol: &str, order_capacity: usize) -> Self {
        let mut book = Self::new(symbol);
        book.arena = Slab::with_capacity(order_capacity);
        book
    }

    /// Create a book that publishes every event through `publisher`.
    pub fn with_publisher(symbol: &str, publisher: Arc<dyn Publisher>) -> Self {
        let mut book = Self::new(symbol);
        book.publisher = publisher;
        book
    }

    /// Create a book that validates every order through `risk_gate` before
    /// admission.
    pub fn with_risk_gate(symbol: &str, risk_gate: Arc<dyn RiskGate>) -> Self {
        let mut book = Self::new(symbol);
        book.risk_gate = Some(risk_gate);
        book
    }

    /// Create a book with both a publisher and a risk gate.
    pub fn with_publisher_and_risk_gate(
        symbol: &str,
        publisher: Arc<dyn Publisher>,
        risk_gate: Arc<dyn RiskGate>,
    ) -> Self {
        let mut book = Self::new(symbol);
        book.publisher = publisher;
        book.risk_gate = Some(risk_gate);
        book
    }

    /// Replace the publisher.
    pub fn set_publisher(&mut self, publisher: Arc<dyn Publisher>) {
        self.publisher = publisher;
    }

    /// Install or replace the risk gate.
    pub fn set_risk_gate(&mut self, risk_gate: Arc<dyn RiskGate>) {
        self.risk_gate = Some(risk_gate);
    }

    /// Remove the risk gate; subsequent orders skip pre-trade validation.
    pub fn clear_risk_gate(&mut self) {
        self.risk_gate = None;
    }

    /// Require limit prices to be exact multiples of `tick_size`.
    pub fn set_tick_size(&mut self, tick_size: u128) {
        self.tick_size = Some(tick_size);
    }

    /// Require quantities to be exact multiples of `lot_size`.
    pub fn set_lot_size(&mut self, lot_size: u64) {
        self.lot_size = Some(lot_size);
    }

    /// The configured tick size, if any.
    #[must_use]
    #[inline]
    pub fn tick_size(&self) -> Option<u128> {
        self.tick_size
    }

    /// The configured lot size, if any.
    #[must_use]
    #[inline]
    pub fn lot_size(&self) -> Option<u64> {
        self.lot_size
    }

    /// The symbol this book trades.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Best bid price, if the bid side is non-empty. O(1).
    #[must_use]
    pub fn best_bid(&self) -> Option<u128> {
        self.bids.best_price()
    }

    /// Best ask price, if the ask side is non-empty. O(1).
    #[must_use]
    pub fn best_ask(&self) -> Option<u128> {
        self.asks.best_price()
    }

    /// Best bid price and its aggregate resting quantity.
    #[must_use]
    pub fn best_bid_with_size(&self) -> Option<(u128, u64)> {
        self.bids
            .best()
            .map(|level| (level.price, level.total_quantity()))
    }

    /// Best ask price and its aggregate resting quantity.
    #[must_use]
    pub fn best_ask_with_size(&self) -> Option<(u128, u64)> {
        self.asks
            .best()
            .map(|level| (level.price, level.total_quantity()))
    }

    /// Midpoint of best bid and best ask.
    #[must_use]
    pub fn mid_price(&self) -> Option<f64> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some((bid as f64 + ask as f64) / 2.0),
            _ => None,
        }
    }

    /// Best ask minus best bid.
    #[must_use]
    pub fn spread(&self) -> Option<u128> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some(ask.saturating_sub(bid)),
            _ => None,
        }
    }

    /// Price of the most recent fill, if the book has traded.
    #[must_use]
    pub fn last_trade_price(&self) -> Option<u128> {
        self.last_trade_price
    }

    /// Number of live resting orders across both sides.
    #[must_use]
    pub fn count_orders(&self) -> usize {
        self.order_index.len()
    }

    /// Number of distinct price levels on one side.
    #[must_use]
    pub fn count_levels(&self, side: Side) -> usize {
        self.ladder(side).level_count()
    }

    /// Total resting quantity on one side.
    #[must_use]
    pub fn resting_quantity(&self, side: Side) -> u64 {
        self.ladder(side).total_quantity()
    }

    /// True when no order rests on either side.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }

    /// True when an order with `id` is resting on the book.
    #[must_use]
    pub fn contains(&self, id: OrderId) -> bool {
        self.order_index.contains(id)
    }

    /// Read-only copy of a resting order.
    #[must_use]
    pub fn get_order(&self, id: OrderId) -> Option<Order> {
        let location = self.order_index.get(id)?;
        let node = self
            .arena
            .get(location.node_key)
            .expect("order index points at dangling arena key");
        assert_eq!(
            node.id(),
            id,
            "order index and arena disagree about order {id}"
        );
        Some(node.order.clone())
    }

    /// Snapshot of up to `levels` best price levels per side.
    ///
    /// Built on request only; the book emits no event for it. The snapshot
    /// carries the sequence number of the last emitted event, so consumers
    /// can align it with a live event stream.
    #[must_use]
    pub fn depth(&self, levels: usize) -> DepthSnapshot {
        let collect = |ladder: &Ladder| {
            ladder
                .iterate_from_best(levels)
                .map(|level| DepthLevel {
                    price: level.price,
                    quantity: level.total_quantity(),
                    order_count: level.order_count(),
                })
                .collect()
        };
        DepthSnapshot {
            symbol: self.symbol.clone(),
            sequence: self.sequence,
            timestamp: current_time_millis(),
            bids: collect(&self.bids),
            asks: collect(&self.asks),
        }
    }

    #[inline]
    pub(super) fn ladder(&self, side: Side) -> &Ladder {
        match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        }
    }

    /// Rest `order` on its own side and register it in the index, emitting
    /// the `Add` book update. The order must have been admitted (stamped)
    /// and must still have remaining quantity.
    pub(super) fn rest_order(&mut self, order: Order) {
        debug_assert!(order.remaining() > 0);
        debug_assert!(order.admit_time > 0);
        let side = order.side;
        let price = order.limit_price;
        let id = order.id;
        trace!(
            "Book {}: resting order {} {} {} @ {}",
            self.symbol,
            id,
            side,
            order.remaining(),
            price
        );

        let key = self.arena.insert(OrderNode::new(order));
        let OrderBook {
            arena,
            bids,
            asks,
            order_index,
            ..
        } = self;
        let ladder = match side {
            Side::Buy => bids,
            Side::Sell => asks,
        };
        let level = ladder.get_or_create(price);
        level.enqueue(key, arena);
        let quantity = level.total_quantity();
        let order_count = level.order_count();

        let inserted = order_index.insert(
            id,
            OrderLocation {
                side,
                price,
                node_key: key,
            },
        );
        assert!(inserted, "order index already contains id {id}");

        self.emit_book_update(BookUpdateKind::Add, side, price, quantity, order_count);
    }

    /// Unlink the resting order `id` from its level, drop the level if it
    /// empties, free the arena slot and remove the index entry, emitting the
    /// `Remove` book update. Returns the removed order.
    pub(super) fn remove_resting(&mut self, id: OrderId) -> Result<Order, OrderBookError> {
        let location = self
            .order_index
            .remove(id)
            .ok_or(OrderBookError::OrderNotFound(id))?;

        let OrderBook {
            arena, bids, asks, ..
        } = self;
        let ladder = match location.side {
            Side::Buy => bids,
            Side::Sell => asks,
        };
        let level = ladder
            .get_mut(location.price)
            .expect("order index points at missing price level");
        level.remove(location.node_key, arena);
        let quantity = level.total_quantity();
        let order_count = level.order_count();
        if level.is_empty() {
            ladder.remove(location.price);
        }

        let node = arena.remove(location.node_key);
        assert_eq!(
            node.id(),
            id,
            "order index and arena disagree about order {id}"
        );
        trace!(
            "Book {}: removed order {} ({} left at {})",
            self.symbol,
            id,
            quantity,
            location.price
        );

        self.emit_book_update(
            BookUpdateKind::Remove,
            location.side,
            location.price,
            quantity,
            order_count,
        );
        Ok(node.order)
    }

    /// Emit one book update with the next sequence number.
    pub(super) fn emit_book_update(
        &mut self,
        kind: BookUpdateKind,
        side: Side,
        price: u128,
        quantity: u64,
        order_count: usize,
    ) {
        self.sequence += 1;
        self.publisher.publish(MarketEvent::BookUpdate(BookUpdate {
            sequence: self.sequence,
            symbol: self.symbol.clone(),
            kind,
            side,
            price,
            quantity,
            order_count,
        }));
    }

    /// Emit the top-of-book snapshot that closes a mutating operation.
    pub(super) fn publish_best_prices(&mut self, timestamp_logical: u64) {
        let bid = self.best_bid_with_size();
        let ask = self.best_ask_with_size();
        self.sequence += 1;
        self.publisher.publish(MarketEvent::BestPrices(BestPrices {
            sequence: self.sequence,
            symbol: self.symbol.clone(),
            best_bid: bid.map(|(price, _)| price),
            best_bid_size: bid.map(|(_, size)| size),
            best_ask: ask.map(|(price, _)| price),
            best_ask_size: ask.map(|(_, size)| size),
            timestamp_logical,
        }));
    }

    /// Verify every structural invariant: index and ladders agree, level
    /// aggregates match their queues, and the book is not crossed. Panics on
    /// the first violation. Test support only.
    #[cfg(test)]
    pub(super) fn assert_consistent(&self) {
        // index -> arena -> level
        for (id, location) in self.order_index.iter() {
            let node = self
                .arena
                .get(location.node_key)
                .expect("index points at dangling arena key");
            assert_eq!(node.id(), id, "index entry id mismatch");
            assert_eq!(node.order.side, location.side);
            assert_eq!(node.order.limit_price, location.price);
            assert!(
                self.ladder(location.side).get(location.price).is_some(),
                "index points at missing level"
            );
        }
        // ladders -> queues -> index, plus aggregate caches
        for side in [Side::Buy, Side::Sell] {
            for level in self.ladder(side).iter_best_first() {
                let mut walked_quantity = 0u64;
                let mut walked_count = 0usize;
                let mut cursor = level.peek_head();
                let mut last_admit = 0u64;
                while let Some(key) = cursor {
                    let node = self.arena.get(key).expect("queue key dangling");
                    assert!(
                        self.order_index.contains(node.id()),
                        "queued order missing from index"
                    );
                    assert!(
                        node.order.admit_time > last_admit,
                        "queue out of admission order"
                    );
                    last_admit = node.order.admit_time;
                    walked_quantity += node.remaining();
                    walked_count += 1;
                    cursor = node.next;
                }
                assert_eq!(level.total_quantity(), walked_quantity, "stale aggregate");
                assert_eq!(level.order_count(), walked_count, "stale order count");
                assert!(!level.is_empty(), "empty level left in ladder");
            }
        }
        // non-crossed book
        if let (Some(bid), Some(ask)) = (self.best_bid(), self.best_ask()) {
            assert!(bid < ask, "book is crossed: bid {bid} >= ask {ask}");
        }
        assert_eq!(
            self.order_index.len(),
            self.arena.len(),
            "index size and arena size disagree"
        );
    }
}

impl std::fmt::Debug for OrderBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderBook")
            .field("symbol", &self.symbol)
            .field("orders", &self.count_orders())
            .field("bid_levels", &self.bids.level_count())
            .field("ask_levels", &self.asks.level_count())
            .field("best_bid", &self.best_bid())
            .field("best_ask", &self.best_ask())
            .field("sequence", &self.sequence)
            .finish()
    }
}
