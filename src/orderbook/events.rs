//! Market events emitted by the book.
//!
//! Every event carries the book's symbol and a `sequence` number that is
//! strictly increasing, without gaps, across all events the book ever emits.
//! A downstream consumer that observes a missing sequence knows it lost an
//! event. `timestamp_logical` fields carry the book's admission counter at
//! the time of the triggering operation, a logical clock rather than wall time.

use serde::{Deserialize, Serialize};

use super::order::{OrderId, Side};

/// How a [`BookUpdate`] changed its price level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookUpdateKind {
    /// A new resting order was added at the level
    Add,
    /// A resting order at the level shrank (partial fill or in-place modify)
    Modify,
    /// A resting order left the level (full fill or cancel)
    Remove,
}

/// A fill between one taker and one maker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    /// Monotonic trade identifier, unique per book
    pub trade_id: u64,
    /// Book-wide event sequence number
    pub sequence: u64,
    /// The book's symbol
    pub symbol: String,
    /// Execution price; always the maker's price
    pub price: u128,
    /// Executed quantity
    pub quantity: u64,
    /// The buy-side order
    pub buy_order_id: OrderId,
    /// The sell-side order
    pub sell_order_id: OrderId,
    /// Which side was the incoming (aggressor) order
    pub aggressor_side: Side,
    /// Logical stamp of the triggering operation
    pub timestamp_logical: u64,
}

/// A change to one price level on one side.
///
/// `quantity` and `order_count` are the level's aggregates *after* the
/// mutation; both are zero when the mutation emptied the level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookUpdate {
    /// Book-wide event sequence number
    pub sequence: u64,
    /// The book's symbol
    pub symbol: String,
    /// What happened at the level
    pub kind: BookUpdateKind,
    /// Side of the affected level
    pub side: Side,
    /// Price of the affected level
    pub price: u128,
    /// Aggregate resting quantity at the level, post-mutation
    pub quantity: u64,
    /// Number of resting orders at the level, post-mutation
    pub order_count: usize,
}

/// Top-of-book snapshot, emitted at most once per public operation after
/// all of that operation's trade and book-update events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestPrices {
    /// Book-wide event sequence number
    pub sequence: u64,
    /// The book's symbol
    pub symbol: String,
    /// Best bid price, if the bid side is non-empty
    pub best_bid: Option<u128>,
    /// Aggregate quantity at the best bid
    pub best_bid_size: Option<u64>,
    /// Best ask price, if the ask side is non-empty
    pub best_ask: Option<u128>,
    /// Aggregate quantity at the best ask
    pub best_ask_size: Option<u64>,
    /// Logical stamp of the triggering operation
    pub timestamp_logical: u64,
}

/// Any event a book can emit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketEvent {
    /// A fill occurred
    Trade(Trade),
    /// A price level changed
    BookUpdate(BookUpdate),
    /// Top-of-book after an operation
    BestPrices(BestPrices),
}

impl MarketEvent {
    /// The event's book-wide sequence number.
    #[must_use]
    pub fn sequence(&self) -> u64 {
        match self {
            MarketEvent::Trade(trade) => trade.sequence,
            MarketEvent::BookUpdate(update) => update.sequence,
            MarketEvent::BestPrices(best) => best.sequence,
        }
    }

    /// The symbol the event belongs to.
    #[must_use]
    pub fn symbol(&self) -> &str {
        match self {
            MarketEvent::Trade(trade) => &trade.symbol,
            MarketEvent::BookUpdate(update) => &update.symbol,
            MarketEvent::BestPrices(best) => &best.symbol,
        }
    }
}
