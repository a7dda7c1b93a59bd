//! # Single-Symbol Limit Order Book and Matching Engine
//!
//! An in-memory limit order book with a continuous matching engine, designed
//! as the execution kernel of a trading venue. One book trades one symbol;
//! it accepts new orders, modifications and cancellations, matches crossing
//! orders under strict price-time priority, and produces a gap-detectable
//! stream of trade and book-update events.
//!
//! ## Key Features
//!
//! - **Price-time priority matching**: best price first, oldest order first
//!   at a price; the resting (maker) order always sets the trade price.
//! - **Three time-in-force policies**: GTC residuals rest on the book, IOC
//!   residuals are discarded, and FOK orders fill completely or leave the
//!   book bit-identical to its pre-call state. Market orders are implicit
//!   IOC and never rest.
//! - **O(1) hot paths**: best bid/ask reads, cancels and in-place modifies
//!   are constant time. Orders live in a slab arena; price levels thread
//!   doubly-linked FIFO queues through it and an id index maps straight to
//!   the arena slot, so removing one order never disturbs its neighbours'
//!   queue positions.
//! - **Sequenced event stream**: every `Trade`, `BookUpdate` and
//!   `BestPrices` event carries a strictly increasing, gap-free sequence
//!   number, delivered synchronously through a single [`Publisher`]
//!   capability.
//! - **Pre-trade risk hook**: a [`RiskGate`] is consulted before every
//!   admission through a read-only book view; its rejections surface
//!   verbatim to the caller.
//!
//! ## Design Notes
//!
//! The book is single-threaded by contract: exactly one executor mutates a
//! book, every public operation completes synchronously, and no operation
//! suspends. Parallelism is obtained a layer up by sharding across symbols,
//! one book per symbol. This keeps the book's invariants (no crossed book, conserved
//! quantity, queue-position stability under unrelated mutation) directly
//! checkable, and removes any need for locks in the core.
//!
//! Validation always runs before mutation: a rejected operation leaves the
//! book untouched and emits no event. The only partial outcome is the
//! deliberate partial fill of a non-FOK taker.
//!
//! ## Example
//!
//! ```
//! use matchbook_rs::{Order, OrderBook, RecordingPublisher, Side, TimeInForce};
//!
//! let publisher = RecordingPublisher::new();
//! let mut book = OrderBook::with_publisher("BTC/USD", publisher.clone());
//!
//! // A resting bid and an aggressive sell that crosses it.
//! book.submit(Order::limit(1, Side::Buy, 10_000, 10, TimeInForce::Gtc)).unwrap();
//! let result = book
//!     .submit(Order::limit(2, Side::Sell, 10_000, 4, TimeInForce::Ioc))
//!     .unwrap();
//!
//! assert_eq!(result.filled_quantity, 4);
//! assert_eq!(book.best_bid_with_size(), Some((10_000, 6)));
//!
//! // The trade was published with the maker's price.
//! let events = publisher.take();
//! assert!(events.iter().any(|event| matches!(
//!     event,
//!     matchbook_rs::MarketEvent::Trade(trade) if trade.price == 10_000 && trade.quantity == 4
//! )));
//! ```

pub mod orderbook;

pub mod prelude;
mod utils;

pub use orderbook::{
    AcceptAll, BestPrices, BookUpdate, BookUpdateKind, BookView, CancelResult, ChannelPublisher,
    DepthLevel, DepthSnapshot, DepthSnapshotPackage, MarketEvent, ModifyResult, NullPublisher,
    Order, OrderBook, OrderBookError, OrderId, OrderKind, Publisher, RecordingPublisher,
    RiskDecision, RiskGate, Side, StaticLimits, SubmitResult, TimeInForce, Trade,
};
pub use utils::current_time_millis;
