//! Order types: identity, side, kind, time-in-force and fill accounting.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique order identifier, assigned by the caller.
///
/// Identifiers must be unique across the lifetime of a book; submitting a
/// duplicate is rejected with `OrderBookError::DuplicateOrderId`.
pub type OrderId = u64;

/// The side of an order or book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Buy (bid) side
    Buy,
    /// Sell (ask) side
    Sell,
}

impl Side {
    /// Returns the opposite side.
    #[inline]
    #[must_use]
    pub fn opposite(&self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// The kind of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderKind {
    /// Execute at `limit_price` or better; may rest on the book.
    Limit,
    /// Execute at any available price; never rests.
    Market,
}

impl fmt::Display for OrderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderKind::Limit => write!(f, "LIMIT"),
            OrderKind::Market => write!(f, "MARKET"),
        }
    }
}

/// Time-in-force policy governing the residual quantity after matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeInForce {
    /// Good-till-cancelled: the residual rests on the book.
    Gtc,
    /// Immediate-or-cancel: the residual is discarded.
    Ioc,
    /// Fill-or-kill: the entire quantity fills immediately or nothing happens.
    Fok,
}

impl fmt::Display for TimeInForce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeInForce::Gtc => write!(f, "GTC"),
            TimeInForce::Ioc => write!(f, "IOC"),
            TimeInForce::Fok => write!(f, "FOK"),
        }
    }
}

/// A single order.
///
/// Prices are `u128` fixed-point values (the integrator chooses the scale)
/// and quantities are `u64` units. `limit_price` is ignored for market
/// orders. `admit_time` is a monotonic stamp assigned by the book at
/// admission. It is not a wall clock and is used only as the tie-breaker
/// between orders resting at the same price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Caller-assigned unique identifier
    pub id: OrderId,
    /// Buy or Sell
    pub side: Side,
    /// Limit or Market
    pub kind: OrderKind,
    /// Residual policy
    pub time_in_force: TimeInForce,
    /// Limit price; ignored for market orders
    pub limit_price: u128,
    /// Quantity at admission; immutable while the order is live
    pub original_quantity: u64,
    /// Quantity filled so far; monotonically non-decreasing
    pub filled_quantity: u64,
    /// Instrument symbol, passed through to collaborators verbatim
    pub symbol: String,
    /// Owning account, passed through to collaborators verbatim
    pub account: String,
    /// Logical admission stamp assigned by the book; zero before admission
    pub admit_time: u64,
}

impl Order {
    /// Create an order with every field spelled out except book-assigned state.
    pub fn new(
        id: OrderId,
        side: Side,
        kind: OrderKind,
        time_in_force: TimeInForce,
        limit_price: u128,
        quantity: u64,
    ) -> Self {
        Self {
            id,
            side,
            kind,
            time_in_force,
            limit_price,
            original_quantity: quantity,
            filled_quantity: 0,
            symbol: String::new(),
            account: String::new(),
            admit_time: 0,
        }
    }

    /// Create a limit order.
    ///
    /// # Examples
    /// ```
    /// use matchbook_rs::{Order, Side, TimeInForce};
    ///
    /// let order = Order::limit(1, Side::Buy, 10_000, 5, TimeInForce::Gtc);
    /// assert_eq!(order.remaining(), 5);
    /// ```
    pub fn limit(
        id: OrderId,
        side: Side,
        limit_price: u128,
        quantity: u64,
        time_in_force: TimeInForce,
    ) -> Self {
        Self::new(id, side, OrderKind::Limit, time_in_force, limit_price, quantity)
    }

    /// Create a market order.
    ///
    /// Market orders carry an implicit IOC policy: they cross the opposite
    /// side until filled or liquidity runs out, and never rest. Combine with
    /// [`Self::with_time_in_force`] and [`TimeInForce::Fok`] for an
    /// all-or-nothing market order.
    pub fn market(id: OrderId, side: Side, quantity: u64) -> Self {
        Self::new(id, side, OrderKind::Market, TimeInForce::Ioc, 0, quantity)
    }

    /// Override the time-in-force policy.
    #[must_use]
    pub fn with_time_in_force(mut self, time_in_force: TimeInForce) -> Self {
        self.time_in_force = time_in_force;
        self
    }

    /// Attach an instrument symbol.
    #[must_use]
    pub fn with_symbol(mut self, symbol: &str) -> Self {
        self.symbol = symbol.to_string();
        self
    }

    /// Attach an owning account.
    #[must_use]
    pub fn with_account(mut self, account: &str) -> Self {
        self.account = account.to_string();
        self
    }

    /// Quantity still open: `original_quantity - filled_quantity`.
    #[inline]
    #[must_use]
    pub fn remaining(&self) -> u64 {
        self.original_quantity - self.filled_quantity
    }

    /// True once the order is completely filled.
    #[inline]
    #[must_use]
    pub fn is_filled(&self) -> bool {
        self.filled_quantity >= self.original_quantity
    }

    /// True for market orders.
    #[inline]
    #[must_use]
    pub fn is_market(&self) -> bool {
        self.kind == OrderKind::Market
    }

    /// True for buy orders.
    #[inline]
    #[must_use]
    pub fn is_buy(&self) -> bool {
        self.side == Side::Buy
    }

    /// Record a fill of `quantity` units against this order.
    ///
    /// # Panics
    /// Panics if `quantity` exceeds the remaining quantity; the matching
    /// engine never produces such a fill, so this indicates book corruption.
    #[inline]
    pub(crate) fn fill(&mut self, quantity: u64) {
        assert!(
            quantity <= self.remaining(),
            "fill of {} exceeds remaining {} on order {}",
            quantity,
            self.remaining(),
            self.id
        );
        self.filled_quantity += quantity;
    }
}
