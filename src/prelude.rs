//! Prelude module that re-exports commonly used types and traits.
//!
//! Instead of importing each type individually, you can use:
//!
//! ```rust
//! use matchbook_rs::prelude::*;
//! ```
//!
//! This imports everything needed for day-to-day work with the order book.

// Core order book types
pub use crate::orderbook::OrderBook;
pub use crate::orderbook::OrderBookError;

// Order types and enums
pub use crate::orderbook::order::{Order, OrderId, OrderKind, Side, TimeInForce};

// Operation results
pub use crate::orderbook::operations::{CancelResult, ModifyResult, SubmitResult};

// Event types
pub use crate::orderbook::events::{BestPrices, BookUpdate, BookUpdateKind, MarketEvent, Trade};

// Publisher capability and stock implementations
pub use crate::orderbook::publisher::{
    ChannelPublisher, NullPublisher, Publisher, RecordingPublisher,
};

// Risk gate types
pub use crate::orderbook::risk::{AcceptAll, BookView, RiskDecision, RiskGate, StaticLimits};

// Snapshot types
pub use crate::orderbook::snapshot::{DepthLevel, DepthSnapshot, DepthSnapshotPackage};

// Utility functions
pub use crate::utils::current_time_millis;
