//! Order book implementation: ladders, matching engine, events and the
//! public operation surface.

pub mod book;
pub mod error;
/// Market events and their sequencing contract.
pub mod events;
mod index;
mod ladder;
mod level;
pub mod matching;
mod node;
pub mod operations;
/// Order identity, sides, kinds and time-in-force policies.
pub mod order;
/// The publisher capability and its stock implementations.
pub mod publisher;
/// Pre-trade risk validation hook.
pub mod risk;
pub mod snapshot;
mod tests;

pub use book::OrderBook;
pub use error::OrderBookError;
pub use events::{BestPrices, BookUpdate, BookUpdateKind, MarketEvent, Trade};
pub use operations::{CancelResult, ModifyResult, SubmitResult};
pub use order::{Order, OrderId, OrderKind, Side, TimeInForce};
pub use publisher::{ChannelPublisher, NullPublisher, Publisher, RecordingPublisher};
pub use risk::{AcceptAll, BookView, RiskDecision, RiskGate, StaticLimits};
pub use snapshot::{DepthLevel, DepthSnapshot, DepthSnapshotPackage};
