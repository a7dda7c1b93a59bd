//! Order book error types

use std::fmt;

use super::order::{OrderId, Side};

/// Errors surfaced by the public order book operations.
///
/// Every variant is recoverable: the book is left exactly as it was before
/// the failing call. Internal invariant violations are not represented here;
/// those are programmer errors and panic instead of being reported.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum OrderBookError {
    /// Order quantity is zero, below the filled quantity on modify, or not
    /// a multiple of the configured lot size
    InvalidQuantity {
        /// The offending order
        order_id: OrderId,
        /// The rejected quantity
        quantity: u64,
    },

    /// Limit price is zero or not a multiple of the configured tick size
    InvalidPrice {
        /// The offending order
        order_id: OrderId,
        /// The rejected price
        price: u128,
    },

    /// An order with this id is already resting on the book
    DuplicateOrderId(OrderId),

    /// No resting order with this id
    OrderNotFound(OrderId),

    /// The risk gate refused the order; the reason is surfaced verbatim
    RiskRejected {
        /// The rejected order
        order_id: OrderId,
        /// Reason reported by the risk gate
        reason: String,
    },

    /// A fill-or-kill order could not be fully satisfied
    InsufficientLiquidity {
        /// Side of the rejected taker
        side: Side,
        /// Quantity the taker asked for
        requested: u64,
        /// Matchable quantity found at eligible prices
        available: u64,
    },

    /// Error while serializing snapshot data
    SerializationError {
        /// Underlying error message
        message: String,
    },

    /// Error while deserializing snapshot data
    DeserializationError {
        /// Underlying error message
        message: String,
    },

    /// Snapshot integrity check failed
    ChecksumMismatch {
        /// Expected checksum value
        expected: String,
        /// Actual checksum value
        actual: String,
    },
}

impl fmt::Display for OrderBookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderBookError::InvalidQuantity { order_id, quantity } => {
                write!(f, "invalid quantity {quantity} for order {order_id}")
            }
            OrderBookError::InvalidPrice { order_id, price } => {
                write!(f, "invalid price {price} for order {order_id}")
            }
            OrderBookError::DuplicateOrderId(id) => {
                write!(f, "duplicate order id: {id}")
            }
            OrderBookError::OrderNotFound(id) => {
                write!(f, "order not found: {id}")
            }
            OrderBookError::RiskRejected { order_id, reason } => {
                write!(f, "order {order_id} rejected by risk gate: {reason}")
            }
            OrderBookError::InsufficientLiquidity {
                side,
                requested,
                available,
            } => {
                write!(
                    f,
                    "insufficient liquidity for {side} order: requested {requested}, available {available}"
                )
            }
            OrderBookError::SerializationError { message } => {
                write!(f, "serialization error: {message}")
            }
            OrderBookError::DeserializationError { message } => {
                write!(f, "deserialization error: {message}")
            }
            OrderBookError::ChecksumMismatch { expected, actual } => {
                write!(
                    f,
                    "checksum mismatch: expected {expected}, but computed {actual}"
                )
            }
        }
    }
}

impl std::error::Error for OrderBookError {}
