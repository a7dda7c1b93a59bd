//! Depth snapshots for market data distribution.
//!
//! A [`DepthSnapshot`] is produced on request by [`crate::OrderBook::depth`]
//! and is never event-driven. For transport it can be wrapped in a
//! [`DepthSnapshotPackage`], which carries a SHA-256 checksum over the
//! canonical JSON payload so consumers can detect corruption.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::trace;

use super::error::OrderBookError;

/// One aggregated price level in a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthLevel {
    /// Level price
    pub price: u128,
    /// Aggregate resting quantity at the level
    pub quantity: u64,
    /// Number of resting orders at the level
    pub order_count: usize,
}

/// Top-of-book depth at a point in time.
///
/// Levels are in priority order: `bids[0]` is the best bid, `asks[0]` the
/// best ask. `sequence` is the book's last emitted event sequence when the
/// snapshot was taken, for alignment with a live event stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepthSnapshot {
    /// The book's symbol
    pub symbol: String,
    /// Last emitted event sequence at snapshot time
    pub sequence: u64,
    /// Wall-clock snapshot time, milliseconds since the Unix epoch
    pub timestamp: u64,
    /// Bid levels, best (highest) first
    pub bids: Vec<DepthLevel>,
    /// Ask levels, best (lowest) first
    pub asks: Vec<DepthLevel>,
}

impl DepthSnapshot {
    /// The best bid level, if any.
    #[must_use]
    pub fn best_bid(&self) -> Option<DepthLevel> {
        self.bids.first().copied()
    }

    /// The best ask level, if any.
    #[must_use]
    pub fn best_ask(&self) -> Option<DepthLevel> {
        self.asks.first().copied()
    }

    /// Midpoint of the best bid and ask prices.
    #[must_use]
    pub fn mid_price(&self) -> Option<f64> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some((bid.price as f64 + ask.price as f64) / 2.0),
            _ => None,
        }
    }

    /// Best ask price minus best bid price.
    #[must_use]
    pub fn spread(&self) -> Option<u128> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some(ask.price.saturating_sub(bid.price)),
            _ => None,
        }
    }

    /// Total quantity across the included bid levels.
    #[must_use]
    pub fn total_bid_quantity(&self) -> u64 {
        self.bids.iter().map(|level| level.quantity).sum()
    }

    /// Total quantity across the included ask levels.
    #[must_use]
    pub fn total_ask_quantity(&self) -> u64 {
        self.asks.iter().map(|level| level.quantity).sum()
    }
}

/// A snapshot serialized for transport, with integrity protection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthSnapshotPackage {
    /// Canonical JSON encoding of the snapshot
    pub payload: String,
    /// Hex SHA-256 digest of `payload`
    pub checksum: String,
}

impl DepthSnapshotPackage {
    /// Serialize `snapshot` and stamp it with its checksum.
    ///
    /// # Errors
    /// [`OrderBookError::SerializationError`] if JSON encoding fails.
    pub fn pack(snapshot: &DepthSnapshot) -> Result<Self, OrderBookError> {
        let payload = serde_json::to_string(snapshot).map_err(|err| {
            OrderBookError::SerializationError {
                message: err.to_string(),
            }
        })?;
        let checksum = format!("{:x}", Sha256::digest(payload.as_bytes()));
        trace!("packed snapshot for {} ({})", snapshot.symbol, checksum);
        Ok(Self { payload, checksum })
    }

    /// Verify the payload against the stored checksum.
    ///
    /// # Errors
    /// [`OrderBookError::ChecksumMismatch`] when the payload was altered.
    pub fn verify(&self) -> Result<(), OrderBookError> {
        let actual = format!("{:x}", Sha256::digest(self.payload.as_bytes()));
        if actual != self.checksum {
            return Err(OrderBookError::ChecksumMismatch {
                expected: self.checksum.clone(),
                actual,
            });
        }
        Ok(())
    }

    /// Verify integrity and decode the snapshot.
    ///
    /// # Errors
    /// [`OrderBookError::ChecksumMismatch`] or
    /// [`OrderBookError::DeserializationError`].
    pub fn unpack(&self) -> Result<DepthSnapshot, OrderBookError> {
        self.verify()?;
        serde_json::from_str(&self.payload).map_err(|err| {
            OrderBookError::DeserializationError {
                message: err.to_string(),
            }
        })
    }
}
