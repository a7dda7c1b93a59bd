//! One side of the book: price levels sorted by priority.
//!
//! Levels are kept in a `BTreeMap` keyed by price. The best level is the
//! highest key for bids and the lowest for asks, read in O(1) from the
//! tree's edge; arbitrary-price lookup is O(log L) over L distinct levels.
//! A level exists iff its queue is non-empty; callers drop a level in the
//! same step that empties it.

use std::collections::BTreeMap;

use super::level::PriceLevel;
use super::order::Side;

#[derive(Debug)]
pub(super) struct Ladder {
    side: Side,
    levels: BTreeMap<u128, PriceLevel>,
}

impl Ladder {
    pub fn new(side: Side) -> Self {
        Self {
            side,
            levels: BTreeMap::new(),
        }
    }

    #[inline]
    pub fn side(&self) -> Side {
        self.side
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Number of distinct price levels.
    #[inline]
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// The best price: highest bid or lowest ask.
    pub fn best_price(&self) -> Option<u128> {
        match self.side {
            Side::Buy => self.levels.last_key_value().map(|(price, _)| *price),
            Side::Sell => self.levels.first_key_value().map(|(price, _)| *price),
        }
    }

    /// The best level, if any.
    pub fn best(&self) -> Option<&PriceLevel> {
        match self.side {
            Side::Buy => self.levels.last_key_value().map(|(_, level)| level),
            Side::Sell => self.levels.first_key_value().map(|(_, level)| level),
        }
    }

    pub fn get(&self, price: u128) -> Option<&PriceLevel> {
        self.levels.get(&price)
    }

    pub fn get_mut(&mut self, price: u128) -> Option<&mut PriceLevel> {
        self.levels.get_mut(&price)
    }

    /// The level at `price`, created empty if absent.
    pub fn get_or_create(&mut self, price: u128) -> &mut PriceLevel {
        self.levels
            .entry(price)
            .or_insert_with(|| PriceLevel::new(price))
    }

    /// Drop the level at `price`.
    pub fn remove(&mut self, price: u128) -> Option<PriceLevel> {
        self.levels.remove(&price)
    }

    /// Levels in priority order, best first.
    pub fn iter_best_first(&self) -> Box<dyn Iterator<Item = &PriceLevel> + '_> {
        match self.side {
            Side::Buy => Box::new(self.levels.values().rev()),
            Side::Sell => Box::new(self.levels.values()),
        }
    }

    /// Up to `count` best levels in priority order.
    pub fn iterate_from_best(&self, count: usize) -> impl Iterator<Item = &PriceLevel> + '_ {
        self.iter_best_first().take(count)
    }

    /// Total resting quantity across every level.
    pub fn total_quantity(&self) -> u64 {
        self.levels
            .values()
            .map(PriceLevel::total_quantity)
            .fold(0u64, u64::saturating_add)
    }
}
