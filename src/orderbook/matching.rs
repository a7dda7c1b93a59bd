//! The taker loop: sweeping the opposite ladder under price-time priority.
//!
//! An incoming order consumes the opposite side best level first and, at a
//! level, oldest order first. The maker always sets the trade price. Each
//! fill emits one `Trade` followed by one `BookUpdate` describing the
//! resting side; a fully filled maker leaves the book, its level and the
//! index in the same step that produced the final fill.

use tracing::trace;

use super::book::OrderBook;
use super::events::{BookUpdate, BookUpdateKind, MarketEvent, Trade};
use super::order::{Order, OrderKind, Side};

impl OrderBook {
    /// Sweep the opposite ladder with `taker` until it is filled or no
    /// eligible level remains. Returns the quantity filled by this call.
    ///
    /// The taker's fill accounting is updated in place; the caller decides
    /// what to do with any residual (rest it, discard it). Every fill emits
    /// its `Trade` and `BookUpdate` pair; no `BestPrices` is emitted here.
    pub(super) fn match_incoming(&mut self, taker: &mut Order) -> u64 {
        let start_remaining = taker.remaining();
        let OrderBook {
            symbol,
            arena,
            bids,
            asks,
            order_index,
            sequence,
            next_trade_id,
            last_trade_price,
            publisher,
            ..
        } = self;
        let opposite = match taker.side {
            Side::Buy => asks,
            Side::Sell => bids,
        };

        while taker.remaining() > 0 {
            let Some(best_price) = opposite.best_price() else {
                break;
            };
            let crosses = match taker.kind {
                OrderKind::Market => true,
                OrderKind::Limit => match taker.side {
                    Side::Buy => best_price <= taker.limit_price,
                    Side::Sell => best_price >= taker.limit_price,
                },
            };
            if !crosses {
                break;
            }

            let level = opposite
                .get_mut(best_price)
                .expect("best price has a level");
            let head_key = level.peek_head().expect("non-empty level has a head");
            let (maker_id, maker_remaining) = {
                let node = arena.get(head_key).expect("level head dangling");
                (node.id(), node.remaining())
            };
            let trade_quantity = taker.remaining().min(maker_remaining);

            taker.fill(trade_quantity);
            level.fill(head_key, arena, trade_quantity);

            let maker_done = trade_quantity == maker_remaining;
            if maker_done {
                level.remove(head_key, arena);
                assert!(
                    order_index.remove(maker_id).is_some(),
                    "filled maker {maker_id} missing from order index"
                );
                arena.remove(head_key);
            }
            let quantity_after = level.total_quantity();
            let count_after = level.order_count();
            let level_emptied = level.is_empty();
            if level_emptied {
                opposite.remove(best_price);
            }

            *next_trade_id += 1;
            *sequence += 1;
            let (buy_order_id, sell_order_id) = match taker.side {
                Side::Buy => (taker.id, maker_id),
                Side::Sell => (maker_id, taker.id),
            };
            trace!(
                "Book {}: trade {} {} @ {} taker={} maker={}",
                symbol, *next_trade_id, trade_quantity, best_price, taker.id, maker_id
            );
            publisher.publish(MarketEvent::Trade(Trade {
                trade_id: *next_trade_id,
                sequence: *sequence,
                symbol: symbol.clone(),
                price: best_price,
                quantity: trade_quantity,
                buy_order_id,
                sell_order_id,
                aggressor_side: taker.side,
                timestamp_logical: taker.admit_time,
            }));
            *last_trade_price = Some(best_price);

            *sequence += 1;
            publisher.publish(MarketEvent::BookUpdate(BookUpdate {
                sequence: *sequence,
                symbol: symbol.clone(),
                kind: if maker_done {
                    BookUpdateKind::Remove
                } else {
                    BookUpdateKind::Modify
                },
                side: taker.side.opposite(),
                price: best_price,
                quantity: quantity_after,
                order_count: count_after,
            }));
        }

        start_remaining - taker.remaining()
    }

    /// Cumulative quantity a taker on `side` could match right now, walking
    /// the opposite ladder best-first and stopping at `limit_price` (when
    /// given) or once `target` is reached.
    ///
    /// This is the fill-or-kill liquidity test: it inspects without
    /// mutating, so a rejected FOK leaves the book untouched.
    pub(super) fn matchable_quantity(
        &self,
        side: Side,
        limit_price: Option<u128>,
        target: u64,
    ) -> u64 {
        let opposite = self.ladder(side.opposite());
        let mut available = 0u64;
        for level in opposite.iter_best_first() {
            if let Some(limit) = limit_price {
                match side {
                    Side::Buy if level.price > limit => break,
                    Side::Sell if level.price < limit => break,
                    _ => {}
                }
            }
            available = available.saturating_add(level.total_quantity());
            if available >= target {
                break;
            }
        }
        available
    }
}
