//! Public order book operations: submit, cancel and modify.
//!
//! Every operation validates first and mutates second: a rejected call
//! leaves the book exactly as it found it and emits no event. The only
//! partial outcome is the deliberate partial fill of a non-FOK taker.

use serde::Serialize;
use tracing::{debug, trace, warn};

use super::book::OrderBook;
use super::error::OrderBookError;
use super::events::BookUpdateKind;
use super::order::{Order, OrderId, OrderKind, Side, TimeInForce};
use super::risk::{BookView, RiskDecision};

/// Outcome of an accepted [`OrderBook::submit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SubmitResult {
    /// The submitted order's id
    pub order_id: OrderId,
    /// Quantity filled immediately by this call
    pub filled_quantity: u64,
    /// Quantity left after matching: resting for GTC, discarded for
    /// IOC and market orders
    pub residual_quantity: u64,
    /// True when the residual was placed on the book
    pub resting: bool,
}

impl SubmitResult {
    /// True when the order filled completely.
    #[must_use]
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.residual_quantity == 0
    }
}

/// Outcome of a successful [`OrderBook::cancel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CancelResult {
    /// The cancelled order's id
    pub order_id: OrderId,
    /// Quantity that was still resting when the order was cancelled
    pub residual_quantity: u64,
}

/// Outcome of a successful [`OrderBook::modify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ModifyResult {
    /// Quantity reduced in place; queue position preserved
    Modified {
        /// The modified order's id
        order_id: OrderId,
        /// Remaining quantity after the modification
        remaining_quantity: u64,
    },
    /// Price change or quantity increase: the order was cancelled and
    /// resubmitted, losing queue position and possibly matching
    Replaced(SubmitResult),
}

impl OrderBook {
    /// Submit an order for matching and, for GTC residuals, resting.
    ///
    /// Validation runs in a fixed sequence, each step with its own error:
    /// quantity, price, risk gate, duplicate id, and the FOK liquidity test.
    /// On acceptance the order is stamped with a fresh admission time and
    /// swept against the opposite side; the residual then follows the
    /// time-in-force policy. Market orders never rest and never fail for
    /// lack of liquidity (their residual is discarded); FOK orders fill
    /// completely or leave the book untouched.
    ///
    /// # Errors
    /// [`OrderBookError::InvalidQuantity`], [`OrderBookError::InvalidPrice`],
    /// [`OrderBookError::RiskRejected`], [`OrderBookError::DuplicateOrderId`]
    /// or [`OrderBookError::InsufficientLiquidity`] (FOK only). No error
    /// mutates the book or emits an event.
    pub fn submit(&mut self, mut order: Order) -> Result<SubmitResult, OrderBookError> {
        debug!(
            "Book {}: submit order {} {} {} {} qty={} px={}",
            self.symbol,
            order.id,
            order.side,
            order.kind,
            order.time_in_force,
            order.original_quantity,
            order.limit_price
        );
        self.validate_quantity(order.id, order.original_quantity)?;
        if order.kind == OrderKind::Limit {
            self.validate_price(order.id, order.limit_price)?;
        }
        if let Some(gate) = self.risk_gate.clone() {
            if let RiskDecision::Reject(reason) = gate.validate(&order, &BookView::new(self)) {
                return Err(OrderBookError::RiskRejected {
                    order_id: order.id,
                    reason,
                });
            }
        }
        if self.contains(order.id) {
            return Err(OrderBookError::DuplicateOrderId(order.id));
        }
        if order.time_in_force == TimeInForce::Fok {
            let limit = match order.kind {
                OrderKind::Limit => Some(order.limit_price),
                OrderKind::Market => None,
            };
            let available =
                self.matchable_quantity(order.side, limit, order.original_quantity);
            if available < order.original_quantity {
                return Err(OrderBookError::InsufficientLiquidity {
                    side: order.side,
                    requested: order.original_quantity,
                    available,
                });
            }
        }

        self.admit_counter += 1;
        order.admit_time = self.admit_counter;
        order.filled_quantity = 0;

        let filled_quantity = self.match_incoming(&mut order);
        let residual_quantity = order.remaining();
        debug_assert!(
            order.time_in_force != TimeInForce::Fok || residual_quantity == 0,
            "FOK order {} passed the liquidity test but did not fill",
            order.id
        );

        let order_id = order.id;
        let admit_time = order.admit_time;
        let mut resting = false;
        if residual_quantity > 0 {
            match (order.kind, order.time_in_force) {
                (OrderKind::Limit, TimeInForce::Gtc) => {
                    self.rest_order(order);
                    resting = true;
                }
                (OrderKind::Market, _) => {
                    warn!(
                        "Book {}: market order {} discarding unfilled residual {}",
                        self.symbol, order_id, residual_quantity
                    );
                }
                _ => {
                    trace!(
                        "Book {}: order {} discarding residual {} ({})",
                        self.symbol, order_id, residual_quantity, order.time_in_force
                    );
                }
            }
        }

        if filled_quantity > 0 || resting {
            self.publish_best_prices(admit_time);
        }

        Ok(SubmitResult {
            order_id,
            filled_quantity,
            residual_quantity,
            resting,
        })
    }

    /// Submit a limit order without building an [`Order`] by hand.
    pub fn submit_limit_order(
        &mut self,
        id: OrderId,
        price: u128,
        quantity: u64,
        side: Side,
        time_in_force: TimeInForce,
    ) -> Result<SubmitResult, OrderBookError> {
        trace!(
            "Adding limit order {} {} {} {} {}",
            id, price, quantity, side, time_in_force
        );
        self.submit(Order::limit(id, side, price, quantity, time_in_force))
    }

    /// Submit a market order without building an [`Order`] by hand.
    pub fn submit_market_order(
        &mut self,
        id: OrderId,
        quantity: u64,
        side: Side,
    ) -> Result<SubmitResult, OrderBookError> {
        trace!("Submitting market order {} {} {}", id, quantity, side);
        self.submit(Order::market(id, side, quantity))
    }

    /// Cancel the resting order `id`, returning its residual quantity.
    ///
    /// Emits a `Remove` book update and a `BestPrices` snapshot. Cancelling
    /// an unknown id is non-mutating and emits nothing.
    ///
    /// # Errors
    /// [`OrderBookError::OrderNotFound`] when no such order rests.
    pub fn cancel(&mut self, id: OrderId) -> Result<CancelResult, OrderBookError> {
        debug!("Book {}: cancel order {}", self.symbol, id);
        let order = self.remove_resting(id)?;
        self.publish_best_prices(self.admit_counter);
        Ok(CancelResult {
            order_id: id,
            residual_quantity: order.remaining(),
        })
    }

    /// Change a resting order's price and/or total quantity.
    ///
    /// `new_quantity` is the order's new total quantity and must exceed its
    /// filled quantity. Queue position is preserved only when the price is
    /// unchanged and the implied residual does not grow; the order is then
    /// shrunk in place and a `Modify` book update is emitted. Any price
    /// change, and any quantity increase, is performed as
    /// cancel-then-resubmit: the order keeps its id, receives a fresh
    /// admission stamp, loses queue priority and may match immediately.
    ///
    /// # Errors
    /// [`OrderBookError::OrderNotFound`], [`OrderBookError::InvalidQuantity`]
    /// (zero, not above the filled quantity, or off-lot),
    /// [`OrderBookError::InvalidPrice`] (zero or off-tick) or
    /// [`OrderBookError::RiskRejected`] for the resubmitted order. No error
    /// mutates the book.
    pub fn modify(
        &mut self,
        id: OrderId,
        new_price: u128,
        new_quantity: u64,
    ) -> Result<ModifyResult, OrderBookError> {
        debug!(
            "Book {}: modify order {} px={} qty={}",
            self.symbol, id, new_price, new_quantity
        );
        let current = self
            .get_order(id)
            .ok_or(OrderBookError::OrderNotFound(id))?;

        self.validate_quantity(id, new_quantity)?;
        self.validate_price(id, new_price)?;
        if new_quantity <= current.filled_quantity {
            return Err(OrderBookError::InvalidQuantity {
                order_id: id,
                quantity: new_quantity,
            });
        }
        let new_remaining = new_quantity - current.filled_quantity;

        if new_price == current.limit_price && new_remaining <= current.remaining() {
            self.modify_in_place(&current, new_quantity, new_remaining);
            return Ok(ModifyResult::Modified {
                order_id: id,
                remaining_quantity: new_remaining,
            });
        }

        // Cancel-then-resubmit. The replacement is risk-checked before the
        // original is removed so a rejection leaves the book untouched.
        let replacement = Order::limit(id, current.side, new_price, new_remaining, current.time_in_force)
            .with_symbol(&current.symbol)
            .with_account(&current.account);
        if let Some(gate) = self.risk_gate.clone() {
            if let RiskDecision::Reject(reason) = gate.validate(&replacement, &BookView::new(self)) {
                return Err(OrderBookError::RiskRejected {
                    order_id: id,
                    reason,
                });
            }
        }

        let mut replacement = replacement;
        self.remove_resting(id)
            .expect("resting order vanished during modify");
        self.admit_counter += 1;
        replacement.admit_time = self.admit_counter;

        let filled_quantity = self.match_incoming(&mut replacement);
        let residual_quantity = replacement.remaining();
        let admit_time = replacement.admit_time;
        let mut resting = false;
        if residual_quantity > 0 {
            self.rest_order(replacement);
            resting = true;
        }
        self.publish_best_prices(admit_time);

        Ok(ModifyResult::Replaced(SubmitResult {
            order_id: id,
            filled_quantity,
            residual_quantity,
            resting,
        }))
    }

    /// Shrink a resting order without disturbing its queue position.
    fn modify_in_place(&mut self, current: &Order, new_quantity: u64, new_remaining: u64) {
        let location = self
            .order_index
            .get(current.id)
            .expect("resting order vanished during modify");
        let delta = current.remaining() - new_remaining;

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
        level.reduce(location.node_key, arena, delta);
        debug_assert_eq!(arena[location.node_key].order.original_quantity, new_quantity);
        let quantity = level.total_quantity();
        let order_count = level.order_count();

        trace!(
            "Book {}: modified order {} in place, remaining {} at {}",
            self.symbol, current.id, new_remaining, location.price
        );
        self.emit_book_update(
            BookUpdateKind::Modify,
            location.side,
            location.price,
            quantity,
            order_count,
        );
        self.publish_best_prices(self.admit_counter);
    }

    fn validate_quantity(&self, order_id: OrderId, quantity: u64) -> Result<(), OrderBookError> {
        if quantity == 0 {
            return Err(OrderBookError::InvalidQuantity { order_id, quantity });
        }
        if let Some(lot) = self.lot_size {
            if quantity % lot != 0 {
                return Err(OrderBookError::InvalidQuantity { order_id, quantity });
            }
        }
        Ok(())
    }

    fn validate_price(&self, order_id: OrderId, price: u128) -> Result<(), OrderBookError> {
        if price == 0 {
            return Err(OrderBookError::InvalidPrice { order_id, price });
        }
        if let Some(tick) = self.tick_size {
            if price % tick != 0 {
                return Err(OrderBookError::InvalidPrice { order_id, price });
            }
        }
        Ok(())
    }
}
