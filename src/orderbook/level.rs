//! Price level: the FIFO queue of resting orders at one price.
//!
//! The queue is a doubly-linked list threaded through the book's arena;
//! this struct holds only the head/tail keys and the aggregate caches.
//! Head is the oldest order and is matched first (time priority); new
//! orders are enqueued at the tail.

use slab::Slab;

use super::node::OrderNode;

/// All resting orders at a single price, in admission order.
///
/// `total_quantity` and `order_count` are maintained on every mutation so
/// depth queries never walk the queue.
#[derive(Debug, Clone)]
pub(super) struct PriceLevel {
    /// The level's price; immutable for the level's lifetime
    pub price: u128,
    total_quantity: u64,
    order_count: usize,
    head: Option<usize>,
    tail: Option<usize>,
}

impl PriceLevel {
    /// Create an empty level at `price`.
    pub fn new(price: u128) -> Self {
        Self {
            price,
            total_quantity: 0,
            order_count: 0,
            head: None,
            tail: None,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order_count == 0
    }

    /// Sum of `remaining` over every queued order.
    #[inline]
    pub fn total_quantity(&self) -> u64 {
        self.total_quantity
    }

    /// Number of queued orders.
    #[inline]
    pub fn order_count(&self) -> usize {
        self.order_count
    }

    /// Slab key of the oldest order, the next to be matched.
    #[inline]
    pub fn peek_head(&self) -> Option<usize> {
        self.head
    }

    /// Append the node at `key` to the tail of the queue.
    ///
    /// The node must already be in the arena and unlinked.
    pub fn enqueue(&mut self, key: usize, arena: &mut Slab<OrderNode>) {
        let node = arena.get_mut(key).expect("enqueue of dangling arena key");
        let quantity = node.remaining();
        debug_assert!(node.prev.is_none() && node.next.is_none());
        node.prev = self.tail;
        node.next = None;

        if let Some(tail_key) = self.tail {
            arena
                .get_mut(tail_key)
                .expect("level tail points at dangling arena key")
                .next = Some(key);
        } else {
            self.head = Some(key);
        }

        self.tail = Some(key);
        self.order_count += 1;
        self.total_quantity += quantity;
    }

    /// Unlink the node at `key` from the queue in O(1).
    ///
    /// Returns the node's remaining quantity. The node stays in the arena;
    /// freeing the slot is the caller's job.
    pub fn remove(&mut self, key: usize, arena: &mut Slab<OrderNode>) -> u64 {
        let node = arena.get(key).expect("remove of dangling arena key");
        let quantity = node.remaining();
        let prev_key = node.prev;
        let next_key = node.next;

        match prev_key {
            Some(prev) => {
                arena
                    .get_mut(prev)
                    .expect("queue prev points at dangling arena key")
                    .next = next_key;
            }
            None => self.head = next_key,
        }
        match next_key {
            Some(next) => {
                arena
                    .get_mut(next)
                    .expect("queue next points at dangling arena key")
                    .prev = prev_key;
            }
            None => self.tail = prev_key,
        }

        let node = arena.get_mut(key).expect("remove of dangling arena key");
        node.prev = None;
        node.next = None;

        self.order_count -= 1;
        self.total_quantity -= quantity;
        quantity
    }

    /// Shrink the order at `key` by `delta` units without touching its fill
    /// accounting. Used by in-place modify, where the order's total quantity
    /// is reduced while its queue position is preserved.
    ///
    /// `delta` must not exceed the node's remaining quantity.
    pub fn reduce(&mut self, key: usize, arena: &mut Slab<OrderNode>, delta: u64) {
        let node = arena.get_mut(key).expect("reduce of dangling arena key");
        assert!(
            delta <= node.remaining(),
            "reduce of {} exceeds remaining {} on order {}",
            delta,
            node.remaining(),
            node.id()
        );
        node.order.original_quantity -= delta;
        self.total_quantity -= delta;
    }

    /// Apply a partial (or final) fill of `quantity` to the node at `key`.
    ///
    /// `quantity` must not exceed the node's remaining quantity. The node is
    /// left in the queue even when it reaches zero; the matching engine
    /// removes it in the same step, together with its index entry.
    pub fn fill(&mut self, key: usize, arena: &mut Slab<OrderNode>, quantity: u64) {
        let node = arena.get_mut(key).expect("fill of dangling arena key");
        node.order.fill(quantity);
        self.total_quantity -= quantity;
    }
}
