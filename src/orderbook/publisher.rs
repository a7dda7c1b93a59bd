//! Publisher capability for market events.
//!
//! The book is handed exactly one [`Publisher`] at construction and pushes
//! every event through it synchronously. Implementations must not block:
//! anything that needs I/O has to buffer and return. Within a process the
//! contract is lossless: a slow consumer may grow a queue but must never
//! back up the matching engine.

use std::sync::Arc;
use std::sync::Mutex;

use crossbeam::channel::{self, Receiver, Sender};

use super::events::MarketEvent;

/// Receives every event the book emits, in sequence order.
pub trait Publisher: Send + Sync {
    /// Accept one event. Must return promptly; never block.
    fn publish(&self, event: MarketEvent);
}

/// Discards every event. The default publisher for books that are queried
/// directly rather than observed.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPublisher;

impl Publisher for NullPublisher {
    fn publish(&self, _event: MarketEvent) {}
}

/// Buffers every event in memory. Intended for tests and simulations that
/// want to assert on the exact event stream.
#[derive(Debug, Default)]
pub struct RecordingPublisher {
    events: Mutex<Vec<MarketEvent>>,
}

impl RecordingPublisher {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Copy of everything published so far.
    #[must_use]
    pub fn events(&self) -> Vec<MarketEvent> {
        self.events.lock().expect("recording publisher poisoned").clone()
    }

    /// Drain and return everything published so far.
    #[must_use]
    pub fn take(&self) -> Vec<MarketEvent> {
        std::mem::take(&mut *self.events.lock().expect("recording publisher poisoned"))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.lock().expect("recording publisher poisoned").len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Publisher for RecordingPublisher {
    fn publish(&self, event: MarketEvent) {
        self.events
            .lock()
            .expect("recording publisher poisoned")
            .push(event);
    }
}

/// Forwards events into an unbounded crossbeam channel, decoupling the
/// matching engine from consumers. Memory is the only limit; if the channel
/// is disconnected the event is dropped (the book outliving all consumers
/// is not an error).
#[derive(Debug, Clone)]
pub struct ChannelPublisher {
    sender: Sender<MarketEvent>,
}

impl ChannelPublisher {
    /// Create a publisher and the receiving end of its channel.
    #[must_use]
    pub fn unbounded() -> (Self, Receiver<MarketEvent>) {
        let (sender, receiver) = channel::unbounded();
        (Self { sender }, receiver)
    }
}

impl Publisher for ChannelPublisher {
    fn publish(&self, event: MarketEvent) {
        let _ = self.sender.send(event);
    }
}
