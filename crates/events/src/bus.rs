//! Event publishing/subscription abstraction (mechanics only).
//!
//! The bus is **synchronous**: `publish` returns only after every listener has
//! seen the message, so anything that reacts to a change (typically a
//! re-render) observes post-mutation state before the triggering call returns.
//!
//! Two kinds of subscriber are supported:
//!
//! - **Callbacks** registered with [`EventBus::subscribe`], invoked in
//!   subscription order from inside `publish`.
//! - **Channels** created with [`EventBus::channel`], which buffer a clone of
//!   each message for the holder to drain at its own pace.

use std::sync::mpsc::{Receiver, TryRecvError};

/// Handle returned by [`EventBus::subscribe`], used to unsubscribe later.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) u64);

/// A buffered subscription to an event stream.
///
/// ```ignore
/// let subscription = bus.channel();
/// bus.publish(&message);
/// for message in subscription.drain() {
///     render(&message);
/// }
/// ```
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Try to receive a message without blocking.
    pub fn try_recv(&self) -> Result<M, TryRecvError> {
        self.receiver.try_recv()
    }

    /// Take every message buffered so far.
    pub fn drain(&self) -> Vec<M> {
        self.receiver.try_iter().collect()
    }
}

/// Domain-agnostic, single-threaded event bus.
pub trait EventBus<M> {
    /// Deliver `message` to every live subscriber before returning.
    fn publish(&mut self, message: &M);

    /// Register a callback invoked with every published message.
    fn subscribe(&mut self, listener: Box<dyn FnMut(&M)>) -> ListenerId;

    /// Remove a callback. Returns `false` if it was already gone.
    fn unsubscribe(&mut self, id: ListenerId) -> bool;

    /// Open a buffered subscription that receives a clone of each message.
    fn channel(&mut self) -> Subscription<M>
    where
        M: Clone + 'static;
}
