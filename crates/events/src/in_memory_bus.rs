//! In-memory event bus.

use std::sync::mpsc;

use crate::bus::{EventBus, ListenerId, Subscription};

enum Listener<M> {
    Callback(Box<dyn FnMut(&M)>),
    Channel(mpsc::Sender<M>),
}

/// In-memory pub/sub bus.
///
/// - No IO / no async
/// - Delivery in subscription order
/// - Channel subscribers whose receiver was dropped are pruned on publish
pub struct InMemoryEventBus<M> {
    listeners: Vec<(ListenerId, Listener<M>)>,
    next_id: u64,
}

impl<M> InMemoryEventBus<M> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live subscribers (callbacks and channels).
    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }

    fn next_listener_id(&mut self) -> ListenerId {
        self.next_id += 1;
        ListenerId(self.next_id)
    }
}

impl<M> Default for InMemoryEventBus<M> {
    fn default() -> Self {
        Self {
            listeners: Vec::new(),
            next_id: 0,
        }
    }
}

impl<M> core::fmt::Debug for InMemoryEventBus<M> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("InMemoryEventBus")
            .field("subscribers", &self.listeners.len())
            .finish()
    }
}

impl<M: Clone> EventBus<M> for InMemoryEventBus<M> {
    fn publish(&mut self, message: &M) {
        self.listeners.retain_mut(|(_, listener)| match listener {
            Listener::Callback(callback) => {
                callback(message);
                true
            }
            Listener::Channel(tx) => tx.send(message.clone()).is_ok(),
        });
    }

    fn subscribe(&mut self, listener: Box<dyn FnMut(&M)>) -> ListenerId {
        let id = self.next_listener_id();
        self.listeners.push((id, Listener::Callback(listener)));
        id
    }

    fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        let removed = self.listeners.len() != before;
        if !removed {
            tracing::debug!(listener = id.0, "unsubscribe for unknown listener");
        }
        removed
    }

    fn channel(&mut self) -> Subscription<M>
    where
        M: Clone + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let id = self.next_listener_id();
        self.listeners.push((id, Listener::Channel(tx)));
        Subscription::new(rx)
    }
}
