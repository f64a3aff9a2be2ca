//! Synchronous publish/subscribe channel between inbox components
//!
//! Every mutation performed by one component reaches the others as an
//! [`InboxEvent`] on a shared [`EventBus`]. The bus is deliberately small:
//! two fixed topics, synchronous delivery in subscription order, no queue
//! and no replay. A subscriber that needs the event after `publish`
//! returns must have copied what it needs.
//!
//! The bus is a cheap-clone handle. Components receive their bus by
//! injection, so two independent inbox trees only see each other's events
//! when they were built from the same bus.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

use dovecote_common::InboxEvent;

/// Event channels carried by the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    /// Collection mutations: mark-read, delete, bulk variants
    Mutations,
    /// Unviewed-count changes
    Count,
}

impl Topic {
    fn index(self) -> usize {
        match self {
            Topic::Mutations => 0,
            Topic::Count => 1,
        }
    }
}

type Handler = Arc<dyn Fn(&InboxEvent) + Send + Sync>;

struct HandlerEntry {
    id: u64,
    handler: Handler,
}

#[derive(Default)]
struct BusInner {
    /// One handler list per topic, in subscription order
    topics: [Mutex<Vec<HandlerEntry>>; 2],
    next_id: AtomicU64,
}

/// Process-wide notification event channel.
///
/// Cloning yields another handle to the same channel.
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Arc<BusInner>,
}

impl EventBus {
    /// Creates a bus with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivers `event` to every handler currently subscribed on `topic`.
    ///
    /// Handlers run synchronously on the calling thread, in subscription
    /// order. The handler list is snapshotted before delivery, so a handler
    /// may subscribe, unsubscribe, or publish again without deadlocking;
    /// changes it makes take effect from the next publish onward.
    pub fn publish(&self, topic: Topic, event: &InboxEvent) {
        let snapshot: Vec<Handler> = {
            let entries = self.inner.topics[topic.index()].lock().unwrap();
            entries.iter().map(|e| e.handler.clone()).collect()
        };
        for handler in snapshot {
            handler(event);
        }
    }

    /// Registers `handler` on `topic`.
    ///
    /// Delivery continues until the returned [`Subscription`] is dropped.
    pub fn subscribe<F>(&self, topic: Topic, handler: F) -> Subscription
    where
        F: Fn(&InboxEvent) + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner.topics[topic.index()]
            .lock()
            .unwrap()
            .push(HandlerEntry {
                id,
                handler: Arc::new(handler),
            });
        Subscription {
            bus: Arc::downgrade(&self.inner),
            topic,
            id,
        }
    }

    #[cfg(test)]
    fn subscriber_count(&self, topic: Topic) -> usize {
        self.inner.topics[topic.index()].lock().unwrap().len()
    }
}

/// Registration handle returned by [`EventBus::subscribe`].
///
/// Dropping the handle removes the handler. A component that owns
/// subscriptions tears them down simply by dropping itself.
#[must_use = "dropping the subscription immediately stops delivery"]
pub struct Subscription {
    bus: Weak<BusInner>,
    topic: Topic,
    id: u64,
}

impl Subscription {
    /// Removes the handler now instead of at drop time.
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.bus.upgrade() {
            inner.topics[self.topic.index()]
                .lock()
                .unwrap()
                .retain(|e| e.id != self.id);
        }
    }
}
