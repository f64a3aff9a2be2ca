//! Unviewed-count tracking for badge displays
//!
//! The count lives independently of any notification collection. A badge
//! hears resets and service pushes through the count topic, and refreshes
//! itself from the service once when started.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use dovecote_common::{InboxEvent, NotificationClient};

use crate::bus::{EventBus, Subscription, Topic};
use crate::error::InboxResult;

/// One mounted unviewed-count display.
///
/// Vended by [`InboxHub`](crate::hub::InboxHub). The held value is
/// replaced by every `countUpdated` event on the hub's bus, whether or
/// not the badge was started.
pub struct BadgeCounter<C: NotificationClient> {
    client: Arc<C>,
    count: Arc<AtomicU64>,
    started: AtomicBool,
    _subscription: Subscription,
}

impl<C: NotificationClient> BadgeCounter<C> {
    pub(crate) fn new(client: Arc<C>, bus: &EventBus) -> Self {
        let count = Arc::new(AtomicU64::new(0));
        let handler_count = count.clone();
        let subscription = bus.subscribe(Topic::Count, move |event| {
            if let InboxEvent::CountUpdated { count } = event {
                handler_count.store(*count, Ordering::Release);
            }
        });
        Self {
            client,
            count,
            started: AtomicBool::new(false),
            _subscription: subscription,
        }
    }

    /// Current unviewed count.
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Acquire)
    }

    /// Starts the badge: fetches the current count once and asks the
    /// service to push future changes.
    ///
    /// Idempotent; repeated calls return the held value without another
    /// fetch. A failed fetch leaves the badge started and is handed back
    /// to the caller.
    pub async fn start(&self) -> InboxResult<u64> {
        if self
            .started
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Ok(self.count());
        }

        #[cfg(feature = "tracing")]
        tracing::debug!("badge started");

        self.client.start_realtime_count();
        let fresh = self.client.fetch_unviewed_count().await?;
        self.count.store(fresh, Ordering::Release);
        Ok(fresh)
    }

    /// Stops the push subscription if this badge started it. Safe to call
    /// when never started.
    pub fn stop(&self) {
        if self
            .started
            .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            self.client.stop_realtime_count();
        }
    }
}

impl<C: NotificationClient> Drop for BadgeCounter<C> {
    fn drop(&mut self) {
        self.stop();
    }
}
