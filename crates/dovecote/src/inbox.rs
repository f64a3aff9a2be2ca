//! Inbox list state and pagination
//!
//! [`Inbox`] owns one notification collection and drives it through the
//! fetch state machine: `Loading` on a reset fetch, `Loaded` while more
//! pages may exist, `EndReached` once the service returns an empty page,
//! `Errored` after a failed fetch. Mutations never edit the collection
//! directly. They call the service first and, only on success, publish an
//! [`InboxEvent`] on the hub's bus; the inbox applies the event through
//! its own subscription, the same path every other mounted component uses.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use dovecote_common::{
    InboxEvent, Notification, NotificationClient, PageQuery, PageWindow, RealtimeParams, Timestamp,
};
use smol_str::SmolStr;

use crate::bus::{EventBus, Subscription, Topic};
use crate::error::{ErrorHook, InboxError, InboxResult};
use crate::reconcile::{self, PageMerge};

/// Fetch lifecycle of a notification collection.
///
/// Exactly one variant holds at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListState {
    /// A reset fetch is outstanding and the collection is empty
    Loading,
    /// Items are held and more pages may exist
    Loaded,
    /// The service returned an empty page; pagination is exhausted
    EndReached,
    /// The last fetch failed
    Errored,
}

/// Point-in-time view of an inbox for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct InboxSnapshot {
    /// Collection contents, newest-first
    pub items: Vec<Notification>,
    /// Current fetch state
    pub state: ListState,
    /// Whether a load-more fetch is outstanding
    pub fetching_more: bool,
    /// Message of the most recent fetch failure, cleared on refresh
    pub last_error: Option<String>,
}

struct ListInner {
    items: Vec<Notification>,
    state: ListState,
    last_error: Option<String>,
}

/// Clears the in-flight flags when a fetch completes on any path.
struct FetchGuard {
    in_flight: Arc<AtomicBool>,
    fetching_more: Option<Arc<AtomicBool>>,
}

impl Drop for FetchGuard {
    fn drop(&mut self) {
        self.in_flight.store(false, Ordering::Release);
        if let Some(more) = &self.fetching_more {
            more.store(false, Ordering::Release);
        }
    }
}

/// One mounted notification list.
///
/// Instances are vended by [`InboxHub`](crate::hub::InboxHub) and own
/// their collection exclusively. Two inboxes from the same hub stay in
/// sync through bus events, never through shared state.
pub struct Inbox<C: NotificationClient> {
    client: Arc<C>,
    bus: EventBus,
    page_size: usize,
    recipient: SmolStr,
    state: Arc<Mutex<ListInner>>,
    live: Arc<AtomicBool>,
    in_flight: Arc<AtomicBool>,
    fetching_more: Arc<AtomicBool>,
    realtime: AtomicBool,
    on_error: Option<ErrorHook>,
    subscription: Mutex<Option<Subscription>>,
}

impl<C: NotificationClient> Inbox<C> {
    pub(crate) fn new(
        client: Arc<C>,
        bus: EventBus,
        page_size: usize,
        recipient: SmolStr,
        on_error: Option<ErrorHook>,
    ) -> Self {
        let state = Arc::new(Mutex::new(ListInner {
            items: Vec::new(),
            state: ListState::Loading,
            last_error: None,
        }));
        let live = Arc::new(AtomicBool::new(true));

        // The inbox edits its own collection the same way remote peers do:
        // by receiving the published event back through the bus.
        let handler_state = state.clone();
        let handler_live = live.clone();
        let subscription = bus.subscribe(Topic::Mutations, move |event| {
            if !handler_live.load(Ordering::Acquire) {
                return;
            }
            let mut inner = handler_state.lock().unwrap();
            reconcile::apply_event(&mut inner.items, event);
        });

        Self {
            client,
            bus,
            page_size,
            recipient,
            state,
            live,
            in_flight: Arc::new(AtomicBool::new(false)),
            fetching_more: Arc::new(AtomicBool::new(false)),
            realtime: AtomicBool::new(false),
            on_error,
            subscription: Mutex::new(Some(subscription)),
        }
    }

    /// Whether the inbox is still usable.
    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    /// Replaces the collection with a fresh first page.
    ///
    /// Enters `Loading` with an empty collection, fetches one page
    /// anchored at the current instant, then lands in `Loaded`,
    /// `EndReached` (empty page) or `Errored`. On a non-empty result the
    /// newest item's timestamp is marked viewed and every mounted badge is
    /// reset through the count topic.
    ///
    /// Returns `Ok` without fetching when another fetch is already
    /// outstanding. A result arriving after [`close`](Self::close) is
    /// discarded.
    pub async fn refresh(&self) -> InboxResult<()> {
        self.ensure_live()?;
        let Some(_guard) = self.begin_fetch(false) else {
            return Ok(());
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(size = self.page_size, "inbox refresh");

        {
            let mut inner = self.state.lock().unwrap();
            inner.items.clear();
            inner.state = ListState::Loading;
            inner.last_error = None;
        }

        let query = PageQuery::new()
            .size(self.page_size)
            .window(PageWindow::From(Timestamp::now()))
            .build();
        let fetched = self.client.fetch_page(query).await;

        if !self.is_live() {
            return Ok(());
        }

        let newest = match fetched {
            Ok(page) => {
                let mut inner = self.state.lock().unwrap();
                let inserted = reconcile::merge_page(&mut inner.items, page, PageMerge::Replace);
                inner.state = if inserted == 0 {
                    ListState::EndReached
                } else {
                    ListState::Loaded
                };
                inner.items.first().map(|n| n.created_at.clone())
            }
            Err(err) => return Err(self.fail_fetch(err)),
        };

        if let Some(newest) = newest {
            self.mark_viewed(&newest).await;
        }
        Ok(())
    }

    /// Fetches the next page when the presentation layer hits the bottom
    /// of the visible list.
    ///
    /// The signal is ignored unless the state is `Loaded`, the collection
    /// is non-empty and no fetch is outstanding. An empty page flips the
    /// state to `EndReached`; a failure flips it to `Errored` with the
    /// collection retained.
    pub async fn end_reached(&self) -> InboxResult<()> {
        self.ensure_live()?;

        let bound = {
            let inner = self.state.lock().unwrap();
            if inner.state == ListState::Loaded {
                reconcile::cursor(&inner.items).cloned()
            } else {
                None
            }
        };
        let Some(bound) = bound else {
            return Ok(());
        };
        let Some(_guard) = self.begin_fetch(true) else {
            return Ok(());
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(bound = %bound, "inbox load more");

        let query = PageQuery::new()
            .size(self.page_size)
            .window(PageWindow::Before(bound))
            .build();
        let fetched = self.client.fetch_page(query).await;

        if !self.is_live() {
            return Ok(());
        }

        match fetched {
            Ok(page) => {
                let mut inner = self.state.lock().unwrap();
                if page.is_empty() {
                    inner.state = ListState::EndReached;
                } else {
                    reconcile::merge_page(&mut inner.items, page, PageMerge::Append);
                    inner.state = ListState::Loaded;
                }
                Ok(())
            }
            Err(err) => Err(self.fail_fetch(err)),
        }
    }

    /// Explicit retry after a failed fetch. Behaves exactly like
    /// [`refresh`](Self::refresh); nothing ever retries automatically.
    pub async fn retry(&self) -> InboxResult<()> {
        self.refresh().await
    }

    /// Marks one notification read.
    pub async fn mark_read(&self, id: &str) -> InboxResult<()> {
        if id.trim().is_empty() {
            return Err(InboxError::MissingParameter("id"));
        }
        self.ensure_live()?;
        self.client.mark_read(id).await?;
        self.bus
            .publish(Topic::Mutations, &InboxEvent::ItemMarkedRead { id: id.into() });
        Ok(())
    }

    /// Marks every notification created at or before `until` read.
    pub async fn mark_all_read_until(&self, until: &Timestamp) -> InboxResult<()> {
        self.ensure_live()?;
        self.client.mark_all_read_until(until).await?;
        self.bus.publish(
            Topic::Mutations,
            &InboxEvent::AllMarkedRead {
                until: until.clone(),
            },
        );
        Ok(())
    }

    /// Deletes one notification.
    pub async fn delete(&self, id: &str) -> InboxResult<()> {
        if id.trim().is_empty() {
            return Err(InboxError::MissingParameter("id"));
        }
        self.ensure_live()?;
        self.client.delete_one(id).await?;
        self.bus
            .publish(Topic::Mutations, &InboxEvent::ItemDeleted { id: id.into() });
        Ok(())
    }

    /// Deletes every notification created at or before `until`.
    pub async fn delete_all_until(&self, until: &Timestamp) -> InboxResult<()> {
        self.ensure_live()?;
        self.client.delete_all_until(until).await?;
        self.bus.publish(
            Topic::Mutations,
            &InboxEvent::AllDeleted {
                until: until.clone(),
            },
        );
        Ok(())
    }

    /// Default card activation behavior: an unread card is marked read,
    /// a read card is left alone.
    pub async fn card_clicked(&self, notification: &Notification) -> InboxResult<()> {
        if notification.is_read {
            return Ok(());
        }
        self.mark_read(&notification.id).await
    }

    /// Returns a copy of the current collection and state.
    pub fn snapshot(&self) -> InboxSnapshot {
        let inner = self.state.lock().unwrap();
        InboxSnapshot {
            items: inner.items.clone(),
            state: inner.state,
            fetching_more: self.fetching_more.load(Ordering::Acquire),
            last_error: inner.last_error.clone(),
        }
    }

    /// Current fetch state.
    pub fn state(&self) -> ListState {
        self.state.lock().unwrap().state
    }

    /// Number of unread notifications currently held.
    pub fn unread(&self) -> usize {
        self.state
            .lock()
            .unwrap()
            .items
            .iter()
            .filter(|n| !n.is_read)
            .count()
    }

    /// Whether the collection holds no items.
    pub fn is_empty(&self) -> bool {
        self.state.lock().unwrap().items.is_empty()
    }

    /// Asks the service to push new notifications as they arrive.
    ///
    /// Idempotent; the first call forwards the request anchored at the
    /// newest held timestamp. Closed inboxes ignore the call.
    pub fn start_realtime(&self) {
        if !self.is_live() {
            return;
        }
        if self
            .realtime
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            let anchor = {
                let inner = self.state.lock().unwrap();
                inner.items.first().map(|n| n.created_at.clone())
            };
            let params = RealtimeParams::new()
                .size(self.page_size)
                .maybe_anchor(anchor)
                .recipient(self.recipient.clone())
                .build();
            self.client.start_realtime_fetch(params);
        }
    }

    /// Stops realtime delivery if this instance started it. Safe to call
    /// when realtime was never started, including from other instances.
    pub fn stop_realtime(&self) {
        if self
            .realtime
            .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            self.client.stop_realtime_fetch();
        }
    }

    /// Tears the inbox down: stops realtime delivery this instance
    /// started, drops the bus subscription, and rejects further
    /// operations with [`InboxError::NotInitialized`]. Idempotent; also
    /// runs on drop.
    pub fn close(&self) {
        if self.live.swap(false, Ordering::AcqRel) {
            #[cfg(feature = "tracing")]
            tracing::debug!("inbox closed");
            self.stop_realtime();
            self.subscription.lock().unwrap().take();
        }
    }

    fn ensure_live(&self) -> InboxResult<()> {
        if self.is_live() {
            Ok(())
        } else {
            Err(InboxError::NotInitialized)
        }
    }

    /// Claims the single fetch slot, or returns `None` when a fetch is
    /// already outstanding.
    fn begin_fetch(&self, load_more: bool) -> Option<FetchGuard> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        let fetching_more = load_more.then(|| {
            self.fetching_more.store(true, Ordering::Release);
            self.fetching_more.clone()
        });
        Some(FetchGuard {
            in_flight: self.in_flight.clone(),
            fetching_more,
        })
    }

    /// Records a fetch failure, informs the hook, and hands the error
    /// back for the caller.
    fn fail_fetch(&self, err: dovecote_common::ClientError) -> InboxError {
        let err = InboxError::Remote(err);
        {
            let mut inner = self.state.lock().unwrap();
            inner.state = ListState::Errored;
            inner.last_error = Some(err.to_string());
        }
        if let Some(hook) = &self.on_error {
            hook(&err);
        }
        err
    }

    /// Advances the viewed watermark and resets mounted badges. List
    /// state is already committed when this runs, so a failure only
    /// reaches the error hook.
    async fn mark_viewed(&self, newest: &Timestamp) {
        match self.client.mark_viewed_until(newest).await {
            Ok(()) => {
                self.bus
                    .publish(Topic::Count, &InboxEvent::CountUpdated { count: 0 });
            }
            Err(err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %err, "mark viewed failed");
                if let Some(hook) = &self.on_error {
                    hook(&InboxError::Remote(err));
                }
            }
        }
    }
}

impl<C: NotificationClient> Drop for Inbox<C> {
    fn drop(&mut self) {
        self.close();
    }
}
