//! In-memory notification service
//!
//! Backs the full [`NotificationClient`] surface with a plain `Vec`, for
//! demos and for consumer tests that need a working service without a
//! network. Cloning a [`MemoryClient`] yields a handle to the same
//! underlying store, so a test can seed items while the engine under test
//! holds its own handle.

use std::sync::{Arc, RwLock};

use crate::client::{NotificationClient, PageQuery, PageWindow, RealtimeParams};
use crate::error::{ClientError, ClientResult};
use crate::types::datetime::Timestamp;
use crate::types::notification::Notification;

/// In-memory notification store suitable for demos and tests.
#[derive(Clone, Default)]
pub struct MemoryClient {
    inner: Arc<RwLock<MemoryState>>,
}

#[derive(Default)]
struct MemoryState {
    /// Held newest-first at all times
    items: Vec<Notification>,
    /// Items at or before this instant have been viewed
    viewed_until: Option<Timestamp>,
}

impl MemoryClient {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `items`.
    pub fn seeded(items: impl IntoIterator<Item = Notification>) -> Self {
        let client = Self::new();
        client.seed(items);
        client
    }

    /// Adds `items` to the store, keeping newest-first order.
    pub fn seed(&self, items: impl IntoIterator<Item = Notification>) {
        let mut state = self.inner.write().unwrap();
        state.items.extend(items);
        state.items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    }

    /// Adds a single notification.
    pub fn push(&self, item: Notification) {
        self.seed([item]);
    }

    /// Number of notifications currently held.
    pub fn len(&self) -> usize {
        self.inner.read().unwrap().items.len()
    }

    /// Whether the store holds no notifications.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl NotificationClient for MemoryClient {
    async fn fetch_page(&self, query: PageQuery) -> ClientResult<Vec<Notification>> {
        let state = self.inner.read().unwrap();
        let page = state
            .items
            .iter()
            .filter(|n| match &query.window {
                PageWindow::From(anchor) => n.created_at <= *anchor,
                PageWindow::Before(bound) => n.created_at < *bound,
            })
            .take(query.size)
            .cloned()
            .collect();
        Ok(page)
    }

    async fn mark_read(&self, id: &str) -> ClientResult<()> {
        let mut state = self.inner.write().unwrap();
        match state.items.iter_mut().find(|n| n.id == id) {
            Some(item) => {
                item.is_read = true;
                Ok(())
            }
            None => Err(ClientError::service(
                "NOT_FOUND",
                format!("no notification with id {id}"),
            )),
        }
    }

    async fn mark_all_read_until(&self, until: &Timestamp) -> ClientResult<()> {
        let mut state = self.inner.write().unwrap();
        for item in state.items.iter_mut().filter(|n| n.created_at <= *until) {
            item.is_read = true;
        }
        Ok(())
    }

    async fn delete_one(&self, id: &str) -> ClientResult<()> {
        let mut state = self.inner.write().unwrap();
        let before = state.items.len();
        state.items.retain(|n| n.id != id);
        if state.items.len() == before {
            return Err(ClientError::service(
                "NOT_FOUND",
                format!("no notification with id {id}"),
            ));
        }
        Ok(())
    }

    async fn delete_all_until(&self, until: &Timestamp) -> ClientResult<()> {
        let mut state = self.inner.write().unwrap();
        state.items.retain(|n| n.created_at > *until);
        Ok(())
    }

    async fn mark_viewed_until(&self, until: &Timestamp) -> ClientResult<()> {
        let mut state = self.inner.write().unwrap();
        // The watermark only ever moves forward.
        let advanced = match &state.viewed_until {
            Some(current) => until > current,
            None => true,
        };
        if advanced {
            state.viewed_until = Some(until.clone());
        }
        Ok(())
    }

    async fn fetch_unviewed_count(&self) -> ClientResult<u64> {
        let state = self.inner.read().unwrap();
        let count = match &state.viewed_until {
            Some(watermark) => state
                .items
                .iter()
                .filter(|n| n.created_at > *watermark)
                .count(),
            None => state.items.len(),
        };
        Ok(count as u64)
    }

    fn start_realtime_fetch(&self, _params: RealtimeParams) {}

    fn stop_realtime_fetch(&self) {}

    fn start_realtime_count(&self) {}

    fn stop_realtime_count(&self) {}
}
