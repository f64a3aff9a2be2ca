//! Facade trait over the remote notification service
//!
//! The state engine never speaks a wire protocol itself. Everything it
//! needs from the service is expressed through [`NotificationClient`], so
//! a deployment can back it with HTTP, a message queue, or an in-memory
//! stand-in without touching the engine.

use std::future::Future;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::error::ClientResult;
use crate::types::datetime::Timestamp;
use crate::types::notification::Notification;

/// Window bound for a page fetch.
///
/// A fetch is anchored either at the top of the inbox or below the items
/// already held, never both. The service sees the bound as `start` or
/// `end` respectively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageWindow {
    /// Initial or refresh fetch: items created at or before this anchor
    #[serde(rename = "start")]
    From(Timestamp),

    /// Load-more fetch: items created strictly before this bound
    #[serde(rename = "end")]
    Before(Timestamp),
}

/// Parameters for a single page fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bon::Builder)]
#[serde(rename_all = "camelCase")]
#[builder(start_fn = new)]
pub struct PageQuery {
    /// Maximum number of items to return
    pub size: usize,

    /// Window bound, serialized as `start` or `end`
    #[serde(flatten)]
    pub window: PageWindow,
}

/// Parameters accepted by [`NotificationClient::start_realtime_fetch`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bon::Builder)]
#[serde(rename_all = "camelCase")]
#[builder(start_fn = new)]
pub struct RealtimeParams {
    /// Page size the background fetcher should use
    pub size: usize,

    /// Timestamp to resume from, if the caller already holds items
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor: Option<Timestamp>,

    /// Recipient the subscription is scoped to
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub recipient: Option<SmolStr>,
}

/// Operations the notification service must provide.
///
/// All fallible operations return [`ClientResult`]; the engine treats any
/// `Err` as an opaque remote failure. The realtime controls are
/// fire-and-forget and must be safe to call repeatedly in any order.
#[trait_variant::make(Send)]
pub trait NotificationClient {
    /// Fetch one page of notifications, newest-first within the window.
    fn fetch_page(&self, query: PageQuery)
    -> impl Future<Output = ClientResult<Vec<Notification>>>;

    /// Mark a single notification read.
    fn mark_read(&self, id: &str) -> impl Future<Output = ClientResult<()>>;

    /// Mark every notification created at or before `until` read.
    fn mark_all_read_until(&self, until: &Timestamp) -> impl Future<Output = ClientResult<()>>;

    /// Delete a single notification.
    fn delete_one(&self, id: &str) -> impl Future<Output = ClientResult<()>>;

    /// Delete every notification created at or before `until`.
    fn delete_all_until(&self, until: &Timestamp) -> impl Future<Output = ClientResult<()>>;

    /// Advance the viewed watermark to `until`.
    ///
    /// Items created after the watermark count as unviewed.
    fn mark_viewed_until(&self, until: &Timestamp) -> impl Future<Output = ClientResult<()>>;

    /// Fetch the current unviewed count.
    fn fetch_unviewed_count(&self) -> impl Future<Output = ClientResult<u64>>;

    /// Start background delivery of new notifications.
    fn start_realtime_fetch(&self, params: RealtimeParams);

    /// Stop background delivery of new notifications.
    fn stop_realtime_fetch(&self);

    /// Start background delivery of count updates.
    fn start_realtime_count(&self);

    /// Stop background delivery of count updates.
    fn stop_realtime_count(&self);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn page_query_serializes_single_bound() {
        let anchor = Timestamp::from_str("2024-03-01T09:30:00Z").unwrap();
        let query = PageQuery::new().size(15).window(PageWindow::From(anchor)).build();
        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(json["size"], 15);
        assert_eq!(json["start"], "2024-03-01T09:30:00Z");
        assert!(json.get("end").is_none());

        let bound = Timestamp::from_str("2024-02-20T00:00:00Z").unwrap();
        let query = PageQuery::new().size(15).window(PageWindow::Before(bound)).build();
        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(json["end"], "2024-02-20T00:00:00Z");
        assert!(json.get("start").is_none());
    }

    #[test]
    fn realtime_params_omit_absent_fields() {
        let params = RealtimeParams::new().size(15).build();
        let json = serde_json::to_string(&params).unwrap();
        assert_eq!(json, r#"{"size":15}"#);
    }
}
