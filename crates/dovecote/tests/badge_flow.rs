use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use dovecote::bus::Topic;
use dovecote::error::InboxError;
use dovecote::hub::{InboxConfig, InboxHub};
use dovecote::{
    ClientError, ClientResult, InboxEvent, Notification, NotificationClient, NotificationMessage,
    PageQuery, RealtimeParams, Timestamp,
};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    FetchPage,
    MarkViewed(Timestamp),
    FetchCount,
    StartCount,
    StopCount,
}

#[derive(Clone, Default)]
struct ScriptedClient {
    // Queue of page results to pop for each fetch_page call
    pages: Arc<Mutex<VecDeque<ClientResult<Vec<Notification>>>>>,
    // Queue of unviewed-count results
    counts: Arc<Mutex<VecDeque<ClientResult<u64>>>>,
    // Capture calls for assertions
    log: Arc<Mutex<Vec<Call>>>,
}

impl ScriptedClient {
    fn push_page(&self, page: ClientResult<Vec<Notification>>) {
        self.pages.lock().unwrap().push_back(page);
    }

    fn push_count(&self, count: ClientResult<u64>) {
        self.counts.lock().unwrap().push_back(count);
    }

    fn take_log(&self) -> Vec<Call> {
        let mut log = self.log.lock().unwrap();
        let out = log.clone();
        log.clear();
        out
    }

    fn record(&self, call: Call) {
        self.log.lock().unwrap().push(call);
    }
}

impl NotificationClient for ScriptedClient {
    async fn fetch_page(&self, _query: PageQuery) -> ClientResult<Vec<Notification>> {
        self.record(Call::FetchPage);
        self.pages.lock().unwrap().pop_front().expect("no queued page")
    }

    async fn mark_read(&self, _id: &str) -> ClientResult<()> {
        Ok(())
    }

    async fn mark_all_read_until(&self, _until: &Timestamp) -> ClientResult<()> {
        Ok(())
    }

    async fn delete_one(&self, _id: &str) -> ClientResult<()> {
        Ok(())
    }

    async fn delete_all_until(&self, _until: &Timestamp) -> ClientResult<()> {
        Ok(())
    }

    async fn mark_viewed_until(&self, until: &Timestamp) -> ClientResult<()> {
        self.record(Call::MarkViewed(until.clone()));
        Ok(())
    }

    async fn fetch_unviewed_count(&self) -> ClientResult<u64> {
        self.record(Call::FetchCount);
        self.counts.lock().unwrap().pop_front().expect("no queued count")
    }

    fn start_realtime_fetch(&self, _params: RealtimeParams) {}

    fn stop_realtime_fetch(&self) {}

    fn start_realtime_count(&self) {
        self.record(Call::StartCount);
    }

    fn stop_realtime_count(&self) {
        self.record(Call::StopCount);
    }
}

fn ts(s: &str) -> Timestamp {
    s.parse().expect("timestamp")
}

fn note(id: &str, created_at: &str) -> Notification {
    Notification::new()
        .id(id)
        .created_at(ts(created_at))
        .message(
            NotificationMessage::new()
                .header("Mara")
                .body("left a comment")
                .build(),
        )
        .build()
}

fn config() -> InboxConfig {
    InboxConfig::new()
        .user_token("app-token")
        .recipient_id("recipient-7")
        .build()
}

#[tokio::test]
async fn start_primes_the_count_once() {
    let client = ScriptedClient::default();
    client.push_count(Ok(5));

    let hub = InboxHub::new(client.clone(), config()).expect("hub");
    let badge = hub.badge();
    assert_eq!(badge.count(), 0, "unstarted badge holds zero");

    assert_eq!(badge.start().await.expect("start ok"), 5);
    assert_eq!(badge.count(), 5);

    // A second start reuses the held value; an empty count queue would
    // panic if the service were asked again
    assert_eq!(badge.start().await.expect("restart ok"), 5);
    assert_eq!(
        client.take_log(),
        [Call::StartCount, Call::FetchCount]
    );
}

#[tokio::test]
async fn count_events_reach_badges_whether_started_or_not() {
    let client = ScriptedClient::default();
    let hub = InboxHub::new(client, config()).expect("hub");
    let badge_a = hub.badge();
    let badge_b = hub.badge();

    hub.bus()
        .publish(Topic::Count, &InboxEvent::CountUpdated { count: 7 });

    assert_eq!(badge_a.count(), 7);
    assert_eq!(badge_b.count(), 7);
}

#[tokio::test]
async fn refresh_resets_every_mounted_badge() {
    let client = ScriptedClient::default();
    client.push_count(Ok(5));
    client.push_page(Ok(vec![note("n1", "2026-03-01T08:00:00Z")]));

    let hub = InboxHub::new(client.clone(), config()).expect("hub");
    let badge = hub.badge();
    badge.start().await.expect("start ok");
    assert_eq!(badge.count(), 5);

    // Opening the list views everything held, so the badge drops to zero
    let inbox = hub.inbox();
    inbox.refresh().await.expect("refresh ok");
    assert_eq!(badge.count(), 0);

    let log = client.take_log();
    assert!(log.contains(&Call::MarkViewed(ts("2026-03-01T08:00:00Z"))));
}

#[tokio::test]
async fn start_failure_surfaces_and_count_stays_put() {
    let client = ScriptedClient::default();
    client.push_count(Err(ClientError::Timeout));

    let hub = InboxHub::new(client.clone(), config()).expect("hub");
    let badge = hub.badge();

    let err = badge.start().await.expect_err("start fails");
    assert!(matches!(err, InboxError::Remote(_)));
    assert_eq!(badge.count(), 0);

    // The push subscription is already running; stop tears it down
    badge.stop();
    assert_eq!(
        client.take_log(),
        [Call::StartCount, Call::FetchCount, Call::StopCount]
    );
}

#[tokio::test]
async fn stop_forwards_only_after_a_start() {
    let client = ScriptedClient::default();
    let hub = InboxHub::new(client.clone(), config()).expect("hub");

    let badge = hub.badge();
    badge.stop();
    badge.stop();
    assert!(client.take_log().is_empty(), "unstarted stop is inert");

    client.push_count(Ok(2));
    badge.start().await.expect("start ok");
    badge.stop();
    badge.stop();
    assert_eq!(
        client.take_log(),
        [Call::StartCount, Call::FetchCount, Call::StopCount]
    );

    // Dropping a started badge also stops the subscription
    client.push_count(Ok(3));
    let second = hub.badge();
    second.start().await.expect("start ok");
    drop(second);
    assert_eq!(
        client.take_log(),
        [Call::StartCount, Call::FetchCount, Call::StopCount]
    );
}
