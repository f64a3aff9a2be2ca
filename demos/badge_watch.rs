use dovecote::hub::{InboxConfig, InboxHub};
use dovecote::{InboxEvent, MemoryClient, Notification, NotificationMessage, Timestamp};

fn ts(s: &str) -> Timestamp {
    s.parse().expect("valid timestamp")
}

fn note(id: &str, header: &str, body: &str, created_at: &str) -> Notification {
    Notification::new()
        .id(id)
        .created_at(ts(created_at))
        .message(NotificationMessage::new().header(header).body(body).build())
        .build()
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    let service = MemoryClient::seeded([
        note("n3", "Priya Sharma", "approved your proposal", "2026-03-07T18:45:00Z"),
        note("n2", "Build bot", "nightly pipeline finished", "2026-03-07T12:10:00Z"),
        note("n1", "Mara Lindqvist", "shared a screenshot", "2026-03-06T21:30:00Z"),
    ]);

    let hub = InboxHub::new(
        service.clone(),
        InboxConfig::new()
            .user_token("demo-token")
            .recipient_id("demo-user")
            .build(),
    )?;

    // Nothing has been viewed yet, so the whole inbox counts
    let badge = hub.badge();
    let fresh = badge.start().await?;
    println!("badge after start: {fresh}");

    // Opening the list marks everything up to the newest item viewed,
    // which resets every mounted badge
    let inbox = hub.inbox();
    inbox.refresh().await?;
    println!("badge after opening the inbox: {}", badge.count());

    // A notification lands while the list is closed; the service's push
    // channel delivers the new count (played here by a direct publish)
    service.push(note(
        "n4",
        "Ops alerts",
        "disk usage rising on us-east-1",
        "2026-03-08T07:15:00Z",
    ));
    hub.bus()
        .publish(dovecote::bus::Topic::Count, &InboxEvent::CountUpdated { count: 1 });
    println!("badge after a pushed update: {}", badge.count());

    // Re-opening the list views the newcomer and clears the badge again
    inbox.refresh().await?;
    println!("badge after re-opening the inbox: {}", badge.count());
    println!("items held: {}", inbox.snapshot().items.len());

    Ok(())
}
