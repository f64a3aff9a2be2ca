use dovecote::hub::{InboxConfig, InboxHub};
use dovecote::render::{CardProps, TextRenderer, render_inbox};
use dovecote::{Avatar, Media, MemoryClient, Notification, NotificationMessage, Timestamp};

fn ts(s: &str) -> Timestamp {
    s.parse().expect("valid timestamp")
}

fn seed() -> Vec<Notification> {
    vec![
        Notification::new()
            .id("n7")
            .created_at(ts("2026-03-07T18:45:00Z"))
            .message(
                NotificationMessage::new()
                    .header("Priya Sharma")
                    .sub_header("Design review")
                    .body("approved your proposal")
                    .avatar(Avatar::new().image_url("https://cdn.example/priya.png").build())
                    .build(),
            )
            .build(),
        Notification::new()
            .id("n6")
            .created_at(ts("2026-03-07T12:10:00Z"))
            .message(
                NotificationMessage::new()
                    .header("Build bot")
                    .body("nightly pipeline finished")
                    .build(),
            )
            .build(),
        Notification::new()
            .id("n5")
            .created_at(ts("2026-03-06T21:30:00Z"))
            .message(
                NotificationMessage::new()
                    .header("Mara Lindqvist")
                    .body("shared a screenshot")
                    .media(Media::new().url("https://cdn.example/shot.png").build())
                    .build(),
            )
            .build(),
        Notification::new()
            .id("n4")
            .created_at(ts("2026-03-05T09:00:00Z"))
            .is_read(true)
            .message(
                NotificationMessage::new()
                    .header("Mara Lindqvist")
                    .body("replied to your comment")
                    .build(),
            )
            .build(),
        Notification::new()
            .id("n3")
            .created_at(ts("2026-03-03T16:20:00Z"))
            .message(
                NotificationMessage::new()
                    .header("Ops alerts")
                    .sub_header("us-east-1")
                    .body("disk usage back to normal")
                    .build(),
            )
            .build(),
        Notification::new()
            .id("n2")
            .created_at(ts("2026-03-02T08:05:00Z"))
            .is_read(true)
            .message(
                NotificationMessage::new()
                    .header("Build bot")
                    .body("weekly dependency report")
                    .build(),
            )
            .build(),
        Notification::new()
            .id("n1")
            .created_at(ts("2026-03-01T07:40:00Z"))
            .message(
                NotificationMessage::new()
                    .header("Priya Sharma")
                    .body("mentioned you in a thread")
                    .build(),
            )
            .build(),
    ]
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    let service = MemoryClient::seeded(seed());

    let hub = InboxHub::new(
        service,
        InboxConfig::new()
            .user_token("demo-token")
            .recipient_id("demo-user")
            .page_size(4)
            .build(),
    )?;

    let inbox = hub.inbox();
    let props = CardProps::new().hide_timestamp(true).build();

    // First page
    inbox.refresh().await?;
    println!("--- after refresh ---");
    println!("{}\n", render_inbox(&inbox.snapshot(), &TextRenderer, &props));

    // Scroll to the bottom twice: one more page, then exhaustion
    inbox.end_reached().await?;
    inbox.end_reached().await?;
    println!("--- after loading the rest ---");
    println!("{}\n", render_inbox(&inbox.snapshot(), &TextRenderer, &props));

    // Activate the newest card; unread cards are marked read on click
    let newest = inbox.snapshot().items[0].clone();
    inbox.card_clicked(&newest).await?;

    // Prune everything from the first week of March
    inbox.delete_all_until(&ts("2026-03-03T23:59:59Z")).await?;

    println!("--- after click and prune ---");
    println!("{}", render_inbox(&inbox.snapshot(), &TextRenderer, &props));

    Ok(())
}
