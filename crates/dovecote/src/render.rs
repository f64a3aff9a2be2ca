//! Presentation seam for inbox views
//!
//! The engine never renders anything itself. An embedder supplies an
//! [`InboxRenderer`] and [`render_inbox`] drives it from a snapshot:
//! the loading, error, and empty branches mirror the list state machine,
//! and the populated branch is header, cards, footer. [`TextRenderer`]
//! is a plain-text implementation for terminals and tests.

use dovecote_common::Notification;

use crate::inbox::{InboxSnapshot, ListState};

/// Display options applied to every card.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, bon::Builder)]
#[builder(start_fn = new)]
pub struct CardProps {
    /// Suppress the avatar slot
    #[builder(default)]
    pub hide_avatar: bool,

    /// Suppress media attachment previews
    #[builder(default)]
    pub hide_media: bool,

    /// Suppress the creation timestamp
    #[builder(default)]
    pub hide_timestamp: bool,
}

/// Rendering hooks for an inbox view.
///
/// Only [`card`](Self::card) is required; the section hooks have plain
/// defaults that any embedder can override.
pub trait InboxRenderer {
    /// Renders a single notification.
    fn card(&self, notification: &Notification, props: &CardProps) -> String;

    /// Renders the section above the cards.
    fn header(&self, unread: usize) -> String {
        match unread {
            0 => "Notifications".to_string(),
            n => format!("Notifications ({n} unread)"),
        }
    }

    /// Renders the section below the cards.
    fn footer(&self, end_reached: bool, fetching_more: bool) -> String {
        if fetching_more {
            "Loading more...".to_string()
        } else if end_reached {
            "You're all caught up.".to_string()
        } else {
            String::new()
        }
    }

    /// Renders the empty-collection state.
    fn empty(&self) -> String {
        "No notifications yet.".to_string()
    }

    /// Renders the initial loading state.
    fn loading(&self) -> String {
        "Loading...".to_string()
    }

    /// Renders the failed state.
    fn error(&self, message: &str) -> String {
        format!("Couldn't load notifications: {message}")
    }
}

/// Plain-text renderer, one line per card.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer;

impl InboxRenderer for TextRenderer {
    fn card(&self, notification: &Notification, props: &CardProps) -> String {
        let mut line = String::new();
        line.push(if notification.is_read { ' ' } else { '*' });
        line.push(' ');
        line.push_str(&notification.message.header);
        if let Some(sub) = &notification.message.sub_header {
            line.push_str(" · ");
            line.push_str(sub);
        }
        line.push_str(": ");
        line.push_str(&notification.message.body);
        if !props.hide_media && notification.message.media.is_some() {
            line.push_str(" [media]");
        }
        if !props.hide_timestamp {
            line.push_str(" (");
            line.push_str(notification.created_at.as_str());
            line.push(')');
        }
        line
    }
}

/// Renders a full inbox view from a snapshot.
///
/// Section selection follows the list state: `Loading` and `Errored` take
/// over the whole view, an empty collection renders the empty state, and
/// anything else is header, cards, footer. Blank sections are dropped.
pub fn render_inbox(
    snapshot: &InboxSnapshot,
    renderer: &impl InboxRenderer,
    props: &CardProps,
) -> String {
    match snapshot.state {
        ListState::Loading => renderer.loading(),
        ListState::Errored => {
            let message = snapshot.last_error.as_deref().unwrap_or("unknown error");
            renderer.error(message)
        }
        ListState::Loaded | ListState::EndReached if snapshot.items.is_empty() => renderer.empty(),
        ListState::Loaded | ListState::EndReached => {
            let unread = snapshot.items.iter().filter(|n| !n.is_read).count();
            let mut sections = vec![renderer.header(unread)];
            sections.extend(snapshot.items.iter().map(|n| renderer.card(n, props)));
            sections.push(renderer.footer(
                snapshot.state == ListState::EndReached,
                snapshot.fetching_more,
            ));
            sections.retain(|s| !s.is_empty());
            sections.join("\n")
        }
    }
}
