//! Notification records as delivered by the notification service
//!
//! A notification is immutable once created, except for the read flag
//! which only ever transitions from unread to read.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::types::datetime::Timestamp;

/// A single notification delivered to a recipient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, bon::Builder)]
#[serde(rename_all = "camelCase")]
#[builder(start_fn = new)]
pub struct Notification {
    /// Unique identifier assigned by the service
    #[builder(into)]
    pub id: SmolStr,

    /// Creation time, also the pagination cursor for this item
    pub created_at: Timestamp,

    /// Whether the recipient has opened this notification
    #[serde(default)]
    #[builder(default)]
    pub is_read: bool,

    /// Rendered message content
    pub message: NotificationMessage,
}

/// Displayable content of a notification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, bon::Builder)]
#[serde(rename_all = "camelCase")]
#[builder(start_fn = new)]
pub struct NotificationMessage {
    /// Primary line, typically the actor or source name
    #[builder(into)]
    pub header: SmolStr,

    /// Secondary line shown under the header
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub sub_header: Option<SmolStr>,

    /// Main message text
    #[builder(into)]
    pub body: SmolStr,

    /// Avatar shown alongside the message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<Avatar>,

    /// Media attachment preview
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media: Option<Media>,
}

/// Avatar reference attached to a notification message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, bon::Builder)]
#[serde(rename_all = "camelCase")]
#[builder(start_fn = new)]
pub struct Avatar {
    /// Image URL
    #[builder(into)]
    pub image_url: SmolStr,

    /// Optional link target when the avatar is activated
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub action_url: Option<SmolStr>,
}

/// Media attachment reference.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, bon::Builder)]
#[serde(rename_all = "camelCase")]
#[builder(start_fn = new)]
pub struct Media {
    /// Full media URL
    #[builder(into)]
    pub url: SmolStr,

    /// Reduced-size preview URL
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub thumbnail_url: Option<SmolStr>,
}
