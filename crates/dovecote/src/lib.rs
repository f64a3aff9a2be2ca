//! # Dovecote
//!
//! A state engine for notification inboxes.
//!
//!
//! ## Goals
//!
//! - One hub wires every component to a shared event bus, so independent
//!   inbox views and badge counters stay in sync without touching each other
//! - Collections only change after the notification service confirms a
//!   mutation, and reconciliation itself is pure and separately testable
//! - Paginated fetching with explicit list states (loading, loaded, end
//!   reached, errored) instead of ad-hoc flags
//! - Bring your own service: everything is generic over a small facade trait,
//!   with an in-memory implementation for demos and consumer tests
//! - Rendering stays out of the engine; a capability trait turns snapshots
//!   into whatever surface you have
//!
//!
//! ## Example
//!
//! Seeds an in-memory service, fetches the first page, and renders it.
//!
//! ```rust
//! use dovecote::hub::{InboxConfig, InboxHub};
//! use dovecote::render::{CardProps, TextRenderer, render_inbox};
//! use dovecote::{MemoryClient, Notification, NotificationMessage, Timestamp};
//!
//! #[tokio::main]
//! async fn main() -> miette::Result<()> {
//!     let service = MemoryClient::new();
//!     service.push(
//!         Notification::new()
//!             .id("note-1")
//!             .created_at(Timestamp::now())
//!             .message(
//!                 NotificationMessage::new()
//!                     .header("Ada")
//!                     .body("mentioned you in a thread")
//!                     .build(),
//!             )
//!             .build(),
//!     );
//!
//!     let hub = InboxHub::new(
//!         service,
//!         InboxConfig::new().user_token("app-token").recipient_id("ada").build(),
//!     )?;
//!
//!     let inbox = hub.inbox();
//!     inbox.refresh().await?;
//!
//!     println!(
//!         "{}",
//!         render_inbox(&inbox.snapshot(), &TextRenderer, &CardProps::default())
//!     );
//!     Ok(())
//! }
//! ```
//!

#![warn(missing_docs)]

/// Badge counter driven by the unviewed-count topic
pub mod badge;
/// Synchronous pub/sub bus shared by hub components
pub mod bus;
pub mod error;
/// Hub that validates config and vends wired components
pub mod hub;
/// Paginated notification list with event-driven reconciliation
pub mod inbox;
/// Pure merge and event-application routines
pub mod reconcile;
/// Renderer capability trait and a plain-text implementation
pub mod render;

pub use dovecote_common::*;
