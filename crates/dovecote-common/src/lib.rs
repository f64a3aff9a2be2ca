//! Common types for the dovecote notification inbox engine

#![warn(missing_docs)]

pub use smol_str;

pub use client::{NotificationClient, PageQuery, PageWindow, RealtimeParams};
pub use error::{ClientError, ClientResult};
pub use event::InboxEvent;
pub use types::datetime::Timestamp;
pub use types::notification::{Avatar, Media, Notification, NotificationMessage};

/// Facade trait over the remote notification service.
pub mod client;
pub mod error;
/// Cross-component event payloads.
pub mod event;
/// Baseline notification data types.
pub mod types;

#[cfg(feature = "memory-client")]
/// In-memory facade implementation for demos and consumer tests.
pub mod memory;

#[cfg(feature = "memory-client")]
pub use memory::MemoryClient;
