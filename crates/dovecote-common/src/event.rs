//! Events exchanged between inbox components
//!
//! Components never share mutable state. A mutation performed anywhere is
//! broadcast as an [`InboxEvent`] and every interested component folds the
//! event into its own copy of the data. The payload is serializable so it
//! can also cross process or transport boundaries unchanged.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::types::datetime::Timestamp;

/// A mutation or count change broadcast to inbox components.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum InboxEvent {
    /// A single notification was marked read
    #[serde(rename_all = "camelCase")]
    ItemMarkedRead {
        /// Identifier of the affected notification
        id: SmolStr,
    },

    /// Every notification at or before the cutoff was marked read
    #[serde(rename_all = "camelCase")]
    AllMarkedRead {
        /// Inclusive cutoff timestamp
        until: Timestamp,
    },

    /// A single notification was deleted
    #[serde(rename_all = "camelCase")]
    ItemDeleted {
        /// Identifier of the removed notification
        id: SmolStr,
    },

    /// Every notification at or before the cutoff was deleted
    #[serde(rename_all = "camelCase")]
    AllDeleted {
        /// Inclusive cutoff timestamp
        until: Timestamp,
    },

    /// The unviewed count changed
    #[serde(rename_all = "camelCase")]
    CountUpdated {
        /// New unviewed total
        count: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn tagged_representation() {
        let event = InboxEvent::ItemMarkedRead { id: "note-9".into() };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"], "itemMarkedRead");
        assert_eq!(json["id"], "note-9");

        let cutoff = Timestamp::from_str("2024-03-01T09:30:00Z").unwrap();
        let event = InboxEvent::AllDeleted { until: cutoff };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"kind":"allDeleted","until":"2024-03-01T09:30:00Z"}"#);

        let back: InboxEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn count_update_round_trips() {
        let event = InboxEvent::CountUpdated { count: 12 };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"kind":"countUpdated","count":12}"#);
        assert_eq!(serde_json::from_str::<InboxEvent>(&json).unwrap(), event);
    }
}
