//! Pure merge rules for the notification collection
//!
//! The collection is a `Vec<Notification>` held newest-first. Every way it
//! can change funnels through the two functions here: a fetched page is
//! folded in with [`merge_page`], a broadcast mutation with
//! [`apply_event`]. Both are identifier-keyed and preserve relative order,
//! so the collection never grows duplicate ids and never re-sorts under
//! deletes or read-flag updates.

use dovecote_common::{InboxEvent, Notification, Timestamp};

/// How a fetched page relates to the items already held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMerge {
    /// Initial or refresh fetch: the page becomes the collection
    Replace,
    /// Load-more fetch: the page lands after the current tail
    Append,
}

/// Folds a fetched page into `items`, returning how many items were
/// actually inserted.
///
/// `Replace` keeps the page's own order, dropping repeated ids within the
/// page (first occurrence wins). `Append` skips page items whose id is
/// already held, leaving existing items untouched. An empty page inserts
/// nothing either way.
pub fn merge_page(items: &mut Vec<Notification>, page: Vec<Notification>, mode: PageMerge) -> usize {
    match mode {
        PageMerge::Replace => {
            items.clear();
            for incoming in page {
                if !contains_id(items, &incoming.id) {
                    items.push(incoming);
                }
            }
            items.len()
        }
        PageMerge::Append => {
            let before = items.len();
            for incoming in page {
                if !contains_id(items, &incoming.id) {
                    items.push(incoming);
                }
            }
            items.len() - before
        }
    }
}

/// Applies a broadcast mutation to `items`, returning whether anything
/// changed.
///
/// `CountUpdated` never touches the collection; it exists for the badge.
pub fn apply_event(items: &mut Vec<Notification>, event: &InboxEvent) -> bool {
    match event {
        InboxEvent::ItemMarkedRead { id } => {
            match items.iter_mut().find(|n| n.id == *id && !n.is_read) {
                Some(item) => {
                    item.is_read = true;
                    true
                }
                None => false,
            }
        }
        InboxEvent::AllMarkedRead { until } => {
            let mut changed = false;
            for item in items.iter_mut() {
                if !item.is_read && item.created_at <= *until {
                    item.is_read = true;
                    changed = true;
                }
            }
            changed
        }
        InboxEvent::ItemDeleted { id } => {
            let before = items.len();
            items.retain(|n| n.id != *id);
            items.len() != before
        }
        InboxEvent::AllDeleted { until } => {
            let before = items.len();
            items.retain(|n| n.created_at > *until);
            items.len() != before
        }
        InboxEvent::CountUpdated { .. } => false,
    }
}

/// Creation timestamp of the oldest held item, the end bound for the next
/// load-more fetch.
pub fn cursor(items: &[Notification]) -> Option<&Timestamp> {
    items.last().map(|n| &n.created_at)
}

fn contains_id(items: &[Notification], id: &str) -> bool {
    items.iter().any(|n| n.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dovecote_common::NotificationMessage;
    use std::str::FromStr;

    fn note(id: &str, created_at: &str) -> Notification {
        Notification::new()
            .id(id)
            .created_at(Timestamp::from_str(created_at).unwrap())
            .message(NotificationMessage::new().header("h").body("b").build())
            .build()
    }

    fn read_note(id: &str, created_at: &str) -> Notification {
        let mut n = note(id, created_at);
        n.is_read = true;
        n
    }

    fn ids(items: &[Notification]) -> Vec<&str> {
        items.iter().map(|n| n.id.as_str()).collect()
    }

    fn ts(s: &str) -> Timestamp {
        Timestamp::from_str(s).unwrap()
    }

    #[test]
    fn replace_takes_page_order() {
        let mut items = vec![note("old", "2024-01-01T00:00:00Z")];
        let inserted = merge_page(
            &mut items,
            vec![note("b", "2024-02-02T00:00:00Z"), note("a", "2024-02-01T00:00:00Z")],
            PageMerge::Replace,
        );
        assert_eq!(inserted, 2);
        assert_eq!(ids(&items), ["b", "a"]);
    }

    #[test]
    fn replace_drops_intra_page_duplicates() {
        let mut items = Vec::new();
        let inserted = merge_page(
            &mut items,
            vec![
                note("a", "2024-02-02T00:00:00Z"),
                note("a", "2024-02-02T00:00:00Z"),
                note("b", "2024-02-01T00:00:00Z"),
            ],
            PageMerge::Replace,
        );
        assert_eq!(inserted, 2);
        assert_eq!(ids(&items), ["a", "b"]);
    }

    #[test]
    fn append_lands_after_tail_and_skips_held_ids() {
        let mut items = vec![
            read_note("a", "2024-02-03T00:00:00Z"),
            note("b", "2024-02-02T00:00:00Z"),
        ];
        let inserted = merge_page(
            &mut items,
            vec![
                note("b", "2024-02-02T00:00:00Z"),
                note("c", "2024-02-01T00:00:00Z"),
            ],
            PageMerge::Append,
        );
        assert_eq!(inserted, 1);
        assert_eq!(ids(&items), ["a", "b", "c"]);
        // Existing read flags survive an append that repeats the id
        assert!(items[0].is_read);
    }

    #[test]
    fn empty_page_inserts_nothing() {
        let mut items = vec![note("a", "2024-02-01T00:00:00Z")];
        assert_eq!(merge_page(&mut items, vec![], PageMerge::Append), 0);
        assert_eq!(ids(&items), ["a"]);

        assert_eq!(merge_page(&mut items, vec![], PageMerge::Replace), 0);
        assert!(items.is_empty());
    }

    #[test]
    fn mark_read_is_idempotent_and_keeps_order() {
        let mut items = vec![
            note("a", "2024-02-02T00:00:00Z"),
            note("b", "2024-02-01T00:00:00Z"),
        ];
        let event = InboxEvent::ItemMarkedRead { id: "b".into() };

        assert!(apply_event(&mut items, &event));
        assert_eq!(ids(&items), ["a", "b"]);
        assert!(items[1].is_read);

        // Second application changes nothing
        assert!(!apply_event(&mut items, &event));
    }

    #[test]
    fn mark_read_unknown_id_is_noop() {
        let mut items = vec![note("a", "2024-02-01T00:00:00Z")];
        assert!(!apply_event(&mut items, &InboxEvent::ItemMarkedRead { id: "zz".into() }));
        assert!(!items[0].is_read);
    }

    #[test]
    fn all_marked_read_respects_cutoff() {
        // One item before the cutoff, one after
        let mut items = vec![
            note("newer", "2024-01-02T00:00:00Z"),
            note("older", "2023-12-31T00:00:00Z"),
        ];
        let changed = apply_event(
            &mut items,
            &InboxEvent::AllMarkedRead {
                until: ts("2024-01-01T00:00:00Z"),
            },
        );
        assert!(changed);
        assert!(!items[0].is_read);
        assert!(items[1].is_read);
    }

    #[test]
    fn all_marked_read_cutoff_is_inclusive() {
        let mut items = vec![note("at", "2024-01-01T00:00:00Z")];
        apply_event(
            &mut items,
            &InboxEvent::AllMarkedRead {
                until: ts("2024-01-01T00:00:00Z"),
            },
        );
        assert!(items[0].is_read);
    }

    #[test]
    fn delete_removes_without_reordering() {
        let mut items = vec![
            note("a", "2024-02-03T00:00:00Z"),
            note("b", "2024-02-02T00:00:00Z"),
            note("c", "2024-02-01T00:00:00Z"),
        ];
        assert!(apply_event(&mut items, &InboxEvent::ItemDeleted { id: "b".into() }));
        assert_eq!(ids(&items), ["a", "c"]);

        // Absent id is a no-op
        assert!(!apply_event(&mut items, &InboxEvent::ItemDeleted { id: "b".into() }));
        assert_eq!(ids(&items), ["a", "c"]);
    }

    #[test]
    fn delete_all_retains_items_after_cutoff() {
        let mut items = vec![
            note("a", "2024-02-03T00:00:00Z"),
            note("b", "2024-02-02T00:00:00Z"),
            note("c", "2024-02-01T00:00:00Z"),
        ];
        assert!(apply_event(
            &mut items,
            &InboxEvent::AllDeleted {
                until: ts("2024-02-02T00:00:00Z"),
            },
        ));
        assert_eq!(ids(&items), ["a"]);
    }

    #[test]
    fn count_update_never_touches_collection() {
        let mut items = vec![note("a", "2024-02-01T00:00:00Z")];
        assert!(!apply_event(&mut items, &InboxEvent::CountUpdated { count: 42 }));
        assert_eq!(ids(&items), ["a"]);
    }

    #[test]
    fn cursor_is_oldest_held_timestamp() {
        assert!(cursor(&[]).is_none());

        let items = vec![
            note("a", "2024-02-03T00:00:00Z"),
            note("b", "2024-02-01T00:00:00Z"),
        ];
        assert_eq!(cursor(&items), Some(&ts("2024-02-01T00:00:00Z")));
    }
}
