//! Reconciliation: diff newly reported items against tracked ones.
//!
//! Dedup heuristic: same owner (case-insensitive exact) AND the new
//! description is a case-insensitive substring of the existing one.
//! The asymmetric containment tolerates the sheet text being a longer
//! paraphrase, but can mis-match unrelated short descriptions. Existing
//! rows are never deleted, completed ones included; the region is
//! append-only in practice.

use crate::types::{ActionItem, MeetingRecord, ReviewedItem, StatusUpdate};

/// Output of one reconciliation pass.
#[derive(Debug, Default)]
pub struct Reconciliation {
    /// Items with no match among the tracked ones, in input order.
    pub new_items: Vec<ActionItem>,
    /// In-place status overwrites for matched tracked rows.
    pub updates: Vec<StatusUpdate>,
}

/// Reconcile a canonical meeting record against the items already
/// tracked in the new revision.
///
/// When the pass would otherwise produce a completely blank review block
/// (no new items, no issues, nothing reviewed), a single synthetic
/// placeholder item is emitted naming the unrecognized input keys, so
/// the document itself shows that the payload carried nothing usable.
pub fn reconcile(record: &MeetingRecord, existing: &[ReviewedItem]) -> Reconciliation {
    let mut result = Reconciliation::default();

    for item in &record.new_action_items {
        if find_tracked(&item.owner, &item.description, existing).is_some() {
            log::debug!("already tracked, skipping: {} / {}", item.owner, item.description);
            continue;
        }
        result.new_items.push(item.clone());
    }

    // Incoming review entries refer to items that should already be on
    // the sheet; a differing status text becomes an in-place overwrite.
    for incoming in &record.todo_review {
        let Some(tracked) = find_tracked(&incoming.owner, &incoming.description, existing) else {
            continue;
        };
        if tracked.status != incoming.status {
            result.updates.push(StatusUpdate {
                source_row: tracked.source_row,
                status: incoming.status.clone(),
                notes: incoming.notes.clone(),
            });
        }
    }

    if result.new_items.is_empty()
        && record.tracked_issues.is_empty()
        && record.todo_review.is_empty()
    {
        result.new_items.push(placeholder_item(record));
    }

    log::info!(
        "reconciled: {} new, {} status updates, {} existing",
        result.new_items.len(),
        result.updates.len(),
        existing.len()
    );
    result
}

/// The already-tracked test (see module docs for the heuristic).
fn find_tracked<'a>(
    owner: &str,
    description: &str,
    existing: &'a [ReviewedItem],
) -> Option<&'a ReviewedItem> {
    let description_lower = description.to_lowercase();
    existing.iter().find(|tracked| {
        tracked.owner.eq_ignore_ascii_case(owner)
            && tracked.description.to_lowercase().contains(&description_lower)
    })
}

/// Diagnostic row emitted instead of a silently blank block.
fn placeholder_item(record: &MeetingRecord) -> ActionItem {
    let unmatched: Vec<&str> = record.extra.keys().map(String::as_str).collect();
    let detail = if unmatched.is_empty() {
        "payload carried no recognized sections".to_string()
    } else {
        format!("unrecognized input keys: {}", unmatched.join(", "))
    };
    log::warn!("nothing to report this cycle; {}", detail);
    ActionItem {
        owner: "System".to_string(),
        description: format!("No actionable items found in meeting payload ({})", detail),
        due: String::new(),
        context: String::new(),
        dependencies: String::new(),
    }
}
