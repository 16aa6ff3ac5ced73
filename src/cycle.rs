//! Revision orchestrator: one meeting cycle, start to finish.
//!
//! Linear pipeline, no branching back:
//! OPEN -> LOCATE_LATEST -> DUPLICATE -> EXTRACT_EXISTING -> RECONCILE
//! -> RENDER -> PERSIST -> DONE.
//!
//! The workbook on disk is only rewritten at PERSIST; any earlier
//! failure aborts the cycle and leaves the original artifact untouched.
//! Callers must serialize cycles against the same artifact path; there
//! is no locking here and the last writer wins.

use std::path::Path;

use chrono::{Datelike, Duration, Local};

use crate::error::CycleError;
use crate::extract::extract_reviewed_items;
use crate::reconcile::reconcile;
use crate::render::{apply_headlines, apply_status_updates, render_review_section};
use crate::types::{Cadence, MeetingRecord, RevisionResult};
use crate::workbook::Artifact;

/// Run one full cycle against the artifact at `path`, appending a new
/// dated revision and persisting in place.
///
/// The next revision's date is the current wall-clock time plus the
/// cadence offset. It is deliberately NOT derived from the previous
/// revision's own date: a skipped week does not stack up missed cycles.
pub fn process_cycle(
    path: &Path,
    record: &MeetingRecord,
    cadence: Cadence,
) -> Result<RevisionResult, CycleError> {
    log::info!("processing cycle for {}", path.display());

    let mut artifact = Artifact::open(path)?;
    let latest = artifact.most_recent()?;
    log::info!("latest revision: {}", latest);

    let next = Local::now() + Duration::days(cadence.offset_days());
    let label = format!("{}.{}.{}", next.month(), next.day(), next.year());
    let next_date = format!("{}/{}/{}", next.month(), next.day(), next.year());

    let revision = artifact.duplicate_revision(&latest, &label, &next_date)?;

    // Extraction and reconciliation read the fresh copy; the source
    // revision is never touched again.
    let existing = {
        let sheet = artifact
            .sheet(&revision)
            .ok_or_else(|| CycleError::Duplicate {
                label: label.clone(),
                message: "duplicated revision vanished".to_string(),
            })?;
        extract_reviewed_items(sheet)
    };
    log::info!("found {} existing tracked items", existing.len());

    let outcome = reconcile(record, &existing);

    {
        let sheet = artifact
            .sheet_mut(&revision)
            .ok_or_else(|| CycleError::Duplicate {
                label: label.clone(),
                message: "duplicated revision vanished".to_string(),
            })?;
        apply_status_updates(sheet, &outcome.updates);
        if !record.headlines.is_empty() {
            apply_headlines(sheet, &record.headlines);
        }
        render_review_section(
            sheet,
            &outcome.new_items,
            &record.tracked_issues,
            &record.todo_review,
        );
    }

    artifact.persist(path)?;
    log::info!("cycle complete: revision {} persisted", revision);

    Ok(RevisionResult {
        label: revision,
        next_date,
        new_item_count: outcome.new_items.len(),
        issue_count: record.tracked_issues.len(),
        existing_item_count: existing.len(),
    })
}
