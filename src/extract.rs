//! Existing-item extraction from a revision sheet.
//!
//! The to-do review region is located by header text, not by fixed
//! coordinates: real sheets drift as people insert rows. Column layout
//! inside the region is fixed: owner, description, status, notes.

use umya_spreadsheet::Worksheet;

use crate::types::ReviewedItem;

/// Rows scanned when looking for a region header.
const HEADER_SEARCH_ROWS: u32 = 30;
/// Columns scanned when looking for a region header.
const HEADER_SEARCH_COLS: u32 = 6;
/// Data rows start this far below the region header.
const DATA_OFFSET_ROWS: u32 = 3;
/// A run of more than this many fully blank rows ends the region.
const BLANK_RUN_LIMIT: u32 = 10;

const COL_OWNER: u32 = 1;
const COL_DESCRIPTION: u32 = 2;
const COL_STATUS: u32 = 3;
const COL_NOTES: u32 = 4;

/// Scan the tracked-items region and reconstruct the already-known items.
///
/// Returns an empty list (not an error) when the sheet has no
/// "TO-DO ... REVIEW" header; a revision without the region simply has
/// nothing to reconcile against.
pub fn extract_reviewed_items(sheet: &Worksheet) -> Vec<ReviewedItem> {
    let Some(header_row) = find_header_row(sheet, &["TO-DO", "REVIEW"], HEADER_SEARCH_ROWS) else {
        log::warn!("no to-do review header found in revision {}", sheet.get_name());
        return Vec::new();
    };

    let mut items = Vec::new();
    let mut blank_run = 0u32;
    let last_row = sheet.get_highest_row();

    for row in (header_row + DATA_OFFSET_ROWS)..=last_row {
        let owner = sheet.get_value((COL_OWNER, row)).trim().to_string();
        let description = sheet.get_value((COL_DESCRIPTION, row)).trim().to_string();
        let status = sheet.get_value((COL_STATUS, row)).trim().to_string();
        let notes = sheet.get_value((COL_NOTES, row)).trim().to_string();

        if owner.is_empty() && description.is_empty() && status.is_empty() && notes.is_empty() {
            blank_run += 1;
            if blank_run > BLANK_RUN_LIMIT {
                break;
            }
            continue;
        }
        blank_run = 0;

        if owner.is_empty() || description.is_empty() {
            continue;
        }

        items.push(ReviewedItem {
            owner,
            description,
            status,
            notes,
            source_row: row,
        });
    }

    log::debug!(
        "extracted {} reviewed items from revision {}",
        items.len(),
        sheet.get_name()
    );
    items
}

/// Find the first row (scanning top-down, left-to-right) whose cell text
/// contains every needle, case-insensitively.
pub fn find_header_row(sheet: &Worksheet, needles: &[&str], max_rows: u32) -> Option<u32> {
    let last_row = sheet.get_highest_row().min(max_rows);
    let last_col = sheet.get_highest_column().min(HEADER_SEARCH_COLS).max(1);

    for row in 1..=last_row {
        for col in 1..=last_col {
            let value = sheet.get_value((col, row));
            if value.is_empty() {
                continue;
            }
            let upper = value.to_uppercase();
            if needles
                .iter()
                .all(|needle| upper.contains(needle.to_uppercase().as_str()))
            {
                return Some(row);
            }
        }
    }
    None
}
