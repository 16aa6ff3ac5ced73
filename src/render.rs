//! Review-section rendering onto a revision sheet.
//!
//! The "AI identified items" block is appended below all existing
//! content on a fixed 5-column grid. Layout is deterministic: banner,
//! new action items, issue list, todo review, in that order, with each
//! sub-block dropped entirely when it has no rows. One constant visual
//! style (bold white on a solid fill) marks every header cell so the
//! block stays visually distinct from the rest of the sheet.

use umya_spreadsheet::Worksheet;

use crate::extract::find_header_row;
use crate::types::{ActionItem, Issue, ReviewedItem, StatusUpdate};

/// Banner literal; the review block is found again later by this text.
pub const BANNER_TEXT: &str = "AI IDENTIFIED ITEMS (Review & Move to Appropriate Sections)";

/// Solid fill behind banner and header cells (ARGB).
const HEADER_FILL: &str = "FF4472C4";
/// Header font color (ARGB): white.
const HEADER_FONT_COLOR: &str = "FFFFFFFF";

/// Grid width of the review block.
const GRID_COLS: u32 = 5;
/// Blank rows between the last used row and the banner.
const GAP_ROWS: u32 = 3;

const ACTION_HEADERS: [&str; 5] = ["Who", "To-do's", "When", "Context", "Dependencies"];
const ISSUE_HEADERS: [&str; 5] = ["description", "raised by", "cause", "related discussions", "notes"];
const REVIEW_HEADERS: [&str; 4] = ["Who", "Todo", "Status", "Notes"];

const DUE_DEFAULT: &str = "Next meeting";
const DEPENDENCIES_DEFAULT: &str = "None";

/// Append the review block. Returns the row index one past the last
/// written row, the revision's new logical end for any future append.
pub fn render_review_section(
    sheet: &mut Worksheet,
    new_items: &[ActionItem],
    issues: &[Issue],
    reviewed: &[ReviewedItem],
) -> u32 {
    let mut row = sheet.get_highest_row() + GAP_ROWS;
    let start = row;

    write_merged_header(sheet, row, BANNER_TEXT, GRID_COLS);
    row += 1;

    if !new_items.is_empty() {
        write_header_row(sheet, row, &ACTION_HEADERS);
        row += 1;
        for item in new_items {
            set_value(sheet, 1, row, &item.owner);
            set_value(sheet, 2, row, &item.description);
            set_value(sheet, 3, row, or_default(&item.due, DUE_DEFAULT));
            set_value(sheet, 4, row, &item.context);
            set_value(sheet, 5, row, or_default(&item.dependencies, DEPENDENCIES_DEFAULT));
            row += 1;
        }
    }

    if !issues.is_empty() {
        row += 1; // spacer
        write_merged_header(sheet, row, "Issue List", GRID_COLS);
        row += 1;
        write_header_row(sheet, row, &ISSUE_HEADERS);
        row += 1;
        for issue in issues {
            set_value(sheet, 1, row, &issue.description);
            set_value(sheet, 2, row, &issue.raised_by);
            set_value(sheet, 3, row, &issue.root_cause);
            set_value(sheet, 4, row, &issue.related_discussion);
            set_value(sheet, 5, row, &issue.notes);
            row += 1;
        }
    }

    if !reviewed.is_empty() {
        row += 1; // spacer
        write_merged_header(sheet, row, "Todo Review", 3);
        row += 1;
        write_header_row(sheet, row, &REVIEW_HEADERS);
        row += 1;
        for item in reviewed {
            set_value(sheet, 1, row, &item.owner);
            set_value(sheet, 2, row, &item.description);
            set_value(sheet, 3, row, &item.status);
            set_value(sheet, 4, row, &item.notes);
            row += 1;
        }
    }

    log::info!(
        "rendered review block rows {}..{} ({} new, {} issues, {} reviewed)",
        start,
        row,
        new_items.len(),
        issues.len(),
        reviewed.len()
    );
    row
}

/// Overwrite status/notes columns of matched tracked rows, in place.
/// Rows are never removed; completed items stay visible for history.
pub fn apply_status_updates(sheet: &mut Worksheet, updates: &[StatusUpdate]) {
    for update in updates {
        sheet
            .get_cell_mut((3, update.source_row))
            .set_value(update.status.as_str());
        if !update.notes.is_empty() {
            sheet
                .get_cell_mut((4, update.source_row))
                .set_value(update.notes.as_str());
        }
        log::debug!("updated row {} status to {}", update.source_row, update.status);
    }
}

/// Write headlines into the "Good News" header row, columns 2-6.
/// Returns how many were placed; silently places none when the sheet
/// has no such row.
pub fn apply_headlines(sheet: &mut Worksheet, headlines: &[String]) -> usize {
    let Some(row) = find_header_row(sheet, &["GOOD NEWS"], 30) else {
        if !headlines.is_empty() {
            log::warn!("no Good News row found; {} headlines dropped", headlines.len());
        }
        return 0;
    };
    let mut placed = 0;
    for (i, headline) in headlines.iter().take(5).enumerate() {
        sheet
            .get_cell_mut((2 + i as u32, row))
            .set_value(headline.as_str());
        placed += 1;
    }
    placed
}

fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.trim().is_empty() {
        default
    } else {
        value
    }
}

fn set_value(sheet: &mut Worksheet, col: u32, row: u32, value: &str) {
    sheet.get_cell_mut((col, row)).set_value(value);
}

/// A banner cell merged across `span` columns, in the block style.
fn write_merged_header(sheet: &mut Worksheet, row: u32, text: &str, span: u32) {
    set_value(sheet, 1, row, text);
    for col in 1..=span {
        style_header_cell(sheet, col, row);
    }
    let range = format!("A{}:{}{}", row, column_letter(span), row);
    sheet.add_merge_cells(range.as_str());
}

fn write_header_row(sheet: &mut Worksheet, row: u32, labels: &[&str]) {
    for (i, label) in labels.iter().enumerate() {
        let col = 1 + i as u32;
        set_value(sheet, col, row, label);
        style_header_cell(sheet, col, row);
    }
}

/// The one fixed header style: bold white text on a solid fill.
fn style_header_cell(sheet: &mut Worksheet, col: u32, row: u32) {
    let style = sheet.get_style_mut((col, row));
    style.set_background_color(HEADER_FILL);
    let font = style.get_font_mut();
    font.set_bold(true);
    font.get_color_mut().set_argb(HEADER_FONT_COLOR);
}

/// 1-based column index to spreadsheet letters (1 -> A, 27 -> AA).
fn column_letter(mut col: u32) -> String {
    let mut letters = String::new();
    while col > 0 {
        let rem = ((col - 1) % 26) as u8;
        letters.insert(0, (b'A' + rem) as char);
        col = (col - 1) / 26;
    }
    letters
}

#[cfg(test)]
mod tests {
    use super::*;
    use umya_spreadsheet::Spreadsheet;

    fn book_with_content_through_row(last_row: u32) -> Spreadsheet {
        let mut book = umya_spreadsheet::new_file();
        let sheet = book.get_sheet_by_name_mut("Sheet1").unwrap();
        sheet.get_cell_mut((1, 1)).set_value("Weekly Status");
        sheet.get_cell_mut((1, last_row)).set_value("last content");
        book
    }

    fn action(owner: &str, description: &str, due: &str, deps: &str) -> ActionItem {
        ActionItem {
            owner: owner.to_string(),
            description: description.to_string(),
            due: due.to_string(),
            context: String::new(),
            dependencies: deps.to_string(),
        }
    }

    #[test]
    fn test_block_starts_three_rows_below_last_content() {
        let mut book = book_with_content_through_row(5);
        let sheet = book.get_sheet_by_name_mut("Sheet1").unwrap();
        render_review_section(sheet, &[action("A", "T", "", "")], &[], &[]);
        assert_eq!(sheet.get_value((1, 8)), BANNER_TEXT);
        // Rows 6 and 7 left blank.
        assert_eq!(sheet.get_value((1, 6)), "");
        assert_eq!(sheet.get_value((1, 7)), "");
    }

    #[test]
    fn test_render_completeness_and_order() {
        let mut book = book_with_content_through_row(5);
        let sheet = book.get_sheet_by_name_mut("Sheet1").unwrap();
        let items = vec![
            action("A", "first", "7/30", "x"),
            action("B", "second", "", ""),
            action("C", "third", "tomorrow", "none yet"),
        ];
        let issues = vec![
            Issue {
                description: "issue one".to_string(),
                raised_by: "B".to_string(),
                ..Default::default()
            },
            Issue {
                description: "issue two".to_string(),
                ..Default::default()
            },
        ];
        let end = render_review_section(sheet, &items, &issues, &[]);

        // Banner 8, action header 9, items 10-12.
        assert_eq!(sheet.get_value((1, 9)), "Who");
        assert_eq!(sheet.get_value((2, 10)), "first");
        assert_eq!(sheet.get_value((2, 11)), "second");
        assert_eq!(sheet.get_value((2, 12)), "third");
        // Spacer 13, Issue List 14, issue header 15, issues 16-17.
        assert_eq!(sheet.get_value((1, 14)), "Issue List");
        assert_eq!(sheet.get_value((1, 15)), "description");
        assert_eq!(sheet.get_value((1, 16)), "issue one");
        assert_eq!(sheet.get_value((2, 16)), "B");
        assert_eq!(sheet.get_value((1, 17)), "issue two");
        assert_eq!(end, 18);
    }

    #[test]
    fn test_missing_field_defaults() {
        let mut book = book_with_content_through_row(1);
        let sheet = book.get_sheet_by_name_mut("Sheet1").unwrap();
        render_review_section(sheet, &[action("A", "T", "", "")], &[], &[]);
        // Banner 4, header 5, item 6.
        assert_eq!(sheet.get_value((3, 6)), "Next meeting");
        assert_eq!(sheet.get_value((5, 6)), "None");
    }

    #[test]
    fn test_empty_subblocks_skipped() {
        let mut book = book_with_content_through_row(1);
        let sheet = book.get_sheet_by_name_mut("Sheet1").unwrap();
        let reviewed = vec![ReviewedItem {
            owner: "Jane".to_string(),
            description: "carried over".to_string(),
            status: "No".to_string(),
            notes: String::new(),
            source_row: 0,
        }];
        let end = render_review_section(sheet, &[], &[], &reviewed);
        // Banner 4, spacer 5, Todo Review 6, header 7, row 8.
        assert_eq!(sheet.get_value((1, 4)), BANNER_TEXT);
        assert_eq!(sheet.get_value((1, 6)), "Todo Review");
        assert_eq!(sheet.get_value((1, 7)), "Who");
        assert_eq!(sheet.get_value((3, 8)), "No");
        assert_eq!(end, 9);
        // No action item header anywhere between banner and review block.
        assert_eq!(sheet.get_value((2, 5)), "");
    }

    #[test]
    fn test_banner_text_in_leading_cell_only() {
        let mut book = book_with_content_through_row(1);
        let sheet = book.get_sheet_by_name_mut("Sheet1").unwrap();
        render_review_section(sheet, &[action("A", "T", "", "")], &[], &[]);
        assert_eq!(sheet.get_value((1, 4)), BANNER_TEXT);
        // The merged span carries style, not repeated text.
        assert_eq!(sheet.get_value((2, 4)), "");
        assert_eq!(sheet.get_value((5, 4)), "");
    }

    #[test]
    fn test_apply_status_updates_in_place() {
        let mut book = book_with_content_through_row(1);
        let sheet = book.get_sheet_by_name_mut("Sheet1").unwrap();
        sheet.get_cell_mut((3, 9)).set_value("No");
        apply_status_updates(
            sheet,
            &[StatusUpdate {
                source_row: 9,
                status: "Yes".to_string(),
                notes: "done at last".to_string(),
            }],
        );
        assert_eq!(sheet.get_value((3, 9)), "Yes");
        assert_eq!(sheet.get_value((4, 9)), "done at last");
    }

    #[test]
    fn test_apply_headlines_into_good_news_row() {
        let mut book = book_with_content_through_row(1);
        let sheet = book.get_sheet_by_name_mut("Sheet1").unwrap();
        sheet.get_cell_mut((1, 3)).set_value("Good News");
        let headlines: Vec<String> = (1..=7).map(|i| format!("h{}", i)).collect();
        let placed = apply_headlines(sheet, &headlines);
        assert_eq!(placed, 5);
        assert_eq!(sheet.get_value((2, 3)), "h1");
        assert_eq!(sheet.get_value((6, 3)), "h5");
        assert_eq!(sheet.get_value((7, 3)), "");
    }

    #[test]
    fn test_apply_headlines_without_good_news_row() {
        let mut book = book_with_content_through_row(1);
        let sheet = book.get_sheet_by_name_mut("Sheet1").unwrap();
        assert_eq!(apply_headlines(sheet, &["h1".to_string()]), 0);
    }

    #[test]
    fn test_column_letter() {
        assert_eq!(column_letter(1), "A");
        assert_eq!(column_letter(5), "E");
        assert_eq!(column_letter(26), "Z");
        assert_eq!(column_letter(27), "AA");
    }
}
