//! Revision store adapter over an `.xlsx` workbook.
//!
//! Each sheet is one dated revision of the status report; sheet order is
//! chronological by construction. "Most recent" is positional (the last
//! sheet), not parsed from labels: if sheets are ever reordered or a
//! label sorts out of order, this picks the wrong revision silently.
//! Known limitation, kept to match how the report is actually maintained.

use std::path::{Path, PathBuf};

use regex::Regex;
use umya_spreadsheet::{Spreadsheet, Worksheet};

use crate::error::CycleError;

/// Rows scanned for date-shaped header text after duplication.
const HEADER_SCAN_ROWS: u32 = 10;

/// An open report workbook plus the path it was loaded from.
#[derive(Debug)]
pub struct Artifact {
    book: Spreadsheet,
    path: PathBuf,
}

impl Artifact {
    /// Open an existing workbook.
    pub fn open(path: &Path) -> Result<Self, CycleError> {
        if !path.exists() {
            return Err(CycleError::ArtifactMissing(path.to_path_buf()));
        }
        let book = umya_spreadsheet::reader::xlsx::read(path).map_err(|e| {
            CycleError::ArtifactOpen {
                path: path.to_path_buf(),
                message: format!("{:?}", e),
            }
        })?;
        Ok(Artifact {
            book,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Revision labels in workbook order.
    pub fn revision_names(&self) -> Vec<String> {
        self.book
            .get_sheet_collection()
            .iter()
            .map(|sheet| sheet.get_name().to_string())
            .collect()
    }

    /// The most recent revision: the last sheet in the workbook.
    pub fn most_recent(&self) -> Result<String, CycleError> {
        self.book
            .get_sheet_collection()
            .last()
            .map(|sheet| sheet.get_name().to_string())
            .ok_or(CycleError::NoRevisions)
    }

    pub fn sheet(&self, name: &str) -> Option<&Worksheet> {
        self.book.get_sheet_by_name(name)
    }

    pub fn sheet_mut(&mut self, name: &str) -> Option<&mut Worksheet> {
        self.book.get_sheet_by_name_mut(name)
    }

    /// Deep-copy `source` (all cell values and styles) into a new trailing
    /// revision named `label`, leaving the source sheet untouched.
    ///
    /// `header_date` (`M/D/YYYY`) replaces any date-shaped text found in
    /// the first few rows of the copy, and refreshes any literal "Day:"
    /// field. This is a substring heuristic, not a field-aware edit; it
    /// can false-positive on unrelated text that happens to look like a
    /// date. Returns the actual sheet name used (suffixed on collision).
    pub fn duplicate_revision(
        &mut self,
        source: &str,
        label: &str,
        header_date: &str,
    ) -> Result<String, CycleError> {
        let source_sheet = self
            .book
            .get_sheet_by_name(source)
            .ok_or_else(|| CycleError::Duplicate {
                label: label.to_string(),
                message: format!("source revision {} not found", source),
            })?;

        let mut copy = source_sheet.clone();
        let name = self.available_name(label);
        copy.set_name(name.clone());
        rewrite_header_dates(&mut copy, header_date);

        self.book
            .add_sheet(copy)
            .map_err(|message| CycleError::Duplicate {
                label: label.to_string(),
                message: message.to_string(),
            })?;

        log::info!("duplicated revision {} -> {}", source, name);
        Ok(name)
    }

    /// Write the workbook. Disk is only touched here; an aborted cycle
    /// never leaves a partially updated artifact behind.
    pub fn persist(&self, path: &Path) -> Result<(), CycleError> {
        umya_spreadsheet::writer::xlsx::write(&self.book, path).map_err(|e| {
            CycleError::ArtifactWrite {
                path: path.to_path_buf(),
                message: format!("{:?}", e),
            }
        })
    }

    /// Pick `label`, or `label (2)`, `label (3)`, ... if already taken.
    fn available_name(&self, label: &str) -> String {
        let taken = self.revision_names();
        if !taken.iter().any(|n| n == label) {
            return label.to_string();
        }
        for suffix in 2.. {
            let candidate = format!("{} ({})", label, suffix);
            if !taken.iter().any(|n| n == &candidate) {
                log::warn!("revision {} already exists, using {}", label, candidate);
                return candidate;
            }
        }
        unreachable!()
    }
}

/// Rewrite date-shaped text in the first `HEADER_SCAN_ROWS` rows so the
/// copied header reflects the new cycle.
fn rewrite_header_dates(sheet: &mut Worksheet, header_date: &str) {
    let date_shaped = Regex::new(r"\d{1,2}/\d{1,2}/\d{2,4}").expect("static regex");
    let max_col = sheet.get_highest_column().max(1);
    let max_row = sheet.get_highest_row().min(HEADER_SCAN_ROWS);

    for row in 1..=max_row {
        for col in 1..=max_col {
            let value = sheet.get_value((col, row));
            if value.is_empty() {
                continue;
            }
            if date_shaped.is_match(&value) {
                let rewritten = date_shaped.replace_all(&value, header_date).to_string();
                log::debug!("rewrote header date at ({}, {}): {}", col, row, rewritten);
                sheet.get_cell_mut((col, row)).set_value(rewritten);
            } else if value.trim_start().starts_with("Day:") {
                sheet
                    .get_cell_mut((col, row))
                    .set_value(format!("Day: {}", header_date));
            }
        }
    }
}
