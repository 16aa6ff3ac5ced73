//! Statusbook merges webhook meeting minutes into a recurring
//! spreadsheet status report.
//!
//! Each processing cycle duplicates the most recent revision sheet of a
//! report workbook, reconciles the meeting's action items against the
//! items already tracked in that revision, and appends an
//! "AI identified items" block for human triage. History is append-only:
//! earlier revision sheets are never modified.
//!
//! Pipeline: `normalize` → `workbook` (open/duplicate) → `extract` →
//! `reconcile` → `render` → persist, sequenced by [`cycle::process_cycle`].

pub mod config;
pub mod cycle;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod normalize;
pub mod reconcile;
pub mod render;
pub mod textparse;
pub mod types;
pub mod workbook;

pub use cycle::process_cycle;
pub use error::CycleError;
pub use normalize::{normalize, normalize_text};
pub use types::{
    ActionItem, Cadence, Issue, MeetingRecord, ReviewedItem, RevisionResult, StatusUpdate,
};
