//! Canonical data model for one meeting cycle.
//!
//! `MeetingRecord` is the schema-stable shape every input is normalized
//! into before reconciliation. Recognized keys are explicit fields;
//! anything else rides along in the flattened `extra` bag so unknown
//! payload keys survive a round trip untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One meeting's minutes in canonical form.
///
/// Invariant: `new_action_items` and `tracked_issues` are always present
/// sequences (possibly empty); they are never skipped on serialization,
/// which is what makes re-normalizing a record a no-op.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeetingRecord {
    #[serde(default)]
    pub new_action_items: Vec<ActionItem>,
    #[serde(default)]
    pub tracked_issues: Vec<Issue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub todo_review: Vec<ReviewedItem>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub headlines: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meeting_date: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attendees: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_rating: Option<Value>,
    /// Unrecognized top-level keys, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A newly reported action item.
///
/// Identity for dedup purposes is the case-insensitive
/// (`owner`, `description`) pair; there is no surrogate id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionItem {
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub description: String,
    /// Free-form due text ("Next meeting", "7/30", ...). Never parsed.
    #[serde(default)]
    pub due: String,
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub dependencies: String,
}

/// A discussed issue carried into the review block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub raised_by: String,
    #[serde(default)]
    pub root_cause: String,
    /// Discussion points joined with ", ".
    #[serde(default)]
    pub related_discussion: String,
    /// Free-form; may embed a derived "Decision: X | Owner: Y" composite.
    #[serde(default)]
    pub notes: String,
}

/// A tracked item read back from a revision's to-do review region.
///
/// `status` is deliberately a free string: "Yes", "No", "Not Done" and
/// "In Progress" all occur in real sheets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewedItem {
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub notes: String,
    /// 1-based sheet row this item was read from. A back-reference for
    /// in-place status updates, not part of the wire format.
    #[serde(default, skip_serializing)]
    pub source_row: u32,
}

/// Instruction to overwrite an existing tracked row's status in place.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusUpdate {
    pub source_row: u32,
    pub status: String,
    pub notes: String,
}

/// Meeting cadence; sets the date offset for the next revision label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cadence {
    #[default]
    Weekly,
    Biweekly,
}

impl Cadence {
    /// Parse a cadence string; anything unrecognized falls back to weekly.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "biweekly" => Cadence::Biweekly,
            _ => Cadence::Weekly,
        }
    }

    pub fn offset_days(self) -> i64 {
        match self {
            Cadence::Weekly => 7,
            Cadence::Biweekly => 14,
        }
    }
}

/// Summary returned after a successful cycle.
#[derive(Debug, Clone, Serialize)]
pub struct RevisionResult {
    /// New revision sheet name, `M.D.YYYY`.
    pub label: String,
    /// Next meeting date, `M/D/YYYY`.
    pub next_date: String,
    pub new_item_count: usize,
    pub issue_count: usize,
    pub existing_item_count: usize,
}
