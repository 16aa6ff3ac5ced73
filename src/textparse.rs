//! Legacy line-oriented minutes grammar.
//!
//! Older automation runs posted plain text instead of JSON:
//! `**SECTION**` headers, `KEY: value` fields, `---` item separators,
//! `- ` bullet headlines. This parser keeps that path alive; output is
//! the same canonical record the JSON normalizer produces.

use crate::types::{ActionItem, Issue, MeetingRecord, ReviewedItem};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Section {
    Headlines,
    TodoReview,
    Issues,
    NewTodos,
    Rating,
    Other,
}

/// Parse legacy minutes text into a canonical record.
///
/// Fails only when no recognized `**SECTION**` header is present at all;
/// callers treat that as "this was never minutes text".
pub fn parse(text: &str) -> Result<MeetingRecord, String> {
    let mut record = MeetingRecord::default();
    let mut section: Option<Section> = None;
    let mut todo = PendingTodo::default();
    let mut review = PendingReview::default();
    let mut issue = PendingIssue::default();

    for raw_line in text.lines() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        if line.len() > 4 && line.starts_with("**") && line.ends_with("**") {
            flush(&mut record, section, &mut todo, &mut review, &mut issue);
            section = Some(classify_section(line.trim_matches('*').trim()));
            continue;
        }

        match section {
            Some(Section::Headlines) => {
                if let Some(headline) = line.strip_prefix('-') {
                    record.headlines.push(headline.trim().to_string());
                }
            }
            Some(Section::TodoReview) => {
                if line == "---" {
                    review.flush_into(&mut record);
                } else if let Some(v) = line.strip_prefix("WHO:") {
                    review.owner = v.trim().to_string();
                } else if let Some(v) = line.strip_prefix("TO-DO:") {
                    review.description = v.trim().to_string();
                } else if let Some(v) = line.strip_prefix("DONE?:") {
                    review.status = v.trim().to_string();
                } else if let Some(v) = line.strip_prefix("NOTES:") {
                    review.notes = v.trim().to_string();
                }
            }
            Some(Section::Issues) => {
                if line == "---" {
                    issue.flush_into(&mut record);
                } else if let Some(v) = line.strip_prefix("ISSUE:") {
                    issue.description = v.trim().to_string();
                } else if let Some(v) = line.strip_prefix("RAISED BY:") {
                    issue.raised_by = v.trim().to_string();
                } else if let Some(v) = line.strip_prefix("DISCUSSION:") {
                    issue.discussion = v.trim().to_string();
                }
            }
            Some(Section::NewTodos) => {
                if line == "---" {
                    todo.flush_into(&mut record);
                } else if let Some(v) = line.strip_prefix("WHO:") {
                    todo.owner = v.trim().to_string();
                } else if let Some(v) = line.strip_prefix("TO-DO:") {
                    todo.description = v.trim().to_string();
                } else if let Some(v) = line.strip_prefix("DUE:") {
                    todo.due = v.trim().to_string();
                }
            }
            Some(Section::Rating) => {
                if let Some(v) = line.strip_prefix("Average:") {
                    record.average_rating = Some(serde_json::Value::String(v.trim().to_string()));
                }
            }
            Some(Section::Other) | None => {}
        }
    }

    flush(&mut record, section, &mut todo, &mut review, &mut issue);

    if section.is_none() {
        return Err("no recognized section headers".to_string());
    }
    Ok(record)
}

fn classify_section(name: &str) -> Section {
    let upper = name.to_uppercase();
    if upper.contains("HEADLINE") {
        Section::Headlines
    } else if upper.contains("TO-DO REVIEW") {
        Section::TodoReview
    } else if upper.contains("ISSUES") {
        Section::Issues
    } else if upper.contains("NEW TO-DO") {
        Section::NewTodos
    } else if upper.contains("RATING") {
        Section::Rating
    } else {
        Section::Other
    }
}

fn flush(
    record: &mut MeetingRecord,
    section: Option<Section>,
    todo: &mut PendingTodo,
    review: &mut PendingReview,
    issue: &mut PendingIssue,
) {
    match section {
        Some(Section::NewTodos) => todo.flush_into(record),
        Some(Section::TodoReview) => review.flush_into(record),
        Some(Section::Issues) => issue.flush_into(record),
        _ => {}
    }
}

#[derive(Default)]
struct PendingTodo {
    owner: String,
    description: String,
    due: String,
}

impl PendingTodo {
    fn flush_into(&mut self, record: &mut MeetingRecord) {
        if self.owner.is_empty() && self.description.is_empty() {
            return;
        }
        record.new_action_items.push(ActionItem {
            owner: std::mem::take(&mut self.owner),
            description: std::mem::take(&mut self.description),
            due: std::mem::take(&mut self.due),
            context: String::new(),
            dependencies: String::new(),
        });
    }
}

#[derive(Default)]
struct PendingReview {
    owner: String,
    description: String,
    status: String,
    notes: String,
}

impl PendingReview {
    fn flush_into(&mut self, record: &mut MeetingRecord) {
        if self.owner.is_empty() && self.description.is_empty() {
            return;
        }
        record.todo_review.push(ReviewedItem {
            owner: std::mem::take(&mut self.owner),
            description: std::mem::take(&mut self.description),
            status: std::mem::take(&mut self.status),
            notes: std::mem::take(&mut self.notes),
            source_row: 0,
        });
    }
}

#[derive(Default)]
struct PendingIssue {
    description: String,
    raised_by: String,
    discussion: String,
}

impl PendingIssue {
    fn flush_into(&mut self, record: &mut MeetingRecord) {
        if self.description.is_empty() {
            return;
        }
        record.tracked_issues.push(Issue {
            description: std::mem::take(&mut self.description),
            raised_by: std::mem::take(&mut self.raised_by),
            root_cause: String::new(),
            related_discussion: std::mem::take(&mut self.discussion),
            notes: String::new(),
        });
    }
}
