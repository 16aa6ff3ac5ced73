//! Schema normalizer: heterogeneous payload → canonical `MeetingRecord`.
//!
//! Accepts either the canonical shape (keyed by `new_action_items` /
//! `tracked_issues`), the alternate webhook shape (`new_commitments`,
//! `issues_discussed`, ...), or raw text. Text is tried as JSON first
//! (code fences stripped), then handed to the legacy line grammar; only
//! when both fail does the caller see a parse error.
//!
//! Normalizing is idempotent: a record that already carries a canonical
//! key is decoded as-is, and canonical serialization always emits both
//! required sequences, so `normalize(normalize(x)) == normalize(x)`.

use serde_json::{Map, Value};

use crate::textparse;
use crate::types::{ActionItem, Issue, MeetingRecord, ReviewedItem};

/// Normalize any supported input value into a canonical record.
pub fn normalize(raw: &Value) -> Result<MeetingRecord, String> {
    match raw {
        Value::String(text) => normalize_text(text),
        Value::Object(map) => {
            if map.contains_key("new_action_items") || map.contains_key("tracked_issues") {
                Ok(decode_canonical(map))
            } else {
                Ok(convert_alternate(map))
            }
        }
        other => Err(format!(
            "unsupported meeting payload: expected object or string, got {}",
            type_name(other)
        )),
    }
}

/// Normalize raw text: strip an optional code fence, try JSON, fall back
/// to the legacy line-oriented grammar.
pub fn normalize_text(text: &str) -> Result<MeetingRecord, String> {
    let cleaned = strip_code_fence(text);
    match serde_json::from_str::<Value>(cleaned.trim()) {
        Ok(value) => normalize(&value),
        Err(json_err) => {
            log::warn!("meeting payload is not valid JSON ({}), trying text grammar", json_err);
            textparse::parse(text).map_err(|text_err| {
                format!("JSON parse failed ({}); text grammar failed ({})", json_err, text_err)
            })
        }
    }
}

/// Strip an optional triple-backtick wrapper (with optional `json` tag).
fn strip_code_fence(text: &str) -> &str {
    let Some(start) = text.find("```") else {
        return text;
    };
    let body = &text[start + 3..];
    let body = body.strip_prefix("json").unwrap_or(body);
    match body.find("```") {
        Some(end) => &body[..end],
        None => body,
    }
}

/// Decode a map already keyed by canonical names.
///
/// Sequences are decoded element-wise so one malformed entry is skipped
/// with a warning instead of poisoning the whole record.
fn decode_canonical(map: &Map<String, Value>) -> MeetingRecord {
    let mut record = MeetingRecord::default();

    for (key, value) in map {
        match key.as_str() {
            "new_action_items" => {
                record.new_action_items = decode_items(value, "new_action_items");
            }
            "tracked_issues" => {
                record.tracked_issues = decode_items(value, "tracked_issues");
            }
            "todo_review" => {
                record.todo_review = decode_items(value, "todo_review");
            }
            "headlines" => record.headlines = coerce_headlines(value),
            "meeting_date" => record.meeting_date = Some(value.clone()),
            "attendees" => record.attendees = Some(value.clone()),
            "average_rating" => record.average_rating = Some(value.clone()),
            _ => {
                record.extra.insert(key.clone(), value.clone());
            }
        }
    }

    record
}

/// Convert the alternate webhook shape into canonical form.
fn convert_alternate(map: &Map<String, Value>) -> MeetingRecord {
    let mut record = MeetingRecord::default();

    for (key, value) in map {
        match key.as_str() {
            "new_commitments" => {
                for element in array_elements(value, "new_commitments") {
                    let Some(obj) = element.as_object() else {
                        log::warn!("skipping malformed new_commitments entry: {}", element);
                        continue;
                    };
                    record.new_action_items.push(ActionItem {
                        owner: string_field(obj, "who"),
                        description: string_field(obj, "task"),
                        due: string_field(obj, "due_date"),
                        context: string_field(obj, "context"),
                        dependencies: string_field(obj, "dependencies"),
                    });
                }
                log::debug!(
                    "converted {} new_commitments to action items",
                    record.new_action_items.len()
                );
            }
            "issues_discussed" => {
                for element in array_elements(value, "issues_discussed") {
                    let Some(obj) = element.as_object() else {
                        log::warn!("skipping malformed issues_discussed entry: {}", element);
                        continue;
                    };
                    record.tracked_issues.push(Issue {
                        description: string_field(obj, "issue"),
                        raised_by: string_field(obj, "raised_by"),
                        root_cause: string_field(obj, "context"),
                        related_discussion: join_discussion_points(obj.get("discussion_points")),
                        notes: format!(
                            "Decision: {} | Owner: {}",
                            string_field(obj, "decision"),
                            string_field(obj, "owner")
                        ),
                    });
                }
            }
            "todo_review" => {
                for element in array_elements(value, "todo_review") {
                    let Some(obj) = element.as_object() else {
                        log::warn!("skipping malformed todo_review entry: {}", element);
                        continue;
                    };
                    let raw_status = string_field(obj, "status");
                    let done = matches!(
                        raw_status.to_lowercase().as_str(),
                        "done" | "completed"
                    );
                    record.todo_review.push(ReviewedItem {
                        owner: string_field(obj, "who"),
                        description: string_field(obj, "todo"),
                        status: if done { "Yes".to_string() } else { "No".to_string() },
                        notes: string_field(obj, "notes"),
                        source_row: 0,
                    });
                }
            }
            "headlines" => record.headlines = coerce_headlines(value),
            "meeting_date" => record.meeting_date = Some(value.clone()),
            "attendees" => record.attendees = Some(value.clone()),
            "average_rating" => record.average_rating = Some(value.clone()),
            _ => {
                record.extra.insert(key.clone(), value.clone());
            }
        }
    }

    record
}

/// Element-wise decode of a typed sequence; malformed entries are skipped.
fn decode_items<T: serde::de::DeserializeOwned>(value: &Value, key: &str) -> Vec<T> {
    let mut items = Vec::new();
    for element in array_elements(value, key) {
        match serde_json::from_value::<T>(element.clone()) {
            Ok(item) => items.push(item),
            Err(e) => log::warn!("skipping malformed {} entry ({}): {}", key, e, element),
        }
    }
    items
}

fn array_elements<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    match value.as_array() {
        Some(items) => items,
        None => {
            log::warn!("{} is not a sequence, ignoring", key);
            &[]
        }
    }
}

/// Headlines arrive either as bare strings or `{ "text": ... }` objects.
fn coerce_headlines(value: &Value) -> Vec<String> {
    array_elements(value, "headlines")
        .iter()
        .map(|element| match element {
            Value::String(s) => s.clone(),
            Value::Object(obj) => match obj.get("text").and_then(Value::as_str) {
                Some(text) => text.to_string(),
                None => element.to_string(),
            },
            other => scalar_to_string(other),
        })
        .collect()
}

fn join_discussion_points(value: Option<&Value>) -> String {
    let Some(points) = value.and_then(Value::as_array) else {
        return String::new();
    };
    points
        .iter()
        .map(scalar_to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn string_field(obj: &Map<String, Value>, key: &str) -> String {
    obj.get(key).map(scalar_to_string).unwrap_or_default()
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_commitments_map_to_action_items() {
        let raw = json!({
            "new_commitments": [
                {"who": "A", "task": "T", "due_date": "D"}
            ]
        });
        let record = normalize(&raw).unwrap();
        assert_eq!(record.new_action_items.len(), 1);
        let item = &record.new_action_items[0];
        assert_eq!(item.owner, "A");
        assert_eq!(item.description, "T");
        assert_eq!(item.due, "D");
        assert_eq!(item.context, "");
        assert_eq!(item.dependencies, "");
    }

    #[test]
    fn test_issue_notes_composite() {
        let raw = json!({
            "issues_discussed": [
                {"issue": "X", "raised_by": "B", "decision": "Y", "owner": "B"}
            ]
        });
        let record = normalize(&raw).unwrap();
        assert_eq!(record.tracked_issues.len(), 1);
        assert_eq!(record.tracked_issues[0].notes, "Decision: Y | Owner: B");
        assert_eq!(record.tracked_issues[0].description, "X");
    }

    #[test]
    fn test_issue_discussion_points_joined() {
        let raw = json!({
            "issues_discussed": [
                {"issue": "X", "discussion_points": ["first", "second"]}
            ]
        });
        let record = normalize(&raw).unwrap();
        assert_eq!(record.tracked_issues[0].related_discussion, "first, second");
    }

    #[test]
    fn test_todo_review_status_mapping() {
        let raw = json!({
            "todo_review": [
                {"who": "A", "todo": "T1", "status": "DONE"},
                {"who": "B", "todo": "T2", "status": "Completed"},
                {"who": "C", "todo": "T3", "status": "in progress"}
            ]
        });
        let record = normalize(&raw).unwrap();
        assert_eq!(record.todo_review[0].status, "Yes");
        assert_eq!(record.todo_review[1].status, "Yes");
        assert_eq!(record.todo_review[2].status, "No");
    }

    #[test]
    fn test_headline_coercion() {
        let raw = json!({
            "new_commitments": [],
            "headlines": ["plain", {"text": "from object"}, 42]
        });
        let record = normalize(&raw).unwrap();
        assert_eq!(record.headlines, vec!["plain", "from object", "42"]);
    }

    #[test]
    fn test_unknown_keys_pass_through() {
        let raw = json!({
            "new_commitments": [],
            "SCORECARD": {"metric": 7},
            "cascading_messages": "none"
        });
        let record = normalize(&raw).unwrap();
        assert_eq!(record.extra.get("SCORECARD"), Some(&json!({"metric": 7})));
        assert_eq!(record.extra.get("cascading_messages"), Some(&json!("none")));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let raw = json!({
            "new_commitments": [{"who": "A", "task": "T", "due_date": "D"}],
            "issues_discussed": [{"issue": "X", "raised_by": "B"}],
            "todo_review": [{"who": "A", "todo": "old", "status": "done"}],
            "headlines": ["h1"],
            "meeting_date": "7/21/2025",
            "custom_key": true
        });
        let once = normalize(&raw).unwrap();
        let round_tripped = serde_json::to_value(&once).unwrap();
        let twice = normalize(&round_tripped).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_required_sequences_always_present() {
        let record = normalize(&json!({"headlines": ["only headlines"]})).unwrap();
        assert!(record.new_action_items.is_empty());
        assert!(record.tracked_issues.is_empty());
        let wire = serde_json::to_value(&record).unwrap();
        assert!(wire.get("new_action_items").unwrap().is_array());
        assert!(wire.get("tracked_issues").unwrap().is_array());
    }

    #[test]
    fn test_fenced_json_text() {
        let text = "```json\n{\"new_commitments\": [{\"who\": \"A\", \"task\": \"T\"}]}\n```";
        let record = normalize_text(text).unwrap();
        assert_eq!(record.new_action_items.len(), 1);
        assert_eq!(record.new_action_items[0].owner, "A");
    }

    #[test]
    fn test_plain_json_text() {
        let record = normalize_text("{\"tracked_issues\": []}").unwrap();
        assert!(record.tracked_issues.is_empty());
    }

    #[test]
    fn test_malformed_elements_skipped() {
        let raw = json!({
            "new_action_items": [
                {"owner": "A", "description": "good"},
                "not a record",
                17
            ]
        });
        let record = normalize(&raw).unwrap();
        assert_eq!(record.new_action_items.len(), 1);
        assert_eq!(record.new_action_items[0].owner, "A");
    }

    #[test]
    fn test_unparseable_text_reports_both_failures() {
        let err = normalize_text("{{ not json, not minutes").unwrap_err();
        assert!(err.contains("JSON parse failed"));
        assert!(err.contains("text grammar failed"));
    }

    #[test]
    fn test_scalar_metadata_passthrough() {
        let raw = json!({
            "new_commitments": [],
            "meeting_date": "7/21/2025",
            "attendees": ["A", "B"],
            "average_rating": 8.5
        });
        let record = normalize(&raw).unwrap();
        assert_eq!(record.meeting_date, Some(json!("7/21/2025")));
        assert_eq!(record.attendees, Some(json!(["A", "B"])));
        assert_eq!(record.average_rating, Some(json!(8.5)));
    }
}
