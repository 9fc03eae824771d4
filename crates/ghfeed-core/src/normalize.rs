//! Raw event payload -> EventRecord

use crate::types::{EventKind, EventRecord, Timestamp};
use serde_json::{Map, Value};

/// Normalize one loosely-typed upstream event. Never fails: malformed or
/// missing fields fall back to defaults.
pub fn normalize(raw: &Value) -> EventRecord {
    let kind = match raw.get("type") {
        Some(Value::String(s)) => EventKind::from_type(s),
        None | Some(Value::Null) => EventKind::Other(String::new()),
        Some(other) => EventKind::Other(other.to_string()),
    };

    let occurred_at = match raw.get("created_at") {
        Some(Value::String(s)) => Timestamp::parse(s),
        _ => Timestamp::UNKNOWN,
    };

    let raw_payload = raw
        .get("payload")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();

    let commit_count = match kind {
        EventKind::Push => push_commit_count(&raw_payload),
        _ => distinct_commit_count(&raw_payload),
    };

    EventRecord {
        kind,
        repository_name: nested_str(raw, "repo", "name"),
        actor_login: nested_str(raw, "actor", "login"),
        occurred_at,
        raw_payload,
        commit_count,
    }
}

fn nested_str(raw: &Value, outer: &str, inner: &str) -> Option<String> {
    raw.get(outer)?.get(inner)?.as_str().map(str::to_string)
}

// An absent `size` counts as non-positive: the commit list decides.
fn push_commit_count(payload: &Map<String, Value>) -> u64 {
    match payload.get("size").and_then(as_integer) {
        Some(size) if size > 0 => size as u64,
        _ => payload
            .get("commits")
            .and_then(Value::as_array)
            .map_or(0, |commits| commits.len() as u64),
    }
}

fn distinct_commit_count(payload: &Map<String, Value>) -> u64 {
    let Some(commits) = payload.get("commits").and_then(Value::as_array) else {
        return 0;
    };

    let mut count = 0;
    for commit in commits {
        // A list holding anything but objects is untrustworthy as a whole
        let Some(commit) = commit.as_object() else {
            return 0;
        };
        if commit.get("distinct").is_none_or(is_truthy) {
            count += 1;
        }
    }
    count
}

fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_u64().map(|u| i64::try_from(u).unwrap_or(i64::MAX)))
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
