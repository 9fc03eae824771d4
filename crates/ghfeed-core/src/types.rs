//! Normalized activity record types

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Value};
use std::fmt;

/// Rendered in place of an absent repository name
pub const MISSING: &str = "<unknown>";

const DATE_FORMAT: &str = "%d.%m.%Y %H:%M:%S";

/// Event category as reported by the upstream `type` field
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventKind {
    Push,
    Issues,
    Watch,
    Create,
    Delete,
    PullRequest,
    Fork,
    /// Unrecognized kind, carried through verbatim (empty when the source omits it)
    Other(String),
}

impl EventKind {
    pub fn from_type(raw: &str) -> Self {
        match raw {
            "PushEvent" => EventKind::Push,
            "IssuesEvent" => EventKind::Issues,
            "WatchEvent" => EventKind::Watch,
            "CreateEvent" => EventKind::Create,
            "DeleteEvent" => EventKind::Delete,
            "PullRequestEvent" => EventKind::PullRequest,
            "ForkEvent" => EventKind::Fork,
            other => EventKind::Other(other.to_string()),
        }
    }

    /// Canonical upstream identifier, used for ordering and persistence
    pub fn as_str(&self) -> &str {
        match self {
            EventKind::Push => "PushEvent",
            EventKind::Issues => "IssuesEvent",
            EventKind::Watch => "WatchEvent",
            EventKind::Create => "CreateEvent",
            EventKind::Delete => "DeleteEvent",
            EventKind::PullRequest => "PullRequestEvent",
            EventKind::Fork => "ForkEvent",
            EventKind::Other(raw) => raw,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A UTC instant, or the "unknown" sentinel which orders before every real instant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(Option<DateTime<Utc>>);

impl Timestamp {
    pub const UNKNOWN: Timestamp = Timestamp(None);

    pub fn at(instant: DateTime<Utc>) -> Self {
        Timestamp(Some(instant))
    }

    /// Parse an ISO-8601 string. A trailing `Z` or explicit offset is converted
    /// to UTC, a bare date-time is taken as UTC, anything else is `UNKNOWN`.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Timestamp::at(dt.with_timezone(&Utc));
        }
        if let Ok(naive) = raw.parse::<NaiveDateTime>() {
            return Timestamp::at(naive.and_utc());
        }
        raw.parse::<NaiveDate>()
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| Timestamp::at(naive.and_utc()))
            .unwrap_or(Timestamp::UNKNOWN)
    }

    pub fn instant(&self) -> Option<DateTime<Utc>> {
        self.0
    }

    pub fn is_unknown(&self) -> bool {
        self.0.is_none()
    }

    pub fn to_rfc3339(&self) -> Option<String> {
        self.0
            .map(|dt| dt.to_rfc3339_opts(chrono::SecondsFormat::AutoSi, true))
    }
}

/// A validated, internally consistent activity event
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    pub kind: EventKind,
    pub repository_name: Option<String>,
    pub actor_login: Option<String>,
    pub occurred_at: Timestamp,
    /// Source payload, retained verbatim (keys ordered)
    pub raw_payload: Map<String, Value>,
    /// Commits carried by the event; only meaningful for pushes, 0 when absent
    pub commit_count: u64,
}

impl EventRecord {
    /// Human-readable one-line summary
    pub fn format(&self) -> String {
        let repo = self.repository_name.as_deref().unwrap_or(MISSING);
        match &self.kind {
            EventKind::Push => {
                let n = self.commit_count;
                let plural = if n == 1 { "" } else { "s" };
                format!("Pushed {} commit{} to {}", n, plural, repo)
            }
            EventKind::Issues => format!("{} an issue in {}", self.action(), repo),
            EventKind::PullRequest => format!("{} a pull request in {}", self.action(), repo),
            EventKind::Create => {
                let ref_type = self
                    .raw_payload
                    .get("ref_type")
                    .and_then(Value::as_str)
                    .unwrap_or("repository");
                format!("Created {} in {}", ref_type, repo)
            }
            EventKind::Delete => format!("Deleted a branch in {}", repo),
            EventKind::Watch => format!("Watched {}", repo),
            EventKind::Fork | EventKind::Other(_) => format!("{} in {}", self.kind, repo),
        }
    }

    /// Fixed-width `dd.mm.yyyy HH:MM:SS` in UTC, or "Unknown date"
    pub fn format_date(&self) -> String {
        match self.occurred_at.instant() {
            Some(dt) => dt.format(DATE_FORMAT).to_string(),
            None => "Unknown date".to_string(),
        }
    }

    fn action(&self) -> String {
        let action = self
            .raw_payload
            .get("action")
            .and_then(Value::as_str)
            .unwrap_or("");
        capitalize(action)
    }
}

/// First character upper-cased, the rest lower-cased
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
