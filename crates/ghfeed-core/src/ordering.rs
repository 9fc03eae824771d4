//! Interchangeable orderings over normalized records

use crate::types::EventRecord;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

type Comparator = fn(&EventRecord, &EventRecord) -> Ordering;

/// Sort strategy selected by the session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortOrder {
    /// Most recent first; unknown timestamps sink to the end
    #[default]
    Recency,
    /// Ascending repository name; records without one come first
    Repository,
    /// Ascending canonical kind identifier
    Kind,
}

impl SortOrder {
    pub const ALL: [SortOrder; 3] = [SortOrder::Recency, SortOrder::Repository, SortOrder::Kind];

    pub fn name(self) -> &'static str {
        match self {
            SortOrder::Recency => "recency",
            SortOrder::Repository => "repository",
            SortOrder::Kind => "kind",
        }
    }

    fn comparator(self) -> Comparator {
        match self {
            SortOrder::Recency => by_recency,
            SortOrder::Repository => by_repository,
            SortOrder::Kind => by_kind,
        }
    }

    /// Stable sort into a new vector; the input is left untouched
    pub fn sort(self, records: &[EventRecord]) -> Vec<EventRecord> {
        let mut sorted = records.to_vec();
        sorted.sort_by(self.comparator());
        sorted
    }
}

fn by_recency(a: &EventRecord, b: &EventRecord) -> Ordering {
    b.occurred_at.cmp(&a.occurred_at)
}

fn by_repository(a: &EventRecord, b: &EventRecord) -> Ordering {
    a.repository_name.cmp(&b.repository_name)
}

fn by_kind(a: &EventRecord, b: &EventRecord) -> Ordering {
    a.kind.as_str().cmp(b.kind.as_str())
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort order '{0}' (expected recency, repository or kind)")]
pub struct ParseSortOrderError(String);

impl FromStr for SortOrder {
    type Err = ParseSortOrderError;

    /// Accepts the names plus the numbered menu choices `1`-`3`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "recency" | "date" => Ok(SortOrder::Recency),
            "2" | "repository" | "repo" => Ok(SortOrder::Repository),
            "3" | "kind" | "type" => Ok(SortOrder::Kind),
            _ => Err(ParseSortOrderError(s.to_string())),
        }
    }
}
