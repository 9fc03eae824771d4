//! Windowed per-category activity counts

use crate::types::{EventKind, EventRecord};
use chrono::{DateTime, Duration, Utc};

/// Aggregation bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Commits,
    PullRequests,
    Issues,
    Watches,
    Forks,
    Creates,
    Deletes,
    Other,
}

impl Category {
    pub fn for_kind(kind: &EventKind) -> Self {
        match kind {
            EventKind::Push => Category::Commits,
            EventKind::PullRequest => Category::PullRequests,
            EventKind::Issues => Category::Issues,
            EventKind::Watch => Category::Watches,
            EventKind::Fork => Category::Forks,
            EventKind::Create => Category::Creates,
            EventKind::Delete => Category::Deletes,
            EventKind::Other(_) => Category::Other,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Commits => "Commits",
            Category::PullRequests => "Pull requests",
            Category::Issues => "Issues",
            Category::Watches => "Stars / Watches",
            Category::Forks => "Forks",
            Category::Creates => "Creates",
            Category::Deletes => "Deletes",
            Category::Other => "Other",
        }
    }
}

/// Category counts in order of first occurrence
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryCounts {
    entries: Vec<(Category, u64)>,
}

impl CategoryCounts {
    fn add(&mut self, category: Category, amount: u64) {
        match self.entries.iter_mut().find(|(c, _)| *c == category) {
            Some((_, count)) => *count = count.saturating_add(amount),
            None => self.entries.push((category, amount)),
        }
    }

    pub fn get(&self, category: Category) -> Option<u64> {
        self.entries
            .iter()
            .find(|(c, _)| *c == category)
            .map(|&(_, count)| count)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, u64)> + '_ {
        self.entries.iter().copied()
    }

    /// `(label, count)` pairs, in emission order
    pub fn labeled(&self) -> Vec<(&'static str, u64)> {
        self.iter().map(|(c, n)| (c.label(), n)).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_count(&self) -> u64 {
        self.iter().map(|(_, n)| n).max().unwrap_or(0)
    }
}

/// Count records within `[now - window_days, now]` per category. Pushes
/// contribute their commit count rather than 1.
///
/// Returns `None` when no record with a known timestamp falls in the window,
/// so callers can tell "no data" apart from an all-zero chart.
pub fn aggregate(
    records: &[EventRecord],
    window_days: u32,
    now: DateTime<Utc>,
) -> Option<CategoryCounts> {
    // A window reaching past the representable range covers everything up to now
    let start = now
        .checked_sub_signed(Duration::days(i64::from(window_days)))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);
    let mut counts = CategoryCounts::default();
    let mut matched = false;

    for record in records {
        let Some(at) = record.occurred_at.instant() else {
            continue;
        };
        if at < start || at > now {
            continue;
        }
        matched = true;
        let category = Category::for_kind(&record.kind);
        let amount = match category {
            Category::Commits => record.commit_count,
            _ => 1,
        };
        counts.add(category, amount);
    }

    matched.then_some(counts)
}
