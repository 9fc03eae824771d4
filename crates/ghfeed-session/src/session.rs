//! Per-subject session binding a cache store, a fetcher and an ordering

use crate::fetch::Fetcher;
use ghfeed_cache::{CacheEntry, CacheError, CacheStore};
use ghfeed_core::{aggregate, CategoryCounts, EventRecord, FetchError, SortOrder};
use std::sync::Arc;

/// Result of a successful feed read
#[derive(Debug, Clone, PartialEq)]
pub enum Feed {
    Events(Vec<EventRecord>),
    /// Upstream answered with an empty feed
    NoActivity,
}

impl Feed {
    pub fn records(&self) -> &[EventRecord] {
        match self {
            Feed::Events(records) => records,
            Feed::NoActivity => &[],
        }
    }

    pub fn is_no_activity(&self) -> bool {
        matches!(self, Feed::NoActivity)
    }
}

pub struct Session<F> {
    key: String,
    store: CacheStore,
    fetcher: F,
    order: SortOrder,
}

impl<F: Fetcher> Session<F> {
    pub fn new(key: impl Into<String>, store: CacheStore, fetcher: F) -> Self {
        Self {
            key: key.into(),
            store,
            fetcher,
            order: SortOrder::default(),
        }
    }

    pub fn with_sort_order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn sort_order(&self) -> SortOrder {
        self.order
    }

    /// Switch ordering; cached data is kept
    pub fn set_sort_order(&mut self, order: SortOrder) {
        self.order = order;
    }

    /// Records in the active order
    pub fn events(&self) -> Result<Feed, FetchError> {
        let entry = self.entry()?;
        if entry.records.is_empty() {
            return Ok(Feed::NoActivity);
        }
        Ok(Feed::Events(self.order.sort(&entry.records)))
    }

    /// Category counts over the last `window_days`; `None` when the window is empty
    pub fn stats(&self, window_days: u32) -> Result<Option<CategoryCounts>, FetchError> {
        let entry = self.entry()?;
        Ok(aggregate(&entry.records, window_days, self.store.now()))
    }

    /// Drop the cached feed from both tiers so the next read refetches
    pub fn forget(&self) -> Result<(), CacheError> {
        self.store.invalidate(&self.key)
    }

    fn entry(&self) -> Result<Arc<CacheEntry>, FetchError> {
        self.store
            .get_or_fetch(&self.key, || self.fetcher.fetch(&self.key))
    }
}
