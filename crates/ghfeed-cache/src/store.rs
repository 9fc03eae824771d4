//! Two-tier cache store: in-process map in front of one durable file per key

use crate::clock::{Clock, SystemClock};
use crate::entry::{read_entry, write_entry, CacheEntry, CacheError};
use crate::paths;
use chrono::{DateTime, Duration, Utc};
use ghfeed_core::{normalize, FetchError};
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

/// Where a lookup was satisfied from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Memory,
    Durable,
    Remote,
}

/// In-process tier plus the per-key locks guarding it.
///
/// Stores that share a `MemoryTier` also share its critical sections, so a
/// key is never fetched twice concurrently through the same tier.
#[derive(Debug, Default)]
pub struct MemoryTier {
    entries: Mutex<HashMap<String, Arc<CacheEntry>>>,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl MemoryTier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide tier, created on first use and kept until exit
    pub fn global() -> Arc<MemoryTier> {
        static GLOBAL: OnceLock<Arc<MemoryTier>> = OnceLock::new();
        GLOBAL.get_or_init(|| Arc::new(MemoryTier::new())).clone()
    }

    pub fn get(&self, key: &str) -> Option<Arc<CacheEntry>> {
        self.entries.lock().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    fn insert(&self, entry: Arc<CacheEntry>) {
        self.entries.lock().insert(entry.key.clone(), entry);
    }

    fn remove(&self, key: &str) {
        self.entries.lock().remove(key);
    }

    fn key_lock(&self, key: &str) -> Arc<Mutex<()>> {
        self.locks
            .lock()
            .entry(key.to_string())
            .or_default()
            .clone()
    }
}

/// TTL-checked cache with write-through to disk.
///
/// Expiry is lazy: entries are only judged on read and only replaced by a
/// newer successful fetch.
pub struct CacheStore {
    root: PathBuf,
    ttl: Duration,
    memory: Arc<MemoryTier>,
    clock: Arc<dyn Clock>,
}

impl CacheStore {
    /// Store rooted at `root`, backed by the process-wide memory tier
    pub fn new(root: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            root: root.into(),
            ttl,
            memory: MemoryTier::global(),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_memory(mut self, memory: Arc<MemoryTier>) -> Self {
        self.memory = memory;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn entry_path(&self, key: &str) -> PathBuf {
        paths::entry_file(&self.root, key)
    }

    /// Return the records for `key`, fetching only when neither tier holds a
    /// fresh entry.
    ///
    /// `fetch` yields raw upstream payloads; they are normalized, stored in
    /// memory, then persisted. Fetch failures propagate untouched and stale
    /// data is never served in their place.
    pub fn get_or_fetch<F>(&self, key: &str, fetch: F) -> Result<Arc<CacheEntry>, FetchError>
    where
        F: FnOnce() -> Result<Vec<Value>, FetchError>,
    {
        self.get_or_fetch_traced(key, fetch).map(|(entry, _)| entry)
    }

    /// [`get_or_fetch`](Self::get_or_fetch), also reporting which tier answered
    pub fn get_or_fetch_traced<F>(
        &self,
        key: &str,
        fetch: F,
    ) -> Result<(Arc<CacheEntry>, Source), FetchError>
    where
        F: FnOnce() -> Result<Vec<Value>, FetchError>,
    {
        // Held across check -> fetch -> write so concurrent misses single-flight
        let lock = self.memory.key_lock(key);
        let _guard = lock.lock();

        if let Some(hit) = self.lookup(key) {
            return Ok(hit);
        }

        tracing::info!(key, "fetching upstream");
        let raw = fetch()?;
        let records: Vec<_> = raw.iter().map(normalize).collect();
        let entry = Arc::new(CacheEntry::new(key, records, self.clock.now()));

        self.memory.insert(entry.clone());
        if let Err(err) = write_entry(&self.entry_path(key), &entry) {
            // Still served from memory for the rest of the process
            tracing::warn!(key, error = %err, "failed to persist cache entry");
        }

        Ok((entry, Source::Remote))
    }

    /// Fresh entry from either tier, promoting durable hits into memory
    fn lookup(&self, key: &str) -> Option<(Arc<CacheEntry>, Source)> {
        let now = self.clock.now();

        if let Some(entry) = self.memory.get(key) {
            if entry.is_fresh(now, self.ttl) {
                tracing::debug!(key, "memory tier hit");
                return Some((entry, Source::Memory));
            }
            tracing::debug!(key, fetched_at = %entry.fetched_at, "memory tier stale");
        }

        let path = self.entry_path(key);
        match read_entry(&path, key) {
            Ok(Some(entry)) if entry.is_fresh(now, self.ttl) => {
                tracing::debug!(key, "durable tier hit, promoting");
                let entry = Arc::new(entry);
                self.memory.insert(entry.clone());
                Some((entry, Source::Durable))
            }
            Ok(Some(entry)) => {
                tracing::debug!(key, fetched_at = %entry.fetched_at, "durable tier stale");
                None
            }
            Ok(None) => None,
            Err(err) => {
                tracing::warn!(key, error = %err, "ignoring unreadable cache file");
                None
            }
        }
    }

    /// Drop `key` from both tiers
    pub fn invalidate(&self, key: &str) -> Result<(), CacheError> {
        let lock = self.memory.key_lock(key);
        let _guard = lock.lock();

        self.memory.remove(key);
        let path = self.entry_path(key);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(CacheError::Io { path, source }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::io::temp_path;
    use chrono::TimeZone;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    fn store(root: &Path, clock: Arc<ManualClock>) -> CacheStore {
        CacheStore::new(root, Duration::minutes(10))
            .with_memory(Arc::new(MemoryTier::new()))
            .with_clock(clock)
    }

    fn push_feed() -> Vec<Value> {
        vec![json!({
            "type": "PushEvent",
            "repo": {"name": "a/b"},
            "created_at": "2024-01-01T00:00:00Z",
            "payload": {"size": 3}
        })]
    }

    #[test]
    fn test_miss_fetches_and_writes_both_tiers() {
        let temp = tempfile::TempDir::new().unwrap();
        let clock = Arc::new(ManualClock::new(start()));
        let store = store(temp.path(), clock);

        let (entry, source) = store.get_or_fetch_traced("octo", || Ok(push_feed())).unwrap();

        assert_eq!(source, Source::Remote);
        assert_eq!(entry.records.len(), 1);
        assert_eq!(entry.fetched_at, start());
        assert!(store.memory.get("octo").is_some());
        assert!(store.entry_path("octo").exists());
        assert!(!temp_path(&store.entry_path("octo")).exists());
    }

    #[test]
    fn test_second_call_within_ttl_skips_fetch() {
        let temp = tempfile::TempDir::new().unwrap();
        let clock = Arc::new(ManualClock::new(start()));
        let store = store(temp.path(), clock.clone());
        let calls = AtomicUsize::new(0);
        let fetch = || {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(push_feed())
        };

        let first = store.get_or_fetch("octo", fetch).unwrap();
        clock.advance(Duration::seconds(1));
        let (second, source) = store.get_or_fetch_traced("octo", fetch).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(source, Source::Memory);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_durable_hit_is_promoted() {
        let temp = tempfile::TempDir::new().unwrap();
        let clock = Arc::new(ManualClock::new(start()));
        store(temp.path(), clock.clone())
            .get_or_fetch("octo", || Ok(push_feed()))
            .unwrap();

        // Fresh memory tier, as after a restart
        let restarted = store(temp.path(), clock.clone());
        clock.advance(Duration::minutes(5));
        let (entry, source) = restarted
            .get_or_fetch_traced("octo", || panic!("should not fetch"))
            .unwrap();

        assert_eq!(source, Source::Durable);
        assert_eq!(entry.fetched_at, start());
        assert_eq!(entry.records[0].format(), "Pushed 3 commits to a/b");
        let (_, source) = restarted
            .get_or_fetch_traced("octo", || panic!("should not fetch"))
            .unwrap();
        assert_eq!(source, Source::Memory);
    }

    #[test]
    fn test_ttl_boundary_on_durable_tier() {
        let temp = tempfile::TempDir::new().unwrap();
        let clock = Arc::new(ManualClock::new(start()));
        store(temp.path(), clock.clone())
            .get_or_fetch("octo", || Ok(push_feed()))
            .unwrap();

        clock.set(start() + Duration::minutes(10) - Duration::seconds(1));
        let (_, source) = store(temp.path(), clock.clone())
            .get_or_fetch_traced("octo", || panic!("entry should be fresh"))
            .unwrap();
        assert_eq!(source, Source::Durable);

        clock.set(start() + Duration::minutes(10) + Duration::seconds(1));
        let calls = AtomicUsize::new(0);
        let (entry, source) = store(temp.path(), clock.clone())
            .get_or_fetch_traced("octo", || {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(Vec::new())
            })
            .unwrap();
        assert_eq!(source, Source::Remote);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(entry.records.is_empty());
    }

    #[test]
    fn test_stale_memory_refetches_and_supersedes() {
        let temp = tempfile::TempDir::new().unwrap();
        let clock = Arc::new(ManualClock::new(start()));
        let store = store(temp.path(), clock.clone());

        let first = store.get_or_fetch("octo", || Ok(push_feed())).unwrap();
        clock.advance(Duration::minutes(10));
        let second = store.get_or_fetch("octo", || Ok(Vec::new())).unwrap();

        assert_eq!(first.records.len(), 1);
        assert!(second.records.is_empty());
        assert_eq!(second.fetched_at, start() + Duration::minutes(10));
    }

    #[test]
    fn test_fetch_failure_propagates_without_stale_fallback() {
        let temp = tempfile::TempDir::new().unwrap();
        let clock = Arc::new(ManualClock::new(start()));
        let store = store(temp.path(), clock.clone());

        store.get_or_fetch("octo", || Ok(push_feed())).unwrap();
        clock.advance(Duration::hours(1));

        let err = store
            .get_or_fetch("octo", || Err(FetchError::Upstream(503)))
            .unwrap_err();
        assert_eq!(err, FetchError::Upstream(503));

        let err = store
            .get_or_fetch("ghost", || Err(FetchError::NotFound))
            .unwrap_err();
        assert_eq!(err, FetchError::NotFound);
        assert!(!store.entry_path("ghost").exists());
    }

    #[test]
    fn test_empty_result_is_cached_as_fresh() {
        let temp = tempfile::TempDir::new().unwrap();
        let clock = Arc::new(ManualClock::new(start()));
        let store = store(temp.path(), clock);

        store.get_or_fetch("quiet", || Ok(Vec::new())).unwrap();
        let (entry, source) = store
            .get_or_fetch_traced("quiet", || panic!("should not fetch"))
            .unwrap();

        assert_eq!(source, Source::Memory);
        assert!(entry.records.is_empty());
        assert!(store.entry_path("quiet").exists());
    }

    #[test]
    fn test_corrupt_durable_file_is_a_miss() {
        let temp = tempfile::TempDir::new().unwrap();
        let clock = Arc::new(ManualClock::new(start()));
        let store = store(temp.path(), clock);
        std::fs::write(store.entry_path("octo"), b"\x00not json").unwrap();

        let (entry, source) = store.get_or_fetch_traced("octo", || Ok(push_feed())).unwrap();

        assert_eq!(source, Source::Remote);
        assert_eq!(entry.records.len(), 1);
        let rewritten = std::fs::read_to_string(store.entry_path("octo")).unwrap();
        assert!(rewritten.contains("PushEvent"));
    }

    #[test]
    fn test_persist_failure_keeps_memory_tier() {
        let temp = tempfile::TempDir::new().unwrap();
        // Root is a file, so the durable write cannot succeed
        let root = temp.path().join("not-a-dir");
        std::fs::write(&root, b"").unwrap();
        let clock = Arc::new(ManualClock::new(start()));
        let store = store(&root, clock);

        let entry = store.get_or_fetch("octo", || Ok(push_feed())).unwrap();
        assert_eq!(entry.records.len(), 1);

        let (_, source) = store
            .get_or_fetch_traced("octo", || panic!("should not fetch"))
            .unwrap();
        assert_eq!(source, Source::Memory);
    }

    #[test]
    fn test_concurrent_misses_single_flight() {
        let temp = tempfile::TempDir::new().unwrap();
        let clock = Arc::new(ManualClock::new(start()));
        let store = store(temp.path(), clock);
        let calls = AtomicUsize::new(0);
        let barrier = std::sync::Barrier::new(4);

        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    barrier.wait();
                    let entry = store
                        .get_or_fetch("octo", || {
                            calls.fetch_add(1, Ordering::SeqCst);
                            std::thread::sleep(std::time::Duration::from_millis(50));
                            Ok(push_feed())
                        })
                        .unwrap();
                    assert_eq!(entry.records.len(), 1);
                });
            }
        });

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_invalidate_clears_both_tiers() {
        let temp = tempfile::TempDir::new().unwrap();
        let clock = Arc::new(ManualClock::new(start()));
        let store = store(temp.path(), clock);

        store.get_or_fetch("octo", || Ok(push_feed())).unwrap();
        store.invalidate("octo").unwrap();
        store.invalidate("octo").unwrap();

        assert!(store.memory.get("octo").is_none());
        assert!(!store.entry_path("octo").exists());
    }

    #[test]
    fn test_global_tier_is_shared() {
        assert!(Arc::ptr_eq(&MemoryTier::global(), &MemoryTier::global()));
    }
}
