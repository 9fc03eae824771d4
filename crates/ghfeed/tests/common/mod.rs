#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use ghfeed_cache::{CacheStore, ManualClock, MemoryTier};
use ghfeed_core::FetchError;
use ghfeed_session::Fetcher;
use serde_json::{json, Value};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Fetcher returning a canned response and counting calls
pub struct StubFetcher {
    response: Result<Vec<Value>, FetchError>,
    calls: Arc<AtomicUsize>,
}

impl StubFetcher {
    pub fn new(response: Result<Vec<Value>, FetchError>) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                response,
                calls: calls.clone(),
            },
            calls,
        )
    }
}

impl Fetcher for StubFetcher {
    fn fetch(&self, _key: &str) -> Result<Vec<Value>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response.clone()
    }
}

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap()
}

pub fn store(root: &Path, memory: Arc<MemoryTier>, clock: Arc<ManualClock>) -> CacheStore {
    CacheStore::new(root, Duration::minutes(10))
        .with_memory(memory)
        .with_clock(clock)
}

pub fn push_event() -> Value {
    json!({
        "type": "PushEvent",
        "repo": {"name": "a/b"},
        "created_at": "2024-01-01T00:00:00Z",
        "payload": {"size": 3}
    })
}

pub fn mixed_feed() -> Vec<Value> {
    vec![
        json!({
            "type": "IssuesEvent",
            "repo": {"name": "z/issues"},
            "actor": {"login": "octocat"},
            "created_at": "2024-01-14T09:00:00Z",
            "payload": {"action": "opened"}
        }),
        json!({
            "type": "PushEvent",
            "repo": {"name": "m/push"},
            "actor": {"login": "octocat"},
            "created_at": "2024-01-10T09:00:00Z",
            "payload": {"size": 0, "commits": [{"sha": "1"}, {"sha": "2"}]}
        }),
        json!({
            "type": "ForkEvent",
            "repo": {"name": "b/fork"},
            "actor": {"login": "octocat"},
            "created_at": "2024-01-12T09:00:00Z",
            "payload": {"forkee": {"full_name": "octocat/fork", "topics": ["x", "y"]}}
        }),
        json!({
            "type": "SponsorshipEvent",
            "actor": {"login": "octocat"},
            "created_at": "not a date"
        }),
    ]
}
