//! Cache entries and their durable JSON representation

use crate::io::atomic_write_with;
use chrono::{DateTime, Duration, Utc};
use ghfeed_core::{normalize, EventRecord};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("corrupt cache file {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// One successful fetch for a key. Entries are replaced, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub key: String,
    pub records: Vec<EventRecord>,
    pub fetched_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn new(key: impl Into<String>, records: Vec<EventRecord>, fetched_at: DateTime<Utc>) -> Self {
        Self {
            key: key.into(),
            records,
            fetched_at,
        }
    }

    /// Fresh while strictly less than `ttl` has elapsed since the fetch
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.fetched_at < ttl
    }
}

#[derive(Serialize)]
struct DurableEntryOut<'a> {
    key: &'a str,
    timestamp: DateTime<Utc>,
    events: Vec<StoredEvent<'a>>,
}

#[derive(Deserialize)]
struct DurableEntryIn {
    #[serde(default)]
    key: Option<String>,
    timestamp: DateTime<Utc>,
    events: Vec<Value>,
}

/// Mirrors the upstream event shape so cached events re-normalize identically
#[derive(Serialize)]
struct StoredEvent<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    repo: StoredRepo<'a>,
    actor: StoredActor<'a>,
    created_at: Option<String>,
    payload: &'a Map<String, Value>,
}

#[derive(Serialize)]
struct StoredRepo<'a> {
    name: Option<&'a str>,
}

#[derive(Serialize)]
struct StoredActor<'a> {
    login: Option<&'a str>,
}

impl<'a> From<&'a EventRecord> for StoredEvent<'a> {
    fn from(record: &'a EventRecord) -> Self {
        Self {
            kind: record.kind.as_str(),
            repo: StoredRepo {
                name: record.repository_name.as_deref(),
            },
            actor: StoredActor {
                login: record.actor_login.as_deref(),
            },
            created_at: record.occurred_at.to_rfc3339(),
            payload: &record.raw_payload,
        }
    }
}

/// Persist `entry` at `path` via temp file + rename
pub fn write_entry(path: &Path, entry: &CacheEntry) -> Result<(), CacheError> {
    let out = DurableEntryOut {
        key: &entry.key,
        timestamp: entry.fetched_at,
        events: entry.records.iter().map(StoredEvent::from).collect(),
    };
    atomic_write_with(path, |w| {
        serde_json::to_writer(&mut *w, &out)?;
        Ok(())
    })
    .map_err(|source| CacheError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Read the durable entry at `path`.
///
/// `Ok(None)` when there is no file, or when the file belongs to a different
/// key (sanitized keys can collide).
pub fn read_entry(path: &Path, key: &str) -> Result<Option<CacheEntry>, CacheError> {
    let contents = match std::fs::read(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(CacheError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let stored: DurableEntryIn =
        serde_json::from_slice(&contents).map_err(|source| CacheError::Corrupt {
            path: path.to_path_buf(),
            source,
        })?;

    if stored.key.as_deref().is_some_and(|k| k != key) {
        return Ok(None);
    }

    let records = stored.events.iter().map(normalize).collect();
    Ok(Some(CacheEntry::new(key, records, stored.timestamp)))
}
