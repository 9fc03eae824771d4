//! Upstream fetch capability consumed by the cache

use ghfeed_core::FetchError;
use serde_json::Value;

/// Fetches the raw event payloads for a subject. Retries and timeouts are the
/// implementor's business; callers never retry.
pub trait Fetcher: Send + Sync {
    fn fetch(&self, key: &str) -> Result<Vec<Value>, FetchError>;
}

impl<F> Fetcher for F
where
    F: Fn(&str) -> Result<Vec<Value>, FetchError> + Send + Sync,
{
    fn fetch(&self, key: &str) -> Result<Vec<Value>, FetchError> {
        self(key)
    }
}
