//! Path resolution for cache and config files

use std::path::{Path, PathBuf};

/// Overrides the durable cache root when set
pub const CACHE_DIR_ENV: &str = "GHFEED_CACHE_DIR";

const APP_DIR: &str = "ghfeed";

/// Resolves standard paths for the durable cache tier and config
#[derive(Debug, Clone)]
pub struct Paths {
    pub cache_dir: PathBuf,
    pub config_dir: Option<PathBuf>,
}

impl Paths {
    /// `$GHFEED_CACHE_DIR`, else the platform cache dir, else `.cache` in the
    /// working directory
    pub fn new() -> Self {
        let cache_dir = std::env::var_os(CACHE_DIR_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .or_else(|| dirs::cache_dir().map(|d| d.join(APP_DIR)))
            .unwrap_or_else(|| PathBuf::from(".cache"));

        Self {
            cache_dir,
            config_dir: dirs::config_dir().map(|d| d.join(APP_DIR)),
        }
    }

    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = dir.into();
        self
    }

    /// Get config.json path, if the platform has a config dir
    pub fn config_file(&self) -> Option<PathBuf> {
        self.config_dir.as_ref().map(|d| d.join("config.json"))
    }

    /// Durable entry path for a key
    pub fn entry_file(&self, key: &str) -> PathBuf {
        entry_file(&self.cache_dir, key)
    }
}

impl Default for Paths {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn entry_file(root: &Path, key: &str) -> PathBuf {
    root.join(format!("{}.json", sanitize_key(key)))
}

/// Keep keys inside the cache root: anything outside `[A-Za-z0-9_-]` becomes `_`
pub fn sanitize_key(key: &str) -> String {
    if key.is_empty() {
        return "_".to_string();
    }
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
