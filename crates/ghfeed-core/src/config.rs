//! Configuration for fetching and caching

use chrono::Duration;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// How long a fetched feed stays fresh in either cache tier
    pub cache_ttl: Duration,

    /// Durable cache directory (platform default when unset)
    pub cache_dir: Option<PathBuf>,

    /// Upstream API root
    pub api_base: String,

    /// User-Agent header sent upstream
    pub user_agent: String,

    /// Events shown before the "... and N more" line
    pub display_limit: usize,

    /// Default window for stats
    pub stats_window_days: u32,
}

/// On-disk shape; every field optional
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    cache_ttl_minutes: Option<i64>,
    cache_dir: Option<PathBuf>,
    api_base: Option<String>,
    user_agent: Option<String>,
    display_limit: Option<usize>,
    stats_window_days: Option<u32>,
}

impl Config {
    pub fn new() -> Self {
        Self {
            cache_ttl: Duration::minutes(10),
            cache_dir: None,
            api_base: "https://api.github.com".to_string(),
            user_agent: format!("ghfeed/{}", env!("CARGO_PKG_VERSION")),
            display_limit: 15,
            stats_window_days: 30,
        }
    }

    /// Load overrides from a JSON file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file: ConfigFile =
            serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(Self::new().merge(file))
    }

    /// Negative values clamp to zero; values past `Duration::MAX` clamp to it
    pub fn with_ttl_minutes(mut self, minutes: i64) -> Self {
        self.cache_ttl = Duration::try_minutes(minutes.max(0)).unwrap_or(Duration::MAX);
        self
    }

    fn merge(mut self, file: ConfigFile) -> Self {
        if let Some(minutes) = file.cache_ttl_minutes {
            self = self.with_ttl_minutes(minutes);
        }
        if let Some(dir) = file.cache_dir {
            self.cache_dir = Some(dir);
        }
        if let Some(base) = file.api_base {
            self.api_base = base.trim_end_matches('/').to_string();
        }
        if let Some(agent) = file.user_agent {
            self.user_agent = agent;
        }
        if let Some(limit) = file.display_limit {
            self.display_limit = limit;
        }
        if let Some(days) = file.stats_window_days {
            self.stats_window_days = days;
        }
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
