pub mod cache;
pub mod events;
pub mod stats;
pub mod version;

use crate::cli::Cli;
use ghfeed_cache::{CacheStore, Paths};
use ghfeed_core::{Config, FetchError};
use ghfeed_session::{GithubFetcher, Session};

/// Resolved configuration shared by every command
pub struct Context {
    pub config: Config,
    pub paths: Paths,
}

impl Context {
    /// Precedence: CLI flags, then the config file, then `$GHFEED_CACHE_DIR`
    /// and platform defaults.
    pub fn from_cli(cli: &Cli) -> anyhow::Result<Self> {
        let mut paths = Paths::new();
        let config_file = cli.config.clone().or_else(|| paths.config_file());
        let mut config = match config_file {
            Some(file) => Config::load(&file)?,
            None => Config::new(),
        };

        if let Some(minutes) = cli.ttl_minutes {
            config = config.with_ttl_minutes(minutes);
        }
        if let Some(dir) = cli.cache_dir.clone().or_else(|| config.cache_dir.clone()) {
            paths = paths.with_cache_dir(dir);
        }
        tracing::debug!(
            cache_dir = %paths.cache_dir.display(),
            ttl = %config.cache_ttl,
            "resolved context"
        );

        Ok(Self { config, paths })
    }

    pub fn store(&self) -> CacheStore {
        CacheStore::new(&self.paths.cache_dir, self.config.cache_ttl)
    }

    pub fn session(&self, user: &str) -> anyhow::Result<Session<GithubFetcher>> {
        let user = validate_user(user)?;
        let fetcher = GithubFetcher::new(&self.config)?;
        Ok(Session::new(user, self.store(), fetcher))
    }
}

fn validate_user(user: &str) -> anyhow::Result<&str> {
    let user = user.trim();
    if user.is_empty() {
        anyhow::bail!("Not a valid username");
    }
    Ok(user)
}

/// User-facing message for a failed fetch
pub fn describe_fetch_error(user: &str, err: &FetchError) -> String {
    match err {
        FetchError::NotFound => format!("User '{}' not found", user),
        FetchError::Upstream(code) => format!("API Error: {}", code),
        FetchError::Transport(reason) => format!("Request failed: {}", reason),
    }
}
