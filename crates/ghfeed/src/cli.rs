use clap::{Parser, Subcommand};
use ghfeed_core::SortOrder;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ghfeed")]
#[command(version)]
#[command(about = "Cached GitHub activity feed viewer")]
pub struct Cli {
    /// Config file (defaults to the platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Durable cache directory
    #[arg(long, global = true)]
    pub cache_dir: Option<PathBuf>,

    /// How long a fetched feed stays fresh
    #[arg(long, global = true)]
    pub ttl_minutes: Option<i64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show a user's recent activity
    Events {
        /// GitHub username
        user: String,

        /// recency (1), repository (2) or kind (3)
        #[arg(short, long, default_value = "recency")]
        sort: SortOrder,

        /// Number of events to print
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show activity counts per category
    Stats {
        /// GitHub username
        user: String,

        /// Window size in days
        #[arg(short, long)]
        days: Option<u32>,
    },

    /// Manage the on-disk cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// Print version information
    Version,
}

#[derive(Subcommand)]
pub enum CacheAction {
    /// Drop a user's cached feed
    Clear { user: String },
    /// Print the cache directory
    Path,
}
