mod cli;
mod commands;

use clap::Parser;
use cli::{CacheAction, Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Initialize tracing; quiet by default so it stays out of the listing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let ctx = commands::Context::from_cli(&cli)?;

    match cli.command {
        Commands::Events { user, sort, limit } => commands::events::run(&ctx, &user, sort, limit),
        Commands::Stats { user, days } => commands::stats::run(&ctx, &user, days),
        Commands::Cache { action } => match action {
            CacheAction::Clear { user } => commands::cache::run_clear(&ctx, &user),
            CacheAction::Path => commands::cache::run_path(&ctx),
        },
        Commands::Version => commands::version::run(),
    }
}
