//! Anime-Harvest main entry point
//!
//! This is the command-line interface for the Anime-Harvest catalog harvester.

use anime_harvest::config::{load_config_with_hash, validate, Config};
use anime_harvest::crawler::run_harvest;
use anime_harvest::output::{CrawlObserver, LogObserver, ProgressObserver};
use anime_harvest::state::resume_offset;
use anime_harvest::storage::CsvStore;
use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Anime-Harvest: a resumable catalog harvester
///
/// Walks the top-anime listing page by page, extracts every title's detail
/// page and appends one CSV row per title. Re-running continues from the
/// page covering the rows already stored.
#[derive(Parser, Debug)]
#[command(name = "anime-harvest")]
#[command(version)]
#[command(about = "A resumable anime catalog harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// CSV file to append to (overrides output.data-path)
    #[arg(short = 'f', long, value_name = "PATH")]
    out_file: Option<PathBuf>,

    /// Discard existing rows and start from the first listing page
    #[arg(short, long)]
    redo: bool,

    /// Show a progress bar for the items of each listing page
    #[arg(short, long)]
    progress_bar: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Show the effective configuration and resume point without fetching
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = load_configuration(cli.config.as_deref())?;
    if let Some(out_file) = &cli.out_file {
        config.output.data_path = out_file.display().to_string();
    }

    if cli.dry_run {
        handle_dry_run(&config, cli.redo)
    } else {
        handle_harvest(&config, cli.redo, cli.progress_bar).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("anime_harvest=info,warn"),
            1 => EnvFilter::new("anime_harvest=debug,info"),
            2 => EnvFilter::new("anime_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the configuration file, or validated defaults when none is given
fn load_configuration(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            Ok(config)
        }
        None => {
            let config = Config::default();
            validate(&config)?;
            Ok(config)
        }
    }
}

/// Handles the --dry-run mode: shows what a run would do
fn handle_dry_run(config: &Config, redo: bool) -> anyhow::Result<()> {
    println!("=== Anime-Harvest Dry Run ===\n");

    println!("Listing:");
    println!("  Base URL: {}", config.crawler.listing_url);
    println!("  Page size: {}", config.crawler.page_size);
    println!("  Link selector: {}", config.crawler.link_selector);

    println!("\nRetry:");
    println!("  Max retries: {}", config.retry.max_retries);
    println!("  Initial delay: {}ms", config.retry.initial_delay_ms);
    println!("  Backoff factor: {}", config.retry.backoff_factor);

    println!("\nHTTP:");
    println!("  Browser identities: {}", config.http.user_agents.len());
    println!("  Timeout: {}s", config.http.timeout_secs);

    let path = Path::new(&config.output.data_path);
    println!("\nOutput: {}", path.display());

    let rows = if redo {
        0
    } else {
        CsvStore::existing_rows(path)?
    };
    let offset = resume_offset(rows, config.crawler.page_size);

    if redo {
        println!("  Existing rows would be discarded");
    } else {
        println!("  Existing rows: {}", rows);
    }
    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would start at {}{}",
        config.crawler.listing_url, offset
    );

    Ok(())
}

/// Handles the main harvest operation
async fn handle_harvest(config: &Config, redo: bool, progress_bar: bool) -> anyhow::Result<()> {
    if redo {
        tracing::info!("Starting fresh harvest (discarding existing rows)");
    } else {
        tracing::info!("Starting harvest (will resume from existing rows)");
    }

    let observer: Box<dyn CrawlObserver> = if progress_bar {
        Box::new(ProgressObserver::new())
    } else {
        Box::new(LogObserver)
    };

    match run_harvest(config, redo, observer.as_ref()).await {
        Ok(summary) => {
            tracing::info!(
                "Harvest completed successfully: {} records appended to {}",
                summary.items_stored,
                config.output.data_path
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            Err(e.into())
        }
    }
}
