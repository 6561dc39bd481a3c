//! Kumo main entry point
//!
//! Command-line front end for the scheduler: enqueues the given URLs, runs
//! them to completion on the worker pool, and prints per-item results. This
//! binary plays the role of the collaborator the library is designed around.

use anyhow::Context;
use clap::Parser;
use kumo::config::{load_config, Config};
use kumo::crawler::{CrawlScheduler, HttpFetcher};
use kumo::store::TaskOutcome;
use kumo::url::{ensure_scheme, is_valid_url};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Kumo: a pausable concurrent URL fetcher
#[derive(Parser, Debug)]
#[command(name = "kumo")]
#[command(version)]
#[command(about = "Fetch a set of URLs concurrently and extract their titles", long_about = None)]
struct Cli {
    /// URLs to fetch; scheme-less input gets the configured default scheme
    #[arg(value_name = "URL", required = true)]
    urls: Vec<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load configuration, falling back to defaults without a config file
    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path).with_context(|| format!("failed to load {}", path.display()))?
        }
        None => Config::default(),
    };

    let fetcher =
        HttpFetcher::new(&config.fetch, &config.user_agent).context("failed to build HTTP client")?;
    let scheduler = Arc::new(CrawlScheduler::new(config.scheduler.clone(), Arc::new(fetcher)));

    // Progress callbacks funnel into a channel this thread drains
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    scheduler.on_progress(move |count, outcome| {
        let _ = tx.send((count, outcome.clone()));
    });

    for url in &cli.urls {
        // Reject garbage input up front; the scheduler itself accepts any
        // identifier and lets the fetch fail.
        if !is_valid_url(&ensure_scheme(url, &config.scheduler.default_scheme)) {
            tracing::warn!("Skipping invalid URL: {}", url);
            continue;
        }
        let item = scheduler.enqueue(url);
        tracing::info!("Added URL: {}", item);
    }
    let total = scheduler.total_enqueued();

    scheduler.start();

    while scheduler.completed_count() < total {
        let Some((count, outcome)) = rx.recv().await else {
            break;
        };
        match outcome {
            TaskOutcome::Success { item, title } => {
                println!("[{}/{}] {} | {}", count, total, item, title);
            }
            TaskOutcome::Failure { item, reason } => {
                println!("[{}/{}] {} | failed: {}", count, total, item, reason);
            }
        }
    }

    scheduler.stop();

    let succeeded = scheduler
        .snapshot()
        .iter()
        .filter(|o| o.is_success())
        .count();
    tracing::info!("Done: {} of {} fetched successfully", succeeded, total);

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("kumo=info,warn"),
            1 => EnvFilter::new("kumo=debug,info"),
            2 => EnvFilter::new("kumo=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
