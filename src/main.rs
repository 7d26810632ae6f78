//! CLI entry point for `get-papers-list`.

use std::fs::File;
use std::io::{self, BufWriter, IsTerminal};
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use pubmed_affiliations::{EntrezConfig, PaperPipeline, RunStats, render_console, write_csv};
use tracing::{debug, info};

mod cli;
mod progress;

use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > debug/verbose flags > default (warn)
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(args.default_log_level()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    debug!(?args, "CLI arguments parsed");

    let config = EntrezConfig {
        max_retries: u32::from(args.max_retries),
        initial_delay: Duration::from_millis(args.retry_delay_ms),
        pacing_delay: Duration::from_millis(args.pacing_ms),
        ..EntrezConfig::from_env()
    };
    debug!(?config, "Entrez configuration");

    let pipeline = PaperPipeline::new(&config, usize::from(args.concurrency))?;

    println!("Searching PubMed for: '{}'", args.query);
    let ids = pipeline.search(&args.query, args.max_papers as usize).await;
    if ids.is_empty() {
        println!("No papers found matching your query.");
        return Ok(());
    }
    info!(count = ids.len(), "PMIDs found");

    let stats = Arc::new(RunStats::new());
    let use_spinner = !args.quiet && io::stderr().is_terminal();
    let (spinner, stop) = progress::spawn_progress_ui(use_spinner, Arc::clone(&stats), ids.len());

    let rows = pipeline.process_ids(&ids, &stats).await;

    stop.store(true, Ordering::SeqCst);
    if let Some(handle) = spinner {
        let _ = handle.await;
    }

    info!(
        found = ids.len(),
        fetched = stats.fetched(),
        unavailable = stats.unavailable(),
        qualifying = stats.qualifying(),
        skipped = stats.skipped(),
        "Run complete"
    );

    if rows.is_empty() {
        println!("No papers with industry affiliations found.");
        return Ok(());
    }

    if let Some(path) = &args.file {
        let file = File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        write_csv(BufWriter::new(file), &rows)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Saved {} papers to {}", rows.len(), path.display());
    } else {
        print!("{}", render_console(&rows));
        println!("\nFound {} relevant papers", rows.len());
    }

    Ok(())
}
