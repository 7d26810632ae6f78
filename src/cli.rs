//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use pubmed_affiliations::{DEFAULT_CONCURRENCY, DEFAULT_MAX_RETRIES};

/// Find PubMed papers with at least one pharmaceutical or biotech author.
///
/// Searches PubMed for QUERY, fetches each matching record, and reports the
/// papers whose author affiliations look commercial.
#[derive(Parser, Debug)]
#[command(name = "get-papers-list")]
#[command(author, version, about)]
pub struct Args {
    /// PubMed query (full PubMed query syntax is supported)
    pub query: String,

    /// Write results as CSV to this file instead of printing them
    #[arg(short, long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Maximum number of PMIDs to request from the search
    #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u32).range(1..=10_000))]
    pub max_papers: u32,

    /// Print diagnostic logs (same as -v)
    #[arg(short, long)]
    pub debug: bool,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all logs except errors
    #[arg(short, long, conflicts_with_all = ["debug", "verbose"])]
    pub quiet: bool,

    /// Attempts per record for transient failures (1-10)
    #[arg(short = 'r', long, default_value_t = DEFAULT_MAX_RETRIES as u8, value_parser = clap::value_parser!(u8).range(1..=10))]
    pub max_retries: u8,

    /// Base backoff in milliseconds; attempt k waits this times (k + 1)
    #[arg(long, default_value_t = 1000, value_parser = clap::value_parser!(u64).range(0..=60000))]
    pub retry_delay_ms: u64,

    /// Minimum delay between requests to NCBI in milliseconds (0 to disable)
    #[arg(long, default_value_t = 340, value_parser = clap::value_parser!(u64).range(0..=60000))]
    pub pacing_ms: u64,

    /// Records fetched at once (1-10)
    #[arg(short = 'c', long, default_value_t = DEFAULT_CONCURRENCY as u8, value_parser = clap::value_parser!(u8).range(1..=10))]
    pub concurrency: u8,
}

impl Args {
    /// Log level used when `RUST_LOG` is unset.
    pub fn default_log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match (self.debug, self.verbose) {
            (_, 2..) => "trace",
            (true, _) | (_, 1) => "debug",
            (false, _) => "warn",
        }
    }
}
