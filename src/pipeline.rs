//! Search → fetch → classify orchestration.
//!
//! One [`RequestPacer`] is shared by the search client and the fetcher so the
//! configured spacing holds across every request of a run, regardless of how
//! many fetch workers are active.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use futures_util::stream::{self, StreamExt};
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::classify::classify;
use crate::config::EntrezConfig;
use crate::entrez::{FetchError, RecordFetcher, RequestPacer, SearchClient};
use crate::report::ReportRow;

/// Default number of records fetched at once.
pub const DEFAULT_CONCURRENCY: usize = 1;

/// Upper bound on concurrent record fetches.
pub const MAX_CONCURRENCY: usize = 10;

/// Errors raised while assembling a pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("concurrency must be between 1 and {max}, got {value}")]
    InvalidConcurrency { value: usize, max: usize },

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Per-run counters, safe to update from concurrent workers.
#[derive(Debug, Default)]
pub struct RunStats {
    fetched: AtomicUsize,
    unavailable: AtomicUsize,
    qualifying: AtomicUsize,
}

impl RunStats {
    /// Creates a tracker with zero counts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that came back as a parsed document.
    #[must_use]
    pub fn fetched(&self) -> usize {
        self.fetched.load(Ordering::SeqCst)
    }

    /// Records whose fetch ended without a document.
    #[must_use]
    pub fn unavailable(&self) -> usize {
        self.unavailable.load(Ordering::SeqCst)
    }

    /// Records that produced a report row.
    #[must_use]
    pub fn qualifying(&self) -> usize {
        self.qualifying.load(Ordering::SeqCst)
    }

    /// Fetched records with no industry affiliation.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.fetched().saturating_sub(self.qualifying())
    }

    /// All records processed so far.
    #[must_use]
    pub fn processed(&self) -> usize {
        self.fetched() + self.unavailable()
    }
}

/// Runs a query end to end.
#[derive(Debug)]
pub struct PaperPipeline {
    search: SearchClient,
    fetcher: RecordFetcher,
    concurrency: usize,
}

impl PaperPipeline {
    /// Builds search and fetch clients from `config` around a shared pacer.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidConcurrency`] when `concurrency` is
    /// outside `1..=MAX_CONCURRENCY`, or [`PipelineError::Fetch`] when an HTTP
    /// client cannot be built.
    pub fn new(config: &EntrezConfig, concurrency: usize) -> Result<Self, PipelineError> {
        let pacer = Arc::new(RequestPacer::new(config.pacing_delay));
        let search = SearchClient::new(config)?.with_pacer(Arc::clone(&pacer));
        let fetcher = RecordFetcher::new(config)?.with_pacer(pacer);
        Self::from_parts(search, fetcher, concurrency)
    }

    /// Assembles a pipeline from prebuilt clients.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidConcurrency`] for an out-of-range `concurrency`.
    pub fn from_parts(
        search: SearchClient,
        fetcher: RecordFetcher,
        concurrency: usize,
    ) -> Result<Self, PipelineError> {
        if !(1..=MAX_CONCURRENCY).contains(&concurrency) {
            return Err(PipelineError::InvalidConcurrency {
                value: concurrency,
                max: MAX_CONCURRENCY,
            });
        }
        Ok(Self {
            search,
            fetcher,
            concurrency,
        })
    }

    /// Number of concurrent fetch workers.
    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Lists PMIDs for `query`; empty on any failure.
    pub async fn search(&self, query: &str, max_results: usize) -> Vec<String> {
        self.search.search_ids(query, max_results).await
    }

    /// Fetches and classifies `ids`, returning qualifying rows in input order.
    #[instrument(skip_all, fields(count = ids.len(), concurrency = self.concurrency))]
    pub async fn process_ids(&self, ids: &[String], stats: &RunStats) -> Vec<ReportRow> {
        let rows: Vec<Option<ReportRow>> = stream::iter(ids)
            .map(|pmid| self.process_one(pmid, stats))
            .buffered(self.concurrency)
            .collect()
            .await;

        rows.into_iter().flatten().collect()
    }

    async fn process_one(&self, pmid: &str, stats: &RunStats) -> Option<ReportRow> {
        let Some(document) = self.fetcher.fetch(pmid).await else {
            stats.unavailable.fetch_add(1, Ordering::SeqCst);
            return None;
        };
        stats.fetched.fetch_add(1, Ordering::SeqCst);

        let row = classify(&document, pmid);
        if row.is_some() {
            stats.qualifying.fetch_add(1, Ordering::SeqCst);
        } else {
            debug!(pmid, "no industry affiliation");
        }
        row
    }

    /// Searches, then fetches and classifies every hit.
    ///
    /// Returns the PMIDs found alongside the qualifying rows so callers can
    /// tell "nothing matched" from "nothing qualified".
    pub async fn run(
        &self,
        query: &str,
        max_results: usize,
        stats: &RunStats,
    ) -> (Vec<String>, Vec<ReportRow>) {
        let ids = self.search(query, max_results).await;
        if ids.is_empty() {
            return (ids, Vec::new());
        }
        let rows = self.process_ids(&ids, stats).await;
        info!(
            found = ids.len(),
            qualifying = rows.len(),
            unavailable = stats.unavailable(),
            "run complete"
        );
        (ids, rows)
    }
}
