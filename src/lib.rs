//! PubMed Affiliations Core Library
//!
//! This library finds PubMed papers that have at least one author affiliated
//! with a commercial (pharmaceutical, biotech, or other non-academic)
//! organization, and turns each qualifying paper into a report row.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`config`] - Entrez endpoint, credential, timeout, pacing and retry settings
//! - [`entrez`] - E-utilities networking: search listing, record fetch with retries
//! - [`classify`] - Record document parsing and academic/industry classification
//! - [`report`] - Report rows and their CSV / console rendering
//! - [`pipeline`] - Search → fetch → classify orchestration

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod classify;
pub mod config;
pub mod entrez;
pub mod pipeline;
pub mod report;
mod user_agent;

// Re-export commonly used types
pub use classify::{
    AffiliationClassification, DocumentError, RawRecordDocument, classify, classify_affiliation,
};
pub use config::EntrezConfig;
pub use entrez::{
    DEFAULT_MAX_RETRIES, FailureType, FetchError, RecordFetcher, RequestPacer, RetryDecision,
    RetryPolicy, SearchClient, classify_error,
};
pub use pipeline::{DEFAULT_CONCURRENCY, MAX_CONCURRENCY, PaperPipeline, PipelineError, RunStats};
pub use report::{CSV_HEADERS, ReportError, ReportRow, render_console, write_csv};
