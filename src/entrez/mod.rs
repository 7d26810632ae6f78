//! NCBI E-utilities networking.
//!
//! This module provides the two outbound calls the tool makes:
//!
//! - [`SearchClient`] - `esearch` listing: query → ordered PMIDs (empty on failure)
//! - [`RecordFetcher`] - `efetch` retrieval: PMID → [`RawRecordDocument`](crate::RawRecordDocument),
//!   with bounded retries and linearly increasing backoff
//!
//! Both share a [`RequestPacer`] so the upstream rate limit holds across
//! every request in flight.

mod error;
mod fetch;
mod http_client;
pub mod pacer;
mod retry;
mod search;

pub use error::FetchError;
pub use fetch::RecordFetcher;
pub use http_client::build_entrez_client;
pub use pacer::{RequestPacer, extract_host};
pub use retry::{DEFAULT_MAX_RETRIES, FailureType, RetryDecision, RetryPolicy, classify_error};
pub use search::SearchClient;
