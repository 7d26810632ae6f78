//! Request pacing for E-utilities traffic.
//!
//! NCBI limits clients to a few requests per second. [`RequestPacer`] enforces
//! a minimum spacing between consecutive requests to the same host. One pacer
//! is shared (via `Arc`) by the search client and every fetch worker, so the
//! spacing holds in aggregate no matter how many records are in flight.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//! use pubmed_affiliations::entrez::RequestPacer;
//!
//! # async fn example() {
//! let pacer = Arc::new(RequestPacer::new(Duration::from_millis(340)));
//!
//! // First request proceeds immediately
//! pacer.acquire("https://eutils.ncbi.nlm.nih.gov/entrez/eutils/esearch.fcgi").await;
//!
//! // Second request to the same host waits out the remaining spacing
//! pacer.acquire("https://eutils.ncbi.nlm.nih.gov/entrez/eutils/efetch.fcgi").await;
//! # }
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, instrument, warn};

/// Warning threshold for cumulative pacing delay per host (30 seconds).
const CUMULATIVE_DELAY_WARNING_THRESHOLD: Duration = Duration::from_secs(30);

/// Shared per-host request pacer.
///
/// `Send + Sync`; wrap in `Arc` and clone into each worker.
#[derive(Debug)]
pub struct RequestPacer {
    /// Minimum spacing between requests to the same host.
    spacing: Duration,

    /// Whether pacing is disabled (`--pacing-ms 0`).
    disabled: bool,

    /// Per-host state. Values are `Arc`ed so the shard lock is released
    /// before awaiting on the inner mutex.
    hosts: DashMap<String, Arc<HostState>>,
}

#[derive(Debug)]
struct HostState {
    /// Time of the last request; `None` until the first request.
    last_request: Mutex<Option<Instant>>,

    /// Total time spent waiting on this host, in milliseconds.
    cumulative_delay_ms: AtomicU64,
}

impl HostState {
    fn new() -> Self {
        Self {
            last_request: Mutex::new(None),
            cumulative_delay_ms: AtomicU64::new(0),
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn add_cumulative_delay(&self, delay: Duration) -> Duration {
        let delay_ms = delay.as_millis() as u64;
        let new_total = self
            .cumulative_delay_ms
            .fetch_add(delay_ms, Ordering::SeqCst)
            + delay_ms;
        Duration::from_millis(new_total)
    }
}

impl RequestPacer {
    /// Creates a pacer with the given minimum spacing.
    #[must_use]
    #[instrument(skip_all, fields(spacing_ms = spacing.as_millis()))]
    pub fn new(spacing: Duration) -> Self {
        debug!("creating request pacer");
        Self {
            spacing,
            disabled: spacing.is_zero(),
            hosts: DashMap::new(),
        }
    }

    /// Creates a pacer that never waits.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            spacing: Duration::ZERO,
            disabled: true,
            hosts: DashMap::new(),
        }
    }

    /// Returns whether pacing is disabled.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Returns the configured spacing.
    #[must_use]
    pub fn spacing(&self) -> Duration {
        self.spacing
    }

    /// Waits until a request to `url`'s host is allowed, then records it.
    ///
    /// The first request to a host proceeds immediately. Concurrent callers
    /// for the same host are serialized on the host's mutex, so each one
    /// observes the timestamp written by the previous caller.
    #[instrument(skip(self), fields(host))]
    pub async fn acquire(&self, url: &str) {
        if self.disabled {
            return;
        }

        let host = extract_host(url);
        tracing::Span::current().record("host", &host);

        let state = self
            .hosts
            .entry(host.clone())
            .or_insert_with(|| Arc::new(HostState::new()))
            .clone();

        let mut last_request_guard = state.last_request.lock().await;

        if let Some(last_request) = *last_request_guard {
            let elapsed = last_request.elapsed();
            if elapsed < self.spacing {
                let delay = self.spacing.saturating_sub(elapsed);
                let cumulative = state.add_cumulative_delay(delay);

                debug!(
                    host = %host,
                    delay_ms = delay.as_millis(),
                    cumulative_ms = cumulative.as_millis(),
                    "pacing request"
                );

                if cumulative >= CUMULATIVE_DELAY_WARNING_THRESHOLD {
                    warn!(
                        host = %host,
                        cumulative_delay_secs = cumulative.as_secs(),
                        "long cumulative pacing delay - consider setting NCBI_API_KEY for a higher rate limit"
                    );
                }

                tokio::time::sleep(delay).await;
            }
        } else {
            debug!(host = %host, "first request to host - no delay");
        }

        *last_request_guard = Some(Instant::now());
    }
}

/// Extracts the lowercased host from a URL, or `"unknown"` for malformed URLs.
///
/// ```
/// use pubmed_affiliations::entrez::pacer::extract_host;
///
/// assert_eq!(extract_host("https://EUtils.ncbi.nlm.nih.gov/x"), "eutils.ncbi.nlm.nih.gov");
/// assert_eq!(extract_host("http://127.0.0.1:8080/efetch.fcgi"), "127.0.0.1");
/// assert_eq!(extract_host("not a url"), "unknown");
/// ```
#[must_use]
pub fn extract_host(url: &str) -> String {
    url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_lowercase))
        .unwrap_or_else(|| "unknown".to_string())
}
