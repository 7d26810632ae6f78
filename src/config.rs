//! Runtime configuration for E-utilities access.
//!
//! [`EntrezConfig`] is assembled once (from defaults, the process environment,
//! and CLI overrides) and then handed to [`SearchClient`](crate::SearchClient)
//! and [`RecordFetcher`](crate::RecordFetcher) at construction time. Nothing in
//! the library reads the environment after that point.

use std::time::Duration;

use tracing::debug;

/// Default E-utilities base URL (no trailing slash).
pub const DEFAULT_BASE_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";

/// Environment variable holding the optional NCBI API key.
pub const API_KEY_ENV: &str = "NCBI_API_KEY";

/// Environment variable overriding the E-utilities base URL.
pub const BASE_URL_ENV: &str = "PUBMED_EUTILS_BASE_URL";

/// Per-request timeout for both search and fetch calls (10 seconds).
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Default spacing between requests to E-utilities (NCBI allows ~3 req/s without a key).
pub const DEFAULT_PACING_MS: u64 = 340;

/// Default delay unit for fetch retries.
pub const DEFAULT_INITIAL_DELAY_MS: u64 = 1000;

/// Settings shared by the search client and the record fetcher.
#[derive(Clone)]
pub struct EntrezConfig {
    /// Base URL for `esearch.fcgi` / `efetch.fcgi`.
    pub base_url: String,
    /// Optional NCBI API key appended as `api_key`.
    pub api_key: Option<String>,
    /// Timeout applied to every request.
    pub request_timeout: Duration,
    /// Minimum spacing between requests to the E-utilities host.
    pub pacing_delay: Duration,
    /// Attempt budget for a single record fetch.
    pub max_retries: u32,
    /// Backoff unit; attempt `k` waits `initial_delay * (k + 1)`.
    pub initial_delay: Duration,
}

impl Default for EntrezConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            pacing_delay: Duration::from_millis(DEFAULT_PACING_MS),
            max_retries: crate::entrez::DEFAULT_MAX_RETRIES,
            initial_delay: Duration::from_millis(DEFAULT_INITIAL_DELAY_MS),
        }
    }
}

impl std::fmt::Debug for EntrezConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntrezConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("request_timeout", &self.request_timeout)
            .field("pacing_delay", &self.pacing_delay)
            .field("max_retries", &self.max_retries)
            .field("initial_delay", &self.initial_delay)
            .finish()
    }
}

impl EntrezConfig {
    /// Builds a config from defaults plus `NCBI_API_KEY` and `PUBMED_EUTILS_BASE_URL`.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a config using an arbitrary variable lookup (used by tests).
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let config = Self {
            base_url: non_empty(BASE_URL_ENV).unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_key: non_empty(API_KEY_ENV),
            ..Self::default()
        };
        debug!(
            base_url = %config.base_url,
            has_api_key = config.api_key.is_some(),
            "loaded entrez configuration"
        );
        config
    }

    /// Replaces the base URL (wiremock tests point this at a mock server).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Returns `{base_url}/{endpoint}` with exactly one slash between them.
    #[must_use]
    pub fn endpoint(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), endpoint)
    }
}
