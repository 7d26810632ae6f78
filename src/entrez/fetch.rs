//! PubMed `efetch` record retrieval with bounded retries.
//!
//! [`RecordFetcher::fetch`] issues up to `max_attempts` GET requests for one
//! PMID. Transport errors, timeouts, 5xx responses and unparseable bodies are
//! retried after `initial_delay * (k + 1)`; any other HTTP status ends the
//! fetch at once. The caller only ever sees a document or `None`.

use std::sync::Arc;

use reqwest::Client;
use tracing::{debug, instrument, warn};
use url::Url;

use super::http_client::build_entrez_client;
use super::retry::{RetryDecision, RetryPolicy, classify_error};
use super::{FetchError, RequestPacer};
use crate::classify::RawRecordDocument;
use crate::config::EntrezConfig;

/// Fetches single PubMed records as parsed documents.
pub struct RecordFetcher {
    client: Client,
    efetch_url: String,
    api_key: Option<String>,
    policy: RetryPolicy,
    pacer: Arc<RequestPacer>,
}

impl std::fmt::Debug for RecordFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordFetcher")
            .field("efetch_url", &self.efetch_url)
            .field("has_api_key", &self.api_key.is_some())
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl RecordFetcher {
    /// Creates a fetcher from `config` (endpoint, API key, timeout, retry settings).
    ///
    /// The fetcher paces its own requests by `config.pacing_delay`; use
    /// [`with_pacer`](Self::with_pacer) to share one pacer with other clients.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::ClientBuild`] when HTTP client construction fails.
    pub fn new(config: &EntrezConfig) -> Result<Self, FetchError> {
        Ok(Self {
            client: build_entrez_client(config.request_timeout)?,
            efetch_url: config.endpoint("efetch.fcgi"),
            api_key: config.api_key.clone(),
            policy: RetryPolicy::new(config.max_retries, config.initial_delay),
            pacer: Arc::new(RequestPacer::new(config.pacing_delay)),
        })
    }

    /// Replaces the retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Shares a pacer with other request issuers.
    #[must_use]
    pub fn with_pacer(mut self, pacer: Arc<RequestPacer>) -> Self {
        self.pacer = pacer;
        self
    }

    /// Returns the active retry policy.
    #[must_use]
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Fetches one record; `None` means the record is unavailable.
    #[instrument(skip(self))]
    pub async fn fetch(&self, pmid: &str) -> Option<RawRecordDocument> {
        match self.try_fetch(pmid).await {
            Ok(document) => Some(document),
            Err(error) => {
                warn!(pmid, error = %error, "record unavailable");
                None
            }
        }
    }

    /// Like [`fetch`](Self::fetch) but returns the final error.
    ///
    /// # Errors
    ///
    /// Returns the last [`FetchError`] once the attempt budget is spent or a
    /// permanent failure is hit.
    pub async fn try_fetch(&self, pmid: &str) -> Result<RawRecordDocument, FetchError> {
        let (request_url, display_url) = self.record_urls(pmid)?;
        let mut attempt = 0;

        loop {
            debug!(pmid, attempt = attempt + 1, "fetching record");
            self.pacer.acquire(&display_url).await;

            let error = match self.attempt_once(&request_url, &display_url).await {
                Ok(document) => return Ok(document),
                Err(error) => error,
            };

            match self.policy.should_retry(classify_error(&error), attempt) {
                RetryDecision::Retry {
                    delay,
                    attempt: next,
                } => {
                    debug!(
                        pmid,
                        error = %error,
                        delay_ms = delay.as_millis(),
                        "attempt failed, backing off"
                    );
                    tokio::time::sleep(delay).await;
                    attempt = next;
                }
                RetryDecision::DoNotRetry { reason } => {
                    debug!(pmid, error = %error, %reason, "giving up on record");
                    return Err(error);
                }
            }
        }
    }

    async fn attempt_once(
        &self,
        request_url: &Url,
        display_url: &str,
    ) -> Result<RawRecordDocument, FetchError> {
        let response = self
            .client
            .get(request_url.clone())
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(display_url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::http_status(display_url, status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(display_url, e))?;

        RawRecordDocument::parse(&body).map_err(|e| FetchError::malformed(display_url, e.to_string()))
    }

    /// Request URL (with `api_key`) and display URL (without it).
    fn record_urls(&self, pmid: &str) -> Result<(Url, String), FetchError> {
        let display = Url::parse_with_params(
            &self.efetch_url,
            &[("db", "pubmed"), ("id", pmid), ("retmode", "xml")],
        )
        .map_err(|_| FetchError::invalid_url(&self.efetch_url))?;

        let mut request = display.clone();
        if let Some(key) = &self.api_key {
            request.query_pairs_mut().append_pair("api_key", key);
        }
        Ok((request, display.to_string()))
    }
}
