//! PubMed `esearch` listing call.
//!
//! Turns a free-text query into an ordered list of PMIDs. Any failure yields
//! an empty list; callers treat "nothing found" and "search failed" alike.
//!
//! Every listing call waits the full pacing delay before it is sent, even
//! when it is the first request of a run.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument, warn};
use url::Url;

use super::http_client::build_entrez_client;
use super::{FetchError, RequestPacer};
use crate::config::EntrezConfig;

/// `esearch.fcgi` JSON envelope.
#[derive(Debug, Deserialize)]
struct EsearchResponse {
    esearchresult: Option<EsearchResult>,
}

#[derive(Debug, Deserialize)]
struct EsearchResult {
    #[serde(default)]
    idlist: Vec<String>,
}

/// Client for the `esearch` listing endpoint.
pub struct SearchClient {
    client: Client,
    esearch_url: String,
    api_key: Option<String>,
    listing_delay: Duration,
    pacer: Arc<RequestPacer>,
}

impl std::fmt::Debug for SearchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchClient")
            .field("esearch_url", &self.esearch_url)
            .field("has_api_key", &self.api_key.is_some())
            .field("listing_delay", &self.listing_delay)
            .finish_non_exhaustive()
    }
}

impl SearchClient {
    /// Creates a search client with its own pacer built from `config.pacing_delay`.
    ///
    /// The same delay is slept unconditionally before each listing call.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::ClientBuild`] when HTTP client construction fails.
    pub fn new(config: &EntrezConfig) -> Result<Self, FetchError> {
        Ok(Self {
            client: build_entrez_client(config.request_timeout)?,
            esearch_url: config.endpoint("esearch.fcgi"),
            api_key: config.api_key.clone(),
            listing_delay: config.pacing_delay,
            pacer: Arc::new(RequestPacer::new(config.pacing_delay)),
        })
    }

    /// Shares an existing pacer (so search and fetch traffic are paced together).
    #[must_use]
    pub fn with_pacer(mut self, pacer: Arc<RequestPacer>) -> Self {
        self.pacer = pacer;
        self
    }

    /// Returns PMIDs matching `query`, or an empty list on any failure.
    #[instrument(skip(self))]
    pub async fn search_ids(&self, query: &str, max_results: usize) -> Vec<String> {
        match self.try_search_ids(query, max_results).await {
            Ok(ids) => {
                debug!(count = ids.len(), "esearch returned PMIDs");
                ids
            }
            Err(error) => {
                warn!(error = %error, "esearch failed; treating as no results");
                Vec::new()
            }
        }
    }

    /// Like [`search_ids`](Self::search_ids) but surfaces the failure.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] for transport failures, non-2xx statuses, and
    /// bodies that are not an `esearch` JSON envelope.
    pub async fn try_search_ids(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<String>, FetchError> {
        let display_url = self.search_url(query, max_results)?;
        let mut request_url = display_url.clone();
        if let Some(key) = &self.api_key {
            request_url.query_pairs_mut().append_pair("api_key", key);
        }
        let display_url = display_url.to_string();

        debug!(url = %display_url, "esearch request");
        self.wait_before_listing().await;
        self.pacer.acquire(&display_url).await;

        let response = self
            .client
            .get(request_url)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(&display_url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::http_status(&display_url, status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(&display_url, e))?;
        let parsed: EsearchResponse = serde_json::from_str(&body)
            .map_err(|e| FetchError::malformed(&display_url, e.to_string()))?;

        Ok(parsed
            .esearchresult
            .map(|result| result.idlist)
            .unwrap_or_default())
    }

    async fn wait_before_listing(&self) {
        if !self.listing_delay.is_zero() {
            debug!(delay_ms = self.listing_delay.as_millis(), "pacing before esearch");
            tokio::time::sleep(self.listing_delay).await;
        }
    }

    fn search_url(&self, query: &str, max_results: usize) -> Result<Url, FetchError> {
        let retmax = max_results.to_string();
        Url::parse_with_params(
            &self.esearch_url,
            &[
                ("db", "pubmed"),
                ("term", query),
                ("retmax", retmax.as_str()),
                ("retmode", "json"),
            ],
        )
        .map_err(|_| FetchError::invalid_url(&self.esearch_url))
    }
}
