//! Shared User-Agent string for E-utilities traffic.
//!
//! NCBI asks automated clients to identify themselves; every request made by
//! this crate carries the same UA so search and fetch traffic stay consistent.

/// Default User-Agent for E-utilities requests (identifies the tool and version).
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("pubmed-affiliations/{version} (literature-research-tool)")
}
