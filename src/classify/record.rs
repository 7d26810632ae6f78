//! Record-level classification: one `PubmedArticle` in, one report row (or nothing) out.

use std::collections::HashSet;

use tracing::{debug, instrument};

use super::document::{RawRecordDocument, XmlElement, get_or_default, get_text};
use super::keywords::classify_affiliation;
use crate::report::ReportRow;

/// Placeholder for fields that are absent from the record.
pub const NOT_AVAILABLE: &str = "N/A";

/// Placeholder for a missing year, month, or day.
const UNKNOWN_DATE_PART: &str = "?";

/// Separator used when joining authors and affiliations.
const LIST_SEPARATOR: &str = "; ";

/// Classifies a record and builds its report row.
///
/// Returns `None` when no author has an industry affiliation; this is the
/// normal outcome for most records, not an error. The function is pure:
/// the same document always yields the same result.
#[must_use]
#[instrument(skip(document), fields(pmid = %pubmed_id))]
pub fn classify(document: &RawRecordDocument, pubmed_id: &str) -> Option<ReportRow> {
    let article = document.article();

    let title = get_or_default(article, ".//ArticleTitle", NOT_AVAILABLE);
    let publication_date = extract_publication_date(article);

    let mut non_academic_authors: Vec<String> = Vec::new();
    let mut company_affiliations: Vec<String> = Vec::new();
    let mut seen_affiliations: HashSet<String> = HashSet::new();
    let mut corresponding_email: Option<String> = None;

    for author in article.descendants("Author") {
        let display_name = author_display_name(author);

        for affiliation in author.descendants("Affiliation") {
            let raw = affiliation.text();
            if raw.trim().is_empty() {
                continue;
            }
            if !classify_affiliation(&raw).is_industry {
                continue;
            }
            let Some(name) = &display_name else {
                continue;
            };

            non_academic_authors.push(name.clone());
            if seen_affiliations.insert(raw.clone()) {
                company_affiliations.push(raw);
            }
        }

        if let Some(email) = corresponding_author_email(author) {
            corresponding_email = Some(email);
        }
    }

    if company_affiliations.is_empty() {
        debug!("no company affiliations found");
        return None;
    }

    debug!(
        authors = non_academic_authors.len(),
        affiliations = company_affiliations.len(),
        "record qualifies"
    );

    Some(ReportRow {
        pubmed_id: pubmed_id.to_string(),
        title,
        publication_date,
        non_academic_authors: non_academic_authors.join(LIST_SEPARATOR),
        company_affiliations: company_affiliations.join(LIST_SEPARATOR),
        corresponding_email: corresponding_email.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
    })
}

/// `YEAR-MONTH-DAY` from the first `PubDate`, with `?` for missing parts.
///
/// Returns `N/A` when there is no `PubDate` at all.
#[must_use]
pub fn extract_publication_date(article: &XmlElement) -> String {
    let Some(pub_date) = article.lookup(".//PubDate") else {
        return NOT_AVAILABLE.to_string();
    };

    let year = get_or_default(pub_date, "Year", UNKNOWN_DATE_PART);
    let month = get_or_default(pub_date, "Month", UNKNOWN_DATE_PART);
    let day = get_or_default(pub_date, "Day", UNKNOWN_DATE_PART);
    format!("{year}-{month}-{day}")
}

/// `"ForeName LastName"`, or `None` unless both halves are present.
#[must_use]
pub fn author_display_name(author: &XmlElement) -> Option<String> {
    let fore_name = get_text(author, "ForeName")?;
    let last_name = get_text(author, "LastName")?;
    Some(format!("{fore_name} {last_name}").trim().to_string())
}

/// Email of an author flagged `ValidYN="Y"`, if the author carries one.
#[must_use]
pub fn corresponding_author_email(author: &XmlElement) -> Option<String> {
    if author.attribute("ValidYN") != Some("Y") {
        return None;
    }
    get_text(author, ".//Email")
}
