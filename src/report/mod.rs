//! Report rows and their CSV / console renderings.

use std::io::Write;

use serde::Serialize;
use thiserror::Error;

/// Column headers, in output order.
pub const CSV_HEADERS: [&str; 6] = [
    "PubmedID",
    "Title",
    "Publication Date",
    "Non-academic Author(s)",
    "Company Affiliation(s)",
    "Corresponding Author Email",
];

/// Width of the `=` rule printed before each row on the console.
const SEPARATOR_WIDTH: usize = 60;

/// One qualifying paper.
///
/// Every field is a plain string; absent values are already `"N/A"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    #[serde(rename = "PubmedID")]
    pub pubmed_id: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Publication Date")]
    pub publication_date: String,
    /// `"; "`-joined display names, duplicates kept.
    #[serde(rename = "Non-academic Author(s)")]
    pub non_academic_authors: String,
    /// `"; "`-joined unique affiliation strings, first-seen order.
    #[serde(rename = "Company Affiliation(s)")]
    pub company_affiliations: String,
    #[serde(rename = "Corresponding Author Email")]
    pub corresponding_email: String,
}

impl ReportRow {
    /// Field values in [`CSV_HEADERS`] order.
    #[must_use]
    pub fn fields(&self) -> [&str; 6] {
        [
            self.pubmed_id.as_str(),
            self.title.as_str(),
            self.publication_date.as_str(),
            self.non_academic_authors.as_str(),
            self.company_affiliations.as_str(),
            self.corresponding_email.as_str(),
        ]
    }
}

/// Errors from writing a report.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("CSV encoding failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("report write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Writes a header line followed by one CSV record per row.
///
/// The header is always written, even for an empty slice.
///
/// # Errors
///
/// Returns [`ReportError`] if serialization or the underlying writer fails.
pub fn write_csv<W: Write>(writer: W, rows: &[ReportRow]) -> Result<(), ReportError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv_writer.write_record(CSV_HEADERS)?;
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Renders rows as `Field: value` blocks, each preceded by a blank line and a rule.
#[must_use]
pub fn render_console(rows: &[ReportRow]) -> String {
    let rule = "=".repeat(SEPARATOR_WIDTH);
    rows.iter()
        .map(|row| {
            let fields: String = CSV_HEADERS
                .iter()
                .zip(row.fields())
                .map(|(header, value)| format!("{header}: {value}\n"))
                .collect();
            format!("\n{rule}\n{fields}")
        })
        .collect()
}
