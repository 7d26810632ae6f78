//! Record parsing and academic/industry classification.
//!
//! - [`RawRecordDocument`] - one `PubmedArticle` parsed from efetch XML
//! - [`classify_affiliation`] - keyword engine for a single affiliation string
//! - [`classify`] - full record scan producing a [`ReportRow`](crate::ReportRow) or nothing
//!
//! # Example
//!
//! ```
//! use pubmed_affiliations::{RawRecordDocument, classify};
//!
//! let xml = r#"<PubmedArticleSet><PubmedArticle><Article>
//!   <ArticleTitle>KRAS inhibitors</ArticleTitle>
//!   <AuthorList>
//!     <Author ValidYN="Y">
//!       <LastName>Doe</LastName><ForeName>Jane</ForeName>
//!       <AffiliationInfo><Affiliation>Amgen Inc., Thousand Oaks, CA</Affiliation></AffiliationInfo>
//!     </Author>
//!   </AuthorList>
//! </Article></PubmedArticle></PubmedArticleSet>"#;
//!
//! let document = RawRecordDocument::parse(xml).unwrap();
//! let row = classify(&document, "12345").unwrap();
//! assert_eq!(row.non_academic_authors, "Jane Doe");
//! assert_eq!(row.company_affiliations, "Amgen Inc., Thousand Oaks, CA");
//! ```

pub mod document;
pub mod keywords;
mod record;

pub use document::{DocumentError, RawRecordDocument, XmlElement, get_or_default};
pub use keywords::{AffiliationClassification, classify_affiliation};
pub use record::{
    NOT_AVAILABLE, author_display_name, classify, corresponding_author_email,
    extract_publication_date,
};
