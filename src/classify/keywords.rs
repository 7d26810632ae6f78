//! Keyword heuristics for academic vs. industry affiliations.
//!
//! Matching is plain substring containment on the lowercased affiliation, with
//! no word-boundary anchoring. Short tokens such as `inc` or `corp` therefore
//! match inside unrelated words ("Incorporated Research Institutions",
//! "corpus"), and `gov.` matches anywhere. Academic matches always win.

use tracing::trace;

/// Substrings that mark an affiliation as academic (or public-sector).
pub const ACADEMIC_KEYWORDS: &[&str] = &[
    "university",
    "college",
    "institute",
    "hospital",
    "school",
    "academy",
    "center",
    "centre",
    "clinic",
    "medical center",
    "universität",
    "université",
    "universidad",
    "research center",
    "nih.gov",
    "inserm",
    "cnrs",
];

/// Domain fragments that mark an affiliation as academic wherever they occur.
pub const ACADEMIC_DOMAIN_MARKERS: &[&str] = &[".edu", ".ac.", "gov."];

/// Substrings that mark an affiliation as commercial.
pub const INDUSTRY_KEYWORDS: &[&str] = &[
    "pharma",
    "biotech",
    "inc",
    "ltd",
    "corp",
    "llc",
    "therapeutics",
    "genetics",
    "vaccin",
    "bioscience",
    "laboratories",
    "healthcare",
    "pharmaceut",
    "biolog",
    "oncology",
    "company",
    "holdings",
    "ventures",
    "gmbh",
];

/// Result of classifying one affiliation string.
///
/// `is_industry` implies `!is_academic`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AffiliationClassification {
    /// Any academic keyword or domain marker matched.
    pub is_academic: bool,
    /// No academic match, and an industry keyword matched.
    pub is_industry: bool,
}

/// Classifies an affiliation string as academic and/or industry.
///
/// ```
/// use pubmed_affiliations::classify_affiliation;
///
/// let c = classify_affiliation("Genentech Inc., South San Francisco, CA");
/// assert!(c.is_industry && !c.is_academic);
///
/// let c = classify_affiliation("University Biotech Ventures");
/// assert!(c.is_academic && !c.is_industry);
/// ```
#[must_use]
pub fn classify_affiliation(affiliation: &str) -> AffiliationClassification {
    let text = affiliation.to_lowercase();

    let is_academic = contains_any(&text, ACADEMIC_KEYWORDS)
        || contains_any(&text, ACADEMIC_DOMAIN_MARKERS);
    let is_industry = !is_academic && contains_any(&text, INDUSTRY_KEYWORDS);

    trace!(affiliation, is_academic, is_industry, "classified affiliation");
    AffiliationClassification {
        is_academic,
        is_industry,
    }
}

fn contains_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| text.contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pharma_company_is_industry() {
        let c = classify_affiliation("Pfizer Pharmaceuticals, New York, NY, USA.");
        assert!(!c.is_academic);
        assert!(c.is_industry);
    }

    #[test]
    fn test_university_is_academic() {
        let c = classify_affiliation("Department of Biology, Stanford University, CA.");
        assert!(c.is_academic);
        assert!(!c.is_industry);
    }

    #[test]
    fn test_academic_keyword_takes_precedence() {
        let c = classify_affiliation("University Biotech Ventures");
        assert_eq!(
            c,
            AffiliationClassification {
                is_academic: true,
                is_industry: false
            }
        );
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        assert!(classify_affiliation("MODERNA THERAPEUTICS").is_industry);
        assert!(classify_affiliation("HARVARD MEDICAL SCHOOL").is_academic);
    }

    #[test]
    fn test_non_english_university_variants() {
        assert!(classify_affiliation("Universität Heidelberg").is_academic);
        assert!(classify_affiliation("Université de Montréal").is_academic);
        assert!(classify_affiliation("Universidad de Chile").is_academic);
    }

    #[test]
    fn test_research_agencies_are_academic() {
        assert!(classify_affiliation("INSERM U1016, Paris").is_academic);
        assert!(classify_affiliation("CNRS UMR 5535").is_academic);
        assert!(classify_affiliation("contact: someone@nih.gov").is_academic);
    }

    #[test]
    fn test_domain_markers_match_anywhere() {
        assert!(classify_affiliation("jdoe@mit.edu").is_academic);
        assert!(classify_affiliation("Dept. of Genetics, ox.ac.uk").is_academic);
        // "gov." is not anchored, so it fires inside unrelated text too.
        assert!(classify_affiliation("Biotech Ltd, gov.example").is_academic);
    }

    #[test]
    fn test_short_industry_tokens_match_inside_words() {
        // "inc" inside "province" is an accepted false positive.
        let c = classify_affiliation("Bureau of Agriculture, Province of Ontario");
        assert!(c.is_industry);
    }

    #[test]
    fn test_neither_academic_nor_industry() {
        let c = classify_affiliation("Independent Consultant, Berlin");
        assert_eq!(c, AffiliationClassification::default());
    }

    #[test]
    fn test_gmbh_and_llc_are_industry() {
        assert!(classify_affiliation("Boehringer Ingelheim Pharma GmbH & Co. KG").is_industry);
        assert!(classify_affiliation("Acme Discovery LLC").is_industry);
    }

    #[test]
    fn test_empty_string_is_unclassified() {
        assert_eq!(classify_affiliation(""), AffiliationClassification::default());
    }
}
