//! Canned E-utilities payloads and test configuration.

use std::time::Duration;

use pubmed_affiliations::EntrezConfig;

/// Config pointed at a mock server with short, test-friendly delays.
pub fn mock_config(base_url: &str) -> EntrezConfig {
    EntrezConfig {
        pacing_delay: Duration::ZERO,
        initial_delay: Duration::from_millis(20),
        request_timeout: Duration::from_secs(5),
        ..EntrezConfig::default().with_base_url(base_url)
    }
}

/// `esearch` JSON envelope listing `ids`.
pub fn esearch_json(ids: &[&str]) -> String {
    let quoted: Vec<String> = ids.iter().map(|id| format!("\"{id}\"")).collect();
    format!(
        r#"{{"header":{{"type":"esearch","version":"0.3"}},"esearchresult":{{"count":"{}","retmax":"{}","retstart":"0","idlist":[{}]}}}}"#,
        ids.len(),
        ids.len(),
        quoted.join(",")
    )
}

/// A record with one academic author and two industry authors (one corresponding).
pub fn industry_article_xml(pmid: &str) -> String {
    format!(
        r#"<?xml version="1.0" ?>
<!DOCTYPE PubmedArticleSet PUBLIC "-//NLM//DTD PubMedArticle, 1st January 2024//EN" "https://dtd.nlm.nih.gov/ncbi/pubmed/out/pubmed_240101.dtd">
<PubmedArticleSet>
  <PubmedArticle>
    <MedlineCitation Status="MEDLINE" Owner="NLM">
      <PMID Version="1">{pmid}</PMID>
      <Article PubModel="Print-Electronic">
        <Journal>
          <JournalIssue CitedMedium="Internet">
            <Volume>12</Volume>
            <PubDate>
              <Year>2024</Year>
              <Month>Mar</Month>
            </PubDate>
          </JournalIssue>
        </Journal>
        <ArticleTitle>KRAS <i>G12C</i> inhibitors in solid tumours.</ArticleTitle>
        <AuthorList CompleteYN="Y">
          <Author ValidYN="Y">
            <LastName>Smith</LastName>
            <ForeName>Alice</ForeName>
            <AffiliationInfo>
              <Affiliation>Department of Oncology, Harvard Medical School, Boston, MA, USA.</Affiliation>
            </AffiliationInfo>
          </Author>
          <Author ValidYN="Y">
            <LastName>Doe</LastName>
            <ForeName>Jane</ForeName>
            <AffiliationInfo>
              <Affiliation>Amgen Inc., Thousand Oaks, CA</Affiliation>
            </AffiliationInfo>
            <Email>jane.doe@amgen.com</Email>
          </Author>
          <Author ValidYN="N">
            <LastName>Roe</LastName>
            <ForeName>John</ForeName>
            <AffiliationInfo>
              <Affiliation>Amgen Inc., Thousand Oaks, CA</Affiliation>
            </AffiliationInfo>
            <Email>ignored@amgen.com</Email>
          </Author>
        </AuthorList>
      </Article>
    </MedlineCitation>
  </PubmedArticle>
</PubmedArticleSet>
"#
    )
}

/// A record whose authors are all academic.
pub fn academic_article_xml(pmid: &str) -> String {
    format!(
        r#"<?xml version="1.0" ?>
<PubmedArticleSet>
  <PubmedArticle>
    <MedlineCitation>
      <PMID Version="1">{pmid}</PMID>
      <Article>
        <Journal><JournalIssue><PubDate><Year>2023</Year><Month>Jan</Month><Day>05</Day></PubDate></JournalIssue></Journal>
        <ArticleTitle>Tumour microenvironment atlas.</ArticleTitle>
        <AuthorList>
          <Author ValidYN="Y">
            <LastName>Lee</LastName>
            <ForeName>Min</ForeName>
            <AffiliationInfo><Affiliation>Seoul National University, Seoul, Korea.</Affiliation></AffiliationInfo>
          </Author>
        </AuthorList>
      </Article>
    </MedlineCitation>
  </PubmedArticle>
</PubmedArticleSet>
"#
    )
}
