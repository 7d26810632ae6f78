//! Integration tests for the search → fetch → classify pipeline.

use pubmed_affiliations::{PaperPipeline, PipelineError, RunStats};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

mod support;
use support::fixtures::{academic_article_xml, esearch_json, industry_article_xml, mock_config};
use support::socket_guard::start_mock_server_or_skip;

macro_rules! require_mock_server {
    () => {{
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        mock_server
    }};
}

async fn mount_record(server: &wiremock::MockServer, pmid: &str, status: u16, body: String) {
    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .and(query_param("id", pmid))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_run_keeps_only_qualifying_records_in_order() {
    let mock_server = require_mock_server!();
    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(esearch_json(&["3", "1", "2", "4"])),
        )
        .mount(&mock_server)
        .await;
    mount_record(&mock_server, "3", 200, industry_article_xml("3")).await;
    mount_record(&mock_server, "1", 200, academic_article_xml("1")).await;
    mount_record(&mock_server, "2", 200, industry_article_xml("2")).await;
    mount_record(&mock_server, "4", 404, String::new()).await;

    for concurrency in [1, 4] {
        let pipeline = PaperPipeline::new(&mock_config(&mock_server.uri()), concurrency).unwrap();
        let stats = RunStats::new();
        let (ids, rows) = pipeline.run("kras", 10, &stats).await;

        assert_eq!(ids, vec!["3", "1", "2", "4"]);
        let row_ids: Vec<&str> = rows.iter().map(|row| row.pubmed_id.as_str()).collect();
        assert_eq!(row_ids, vec!["3", "2"], "concurrency {concurrency}");
        assert_eq!(stats.fetched(), 3);
        assert_eq!(stats.unavailable(), 1);
        assert_eq!(stats.qualifying(), 2);
        assert_eq!(stats.skipped(), 1);
    }
}

#[tokio::test]
async fn test_run_with_no_search_hits_skips_fetching() {
    let mock_server = require_mock_server!();
    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .respond_with(ResponseTemplate::new(200).set_body_string(esearch_json(&[])))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let pipeline = PaperPipeline::new(&mock_config(&mock_server.uri()), 1).unwrap();
    let stats = RunStats::new();
    let (ids, rows) = pipeline.run("nothing matches this", 10, &stats).await;

    assert!(ids.is_empty());
    assert!(rows.is_empty());
    assert_eq!(stats.processed(), 0);
}

#[test]
fn test_pipeline_rejects_out_of_range_concurrency() {
    let config = mock_config("http://127.0.0.1:9");
    assert!(matches!(
        PaperPipeline::new(&config, 11),
        Err(PipelineError::InvalidConcurrency { value: 11, .. })
    ));
}
