//! BDJobs crawler tests against a mock search endpoint

use jobsweep::config::{BdjobsConfig, HttpConfig, PacingConfig};
use jobsweep::crawler::BdjobsCrawler;
use jobsweep::{SearchRequest, SiteCrawler};
use std::collections::HashSet;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Creates a crawler pointed at the mock server, with no pauses or retries
fn create_test_crawler(base_url: &str, fetch_details: bool) -> BdjobsCrawler {
    let config = BdjobsConfig {
        base_url: base_url.to_string(),
        search_url: format!("{}/jobsearch.asp", base_url),
        pacing: PacingConfig {
            max_pages: 5,
            page_delay_base_ms: 0,
            page_delay_jitter_ms: 0,
        },
        fetch_details,
        detail_timeout_secs: 5,
        ..BdjobsConfig::default()
    };
    let http = HttpConfig {
        timeout_secs: 5,
        retries: 0,
        retry_delay_ms: 0,
        ..HttpConfig::default()
    };
    BdjobsCrawler::new(&config, &http).expect("Failed to build crawler")
}

fn card(id: usize) -> String {
    format!(
        r#"<div class="job-item">
            <a href="/jobdetails.asp?id={id}&ln=1">Job {id}</a>
            <span class="company">Company {id}</span>
            <span class="location">Motijheel, Dhaka</span>
        </div>"#
    )
}

fn page(ids: &[usize]) -> String {
    let cards: String = ids.iter().map(|id| card(*id)).collect();
    format!("<html><body>{}</body></html>", cards)
}

fn empty_page() -> String {
    "<html><body><p>Sorry, no jobs matched your criteria.</p></body></html>".to_string()
}

/// Serves search pages by the `pg` query parameter (absent means page 1)
struct PagedListings {
    pages: Vec<ResponseTemplate>,
}

impl PagedListings {
    fn page_number(request: &Request) -> usize {
        request
            .url
            .query_pairs()
            .find(|(key, _)| key == "pg")
            .and_then(|(_, value)| value.parse().ok())
            .unwrap_or(1)
    }
}

impl Respond for PagedListings {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let index = Self::page_number(request) - 1;
        self.pages
            .get(index)
            .cloned()
            .unwrap_or_else(|| ResponseTemplate::new(200).set_body_string(empty_page()))
    }
}

/// Every page holds two fresh listings, forever
struct EndlessListings;

impl Respond for EndlessListings {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let number = PagedListings::page_number(request);
        ResponseTemplate::new(200).set_body_string(page(&[number * 100, number * 100 + 1]))
    }
}

fn ok(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_string(body)
}

#[tokio::test]
async fn test_dhaka_search_sends_parameters_and_parses_postings() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/jobsearch.asp"))
        .and(query_param("hidJobSearch", "jobsearch"))
        .and(query_param("txtKeyword", "accountant"))
        .and(query_param("txtlocation", "Dhaka"))
        .respond_with(ok(page(&[1, 2, 3])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let crawler = create_test_crawler(&mock_server.uri(), false);
    let request = SearchRequest::new("accountant", "Dhaka", 3).unwrap();
    let postings = crawler.scrape(&request).await;

    assert_eq!(postings.len(), 3);
    let first = &postings[0];
    assert_eq!(first.id, "bdjobs-1");
    assert_eq!(first.title, "Job 1");
    assert_eq!(first.company_name.as_deref(), Some("Company 1"));
    assert_eq!(
        first.job_url,
        format!("{}/jobdetails.asp?id=1&ln=1", mock_server.uri())
    );
    assert_eq!(
        first.location.as_ref().and_then(|l| l.city.as_deref()),
        Some("Motijheel")
    );
}

#[tokio::test]
async fn test_location_outside_region_issues_no_fetch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ok(page(&[1])))
        .expect(0) // Should never be called
        .mount(&mock_server)
        .await;

    let crawler = create_test_crawler(&mock_server.uri(), false);
    let request = SearchRequest::new("engineer", "Paris", 10).unwrap();

    assert!(!crawler.applicable("Paris"));
    assert!(crawler.scrape(&request).await.is_empty());
}

#[tokio::test]
async fn test_duplicates_skipped_and_stops_within_first_page() {
    let mock_server = MockServer::start().await;

    // 15 candidates, ids 1, 2 and 3 appear twice
    let ids = [1, 2, 3, 1, 4, 5, 2, 6, 7, 3, 8, 9, 10, 11, 12];
    Mock::given(method("GET"))
        .and(path("/jobsearch.asp"))
        .respond_with(PagedListings {
            pages: vec![ok(page(&ids)), ok(page(&[20, 21]))],
        })
        .expect(1)
        .mount(&mock_server)
        .await;

    let crawler = create_test_crawler(&mock_server.uri(), false);
    let request = SearchRequest::new("sales", "Dhaka", 10).unwrap();
    let postings = crawler.scrape(&request).await;

    assert_eq!(postings.len(), 10);
    let unique: HashSet<&str> = postings.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(unique.len(), 10);
    let expected: Vec<String> = (1..=10).map(|n| format!("bdjobs-{}", n)).collect();
    let actual: Vec<String> = postings.iter().map(|p| p.id.clone()).collect();
    assert_eq!(actual, expected);
}

#[tokio::test]
async fn test_page_ceiling_limits_fetches() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/jobsearch.asp"))
        .respond_with(EndlessListings)
        .expect(5)
        .mount(&mock_server)
        .await;

    let crawler = create_test_crawler(&mock_server.uri(), false);
    let request = SearchRequest::new("driver", "Dhaka", 200).unwrap();
    let postings = crawler.scrape(&request).await;

    assert_eq!(postings.len(), 10);
}

#[tokio::test]
async fn test_non_200_stops_and_keeps_accumulated() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/jobsearch.asp"))
        .respond_with(PagedListings {
            pages: vec![
                ok(page(&[1, 2])),
                ResponseTemplate::new(503),
                ok(page(&[3, 4])),
            ],
        })
        .expect(2)
        .mount(&mock_server)
        .await;

    let crawler = create_test_crawler(&mock_server.uri(), false);
    let request = SearchRequest::new("clerk", "Sylhet", 10).unwrap();
    let postings = crawler.scrape(&request).await;

    assert_eq!(postings.len(), 2);
}

#[tokio::test]
async fn test_empty_page_ends_pagination() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/jobsearch.asp"))
        .respond_with(PagedListings {
            pages: vec![ok(page(&[1, 2])), ok(empty_page()), ok(page(&[3]))],
        })
        .expect(2)
        .mount(&mock_server)
        .await;

    let crawler = create_test_crawler(&mock_server.uri(), false);
    let request = SearchRequest::new("nurse", "Dhaka", 10).unwrap();
    let postings = crawler.scrape(&request).await;

    assert_eq!(postings.len(), 2);
}

#[tokio::test]
async fn test_connection_failure_returns_empty() {
    // Port 1 is never bound on a test machine
    let crawler = create_test_crawler("http://127.0.0.1:1", false);
    let request = SearchRequest::new("nurse", "Dhaka", 10).unwrap();

    assert!(crawler.scrape(&request).await.is_empty());
}

#[tokio::test]
async fn test_retryable_status_is_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/jobsearch.asp"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .with_priority(1)
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/jobsearch.asp"))
        .respond_with(ok(page(&[1, 2])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let base_url = mock_server.uri();
    let config = BdjobsConfig {
        base_url: base_url.clone(),
        search_url: format!("{}/jobsearch.asp", base_url),
        pacing: PacingConfig {
            max_pages: 1,
            page_delay_base_ms: 0,
            page_delay_jitter_ms: 0,
        },
        ..BdjobsConfig::default()
    };
    let http = HttpConfig {
        timeout_secs: 5,
        retries: 1,
        retry_delay_ms: 0,
        ..HttpConfig::default()
    };
    let crawler = BdjobsCrawler::new(&config, &http).expect("Failed to build crawler");

    let request = SearchRequest::new("clerk", "Dhaka", 5).unwrap();
    assert_eq!(crawler.scrape(&request).await.len(), 2);
}

#[tokio::test]
async fn test_detail_pages_enrich_postings() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/jobsearch.asp"))
        .respond_with(ok(page(&[1])))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/jobdetails.asp"))
        .and(query_param("id", "1"))
        .respond_with(ok(r#"<html><body>
            <div class="job-description">Maintain the ledger and prepare VAT returns.</div>
            <p>Salary: Tk. 35,000 - 50,000 (Monthly)</p>
        </body></html>"#
            .to_string()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let crawler = create_test_crawler(&mock_server.uri(), true);
    let request = SearchRequest::new("accountant", "Dhaka", 1).unwrap();
    let postings = crawler.scrape(&request).await;

    assert_eq!(postings.len(), 1);
    let posting = &postings[0];
    assert_eq!(
        posting.description.as_deref(),
        Some("Maintain the ledger and prepare VAT returns.")
    );
    assert_eq!(posting.min_amount, Some(35000.0));
    assert_eq!(posting.max_amount, Some(50000.0));
    assert_eq!(posting.currency.as_deref(), Some("BDT"));
    assert_eq!(posting.interval.as_deref(), Some("monthly"));
}

#[tokio::test]
async fn test_offset_skips_postings_of_earlier_rounds() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/jobsearch.asp"))
        .respond_with(PagedListings {
            pages: vec![ok(page(&[1, 2, 3, 4])), ok(page(&[5, 6, 7, 8]))],
        })
        .expect(2)
        .mount(&mock_server)
        .await;

    let crawler = create_test_crawler(&mock_server.uri(), false);
    let request = SearchRequest::new("clerk", "Dhaka", 3)
        .unwrap()
        .with_offset(3);
    let postings = crawler.scrape(&request).await;

    let ids: Vec<&str> = postings.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["bdjobs-4", "bdjobs-5", "bdjobs-6"]);
}
