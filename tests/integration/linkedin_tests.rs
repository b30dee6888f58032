//! LinkedIn guest search crawler tests against a mock endpoint

use jobsweep::config::{HttpConfig, LinkedinConfig, PacingConfig};
use jobsweep::crawler::LinkedinCrawler;
use jobsweep::{Country, LocationClassifier, SearchRequest, SiteCrawler};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

const PAGE_SIZE: u32 = 3;

fn create_test_crawler(base_url: &str, max_pages: u32) -> LinkedinCrawler {
    let config = LinkedinConfig {
        search_url: format!("{}/jobs-guest/search", base_url),
        pacing: PacingConfig {
            max_pages,
            page_delay_base_ms: 0,
            page_delay_jitter_ms: 0,
        },
        page_size: PAGE_SIZE,
    };
    let http = HttpConfig {
        timeout_secs: 5,
        retries: 0,
        retry_delay_ms: 0,
        ..HttpConfig::default()
    };
    LinkedinCrawler::new(&config, &http, LocationClassifier::new(Country::Usa))
        .expect("Failed to build crawler")
}

fn card(id: u32) -> String {
    format!(
        r#"<li><div class="base-card base-search-card" data-entity-urn="urn:li:jobPosting:{id}">
            <a class="base-card__full-link" href="https://www.linkedin.com/jobs/view/backend-developer-{id}?trk=guest"></a>
            <h3 class="base-search-card__title">Backend Developer {id}</h3>
            <h4 class="base-search-card__subtitle">Initech</h4>
            <span class="job-search-card__location">Denver, CO</span>
        </div></li>"#
    )
}

/// Serves `PAGE_SIZE` cards per `start` offset up to `total` cards
struct OffsetPages {
    total: u32,
}

impl Respond for OffsetPages {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let start: u32 = request
            .url
            .query_pairs()
            .find(|(key, _)| key == "start")
            .and_then(|(_, value)| value.parse().ok())
            .unwrap_or(0);

        let body: String = (start..(start + PAGE_SIZE).min(self.total))
            .map(|n| card(1000 + n))
            .collect();
        ResponseTemplate::new(200).set_body_string(body)
    }
}

#[tokio::test]
async fn test_pages_through_offsets_until_results_exhausted() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/jobs-guest/search"))
        .and(query_param("keywords", "backend"))
        .and(query_param("location", "Denver"))
        .respond_with(OffsetPages { total: 7 })
        .expect(4) // three pages with cards, one empty page
        .mount(&mock_server)
        .await;

    let crawler = create_test_crawler(&mock_server.uri(), 10);
    let request = SearchRequest::new("backend", "Denver", 20).unwrap();
    let postings = crawler.scrape(&request).await;

    assert_eq!(postings.len(), 7);
    assert_eq!(postings[0].id, "linkedin-1000");
    assert_eq!(postings[6].id, "linkedin-1006");
    assert_eq!(
        postings[0].job_url,
        "https://www.linkedin.com/jobs/view/backend-developer-1000"
    );
    assert_eq!(postings[0].company_name.as_deref(), Some("Initech"));
}

#[tokio::test]
async fn test_stops_once_enough_postings() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/jobs-guest/search"))
        .respond_with(OffsetPages { total: 100 })
        .expect(2)
        .mount(&mock_server)
        .await;

    let crawler = create_test_crawler(&mock_server.uri(), 10);
    let request = SearchRequest::new("backend", "Denver", 5).unwrap();

    assert_eq!(crawler.scrape(&request).await.len(), 5);
}

#[tokio::test]
async fn test_remote_and_recency_filters_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/jobs-guest/search"))
        .and(query_param("f_WT", "2"))
        .and(query_param("f_TPR", "r172800"))
        .respond_with(OffsetPages { total: 2 })
        .expect(2)
        .mount(&mock_server)
        .await;

    let crawler = create_test_crawler(&mock_server.uri(), 10);
    let request = SearchRequest::new("backend", "Denver", 10)
        .unwrap()
        .with_hours_old(Some(48))
        .with_remote(Some(true));
    let postings = crawler.scrape(&request).await;

    assert_eq!(postings.len(), 2);
    assert!(postings.iter().all(|p| p.is_remote == Some(true)));
}

#[tokio::test]
async fn test_blocked_response_yields_nothing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/jobs-guest/search"))
        .respond_with(ResponseTemplate::new(429))
        .expect(1)
        .mount(&mock_server)
        .await;

    let crawler = create_test_crawler(&mock_server.uri(), 10);
    let request = SearchRequest::new("backend", "Denver", 10).unwrap();

    assert!(crawler.scrape(&request).await.is_empty());
}
