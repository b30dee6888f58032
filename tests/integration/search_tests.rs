//! Engine-level tests: site selection, recency, backfill and fan-out,
//! driven through recording crawlers instead of real boards

use async_trait::async_trait;
use jobsweep::config::{Config, HttpConfig, LinkedinConfig, PacingConfig};
use jobsweep::crawler::LinkedinCrawler;
use jobsweep::{
    Country, JobPosting, JobSearch, LocationClassifier, SearchRequest, Site, SiteCrawler,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// What one `scrape` call was asked for
#[derive(Debug, Clone, PartialEq)]
struct Call {
    results_wanted: usize,
    offset: usize,
    hours_old: Option<u32>,
}

/// Crawler over a fixed ranking that records its calls; it returns the
/// `results_wanted` postings after `offset`, every fifth one remote
struct RecordingCrawler {
    site: Site,
    region: Option<Country>,
    delay: Duration,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl RecordingCrawler {
    fn new(site: Site, region: Option<Country>) -> (Self, Arc<Mutex<Vec<Call>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let crawler = Self {
            site,
            region,
            delay: Duration::ZERO,
            calls: Arc::clone(&calls),
        };
        (crawler, calls)
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl SiteCrawler for RecordingCrawler {
    fn site(&self) -> Site {
        self.site
    }

    fn region(&self) -> Option<Country> {
        self.region
    }

    async fn scrape(&self, request: &SearchRequest) -> Vec<JobPosting> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        self.calls.lock().unwrap().push(Call {
            results_wanted: request.results_wanted(),
            offset: request.offset(),
            hours_old: request.hours_old(),
        });

        let start = request.offset();
        (start..start + request.results_wanted())
            .map(|n| {
                let mut posting = JobPosting::new(
                    format!("{}-{}", self.site, n),
                    format!("Job {}", n),
                    format!("https://{}.example/jobs/{}", self.site, n),
                    self.site,
                );
                posting.is_remote = Some(n % 5 == 0);
                posting
            })
            .collect()
    }
}

fn engine(crawlers: Vec<Box<dyn SiteCrawler>>) -> JobSearch {
    JobSearch::with_crawlers(Config::default(), crawlers).expect("Failed to build engine")
}

fn sizes(calls: &Arc<Mutex<Vec<Call>>>) -> Vec<usize> {
    calls
        .lock()
        .unwrap()
        .iter()
        .map(|call| call.results_wanted)
        .collect()
}

#[tokio::test]
async fn test_remote_filter_backfills_once() {
    let (linkedin, calls) = RecordingCrawler::new(Site::Linkedin, None);
    let engine = engine(vec![Box::new(linkedin)]);

    let request = SearchRequest::new("developer", "Austin", 5)
        .unwrap()
        .with_remote(Some(true));
    let postings = engine.search(&request).await;

    // 15 fetched, 3 remote; 2 short so the next 4 are fetched, 1 remote
    assert_eq!(sizes(&calls), vec![15, 4]);
    let offsets: Vec<usize> = calls.lock().unwrap().iter().map(|c| c.offset).collect();
    assert_eq!(offsets, vec![0, 15]);
    let ids: Vec<&str> = postings.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(
        ids,
        vec!["linkedin-0", "linkedin-5", "linkedin-10", "linkedin-15"]
    );
}

#[tokio::test]
async fn test_onsite_filter() {
    let (linkedin, calls) = RecordingCrawler::new(Site::Linkedin, None);
    let engine = engine(vec![Box::new(linkedin)]);

    let request = SearchRequest::new("developer", "Austin", 10)
        .unwrap()
        .with_remote(Some(false));
    let postings = engine.search(&request).await;

    assert_eq!(sizes(&calls), vec![30]);
    assert_eq!(postings.len(), 10);
    assert!(postings.iter().all(|p| p.is_remote == Some(false)));
}

#[tokio::test]
async fn test_no_filter_fetches_once_unchanged() {
    let (linkedin, calls) = RecordingCrawler::new(Site::Linkedin, None);
    let engine = engine(vec![Box::new(linkedin)]);

    let request = SearchRequest::new("developer", "Austin", 7).unwrap();
    let postings = engine.search(&request).await;

    assert_eq!(sizes(&calls), vec![7]);
    assert_eq!(postings.len(), 7);
    assert_eq!(postings[0].site, Site::Linkedin);
    assert_eq!(postings[0].company_name.as_deref(), Some("N/A"));
}

#[tokio::test]
async fn test_backfill_skipped_at_cap() {
    let (linkedin, calls) = RecordingCrawler::new(Site::Linkedin, None);
    let engine = engine(vec![Box::new(linkedin)]);

    let request = SearchRequest::new("developer", "Austin", 100)
        .unwrap()
        .with_remote(Some(true));
    let postings = engine.search(&request).await;

    assert_eq!(sizes(&calls), vec![200]);
    assert_eq!(postings.len(), 40);
}

#[tokio::test]
async fn test_regional_site_runs_first_and_others_skipped() {
    let (linkedin, linkedin_calls) = RecordingCrawler::new(Site::Linkedin, None);
    let (bdjobs, bdjobs_calls) = RecordingCrawler::new(Site::Bdjobs, Some(Country::Bangladesh));
    let engine = engine(vec![Box::new(linkedin), Box::new(bdjobs)]);

    assert_eq!(
        engine.select_sites("Dhaka"),
        vec![Site::Bdjobs, Site::Linkedin, Site::Indeed, Site::Glassdoor]
    );
    assert_eq!(
        engine.select_sites("Paris"),
        vec![Site::Linkedin, Site::Indeed, Site::Glassdoor]
    );

    let request = SearchRequest::new("accountant", "Dhaka", 3).unwrap();
    let postings = engine.search(&request).await;

    assert_eq!(sizes(&bdjobs_calls), vec![3]);
    assert_eq!(sizes(&linkedin_calls), vec![3]);
    // Truncated to three, all from the site that ran first
    assert_eq!(postings.len(), 3);
    assert!(postings.iter().all(|p| p.site == Site::Bdjobs));
}

#[tokio::test]
async fn test_recency_default_dropped_for_regional_search() {
    let (linkedin, calls) = RecordingCrawler::new(Site::Linkedin, None);
    let (bdjobs, _) = RecordingCrawler::new(Site::Bdjobs, Some(Country::Bangladesh));
    let engine = engine(vec![Box::new(linkedin), Box::new(bdjobs)]);

    engine
        .search(&SearchRequest::new("clerk", "Chittagong", 2).unwrap())
        .await;
    engine
        .search(&SearchRequest::new("clerk", "Paris", 2).unwrap())
        .await;
    engine
        .search(
            &SearchRequest::new("clerk", "Dhaka", 2)
                .unwrap()
                .with_hours_old(Some(24)),
        )
        .await;

    let hours: Vec<Option<u32>> = calls.lock().unwrap().iter().map(|c| c.hours_old).collect();
    assert_eq!(hours, vec![None, Some(72), Some(24)]);
}

#[tokio::test]
async fn test_parallel_sites_keep_selection_order() {
    let (linkedin, _) = RecordingCrawler::new(Site::Linkedin, None);
    let (bdjobs, _) = RecordingCrawler::new(Site::Bdjobs, Some(Country::Bangladesh));
    // The first site finishes last
    let bdjobs = bdjobs.with_delay(Duration::from_millis(50));

    let mut config = Config::default();
    config.search.parallel_sites = true;
    let engine = JobSearch::with_crawlers(config, vec![Box::new(linkedin), Box::new(bdjobs)])
        .expect("Failed to build engine");

    let postings = engine
        .search(&SearchRequest::new("clerk", "Dhaka", 4).unwrap())
        .await;

    assert_eq!(postings.len(), 4);
    assert!(postings.iter().all(|p| p.site == Site::Bdjobs));
}

#[tokio::test]
async fn test_unknown_baseline_site_rejected() {
    let mut config = Config::default();
    config.search.baseline_sites.push("monster".to_string());

    assert!(JobSearch::with_crawlers(config, Vec::new()).is_err());
}

/// LinkedIn guest pages of 25 cards by `start`; only the listed positions are
/// on-site, the rest say "(Remote)" in the title
struct RankedCards {
    onsite: Vec<u32>,
}

impl Respond for RankedCards {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let start: u32 = request
            .url
            .query_pairs()
            .find(|(key, _)| key == "start")
            .and_then(|(_, value)| value.parse().ok())
            .unwrap_or(0);

        let body: String = (start..start + 25)
            .map(|n| {
                let title = if self.onsite.contains(&n) {
                    format!("Developer {}", n)
                } else {
                    format!("Developer {} (Remote)", n)
                };
                format!(
                    r#"<li><div class="base-search-card" data-entity-urn="urn:li:jobPosting:{n}">
                        <a class="base-card__full-link" href="https://www.linkedin.com/jobs/view/developer-{n}"></a>
                        <h3>{title}</h3>
                        <span class="job-search-card__location">Denver, CO</span>
                    </div></li>"#
                )
            })
            .collect();
        ResponseTemplate::new(200).set_body_string(body)
    }
}

#[tokio::test]
async fn test_backfill_round_reaches_past_first_round() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/jobs-guest/search"))
        .and(query_param("start", "0"))
        .respond_with(RankedCards {
            onsite: vec![0, 1, 16, 17, 18],
        })
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/jobs-guest/search"))
        .and(query_param("start", "15"))
        .respond_with(RankedCards {
            onsite: vec![0, 1, 16, 17, 18],
        })
        .expect(1)
        .mount(&mock_server)
        .await;

    let linkedin = LinkedinCrawler::new(
        &LinkedinConfig {
            search_url: format!("{}/jobs-guest/search", mock_server.uri()),
            pacing: PacingConfig {
                max_pages: 5,
                page_delay_base_ms: 0,
                page_delay_jitter_ms: 0,
            },
            page_size: 25,
        },
        &HttpConfig {
            timeout_secs: 5,
            retries: 0,
            retry_delay_ms: 0,
            ..HttpConfig::default()
        },
        LocationClassifier::new(Country::Usa),
    )
    .expect("Failed to build crawler");
    let engine = engine(vec![Box::new(linkedin)]);

    let request = SearchRequest::new("developer", "Denver", 5)
        .unwrap()
        .with_remote(Some(false));
    let postings = engine.search(&request).await;

    // Round one takes cards 0..15 (two on-site); round two asks for 6 from 15
    let ids: Vec<&str> = postings.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(
        ids,
        vec!["linkedin-0", "linkedin-1", "linkedin-16", "linkedin-17", "linkedin-18"]
    );
}
