//! BDJobs (Bangladesh) crawler
//!
//! The reference region-restricted crawler. One `scrape` call runs:
//!
//! ```text
//! Init ──(inapplicable)──────────────────────────────► Done
//!   │
//!   ▼
//! Paginating ─► Fetching ─► Parsing ─► Accumulating ─┐
//!   ▲                │          │                     │
//!   └── pause ◄──────┼──────────┼─────────────────────┘
//!                    ▼          ▼
//!                  Done       Done
//!          (non-200/transport) (no listings)
//! ```
//!
//! Pagination stops when enough postings are accumulated or the page ceiling
//! is reached. A request offset skips that many unique postings first. Site failures end the run with what was collected so far.

mod detail;
mod listing;

pub use detail::{parse_detail, DetailInfo};
pub use listing::{derive_id, find_listings, parse_card, parse_listings};

use crate::config::{BdjobsConfig, HttpConfig};
use crate::crawler::pacing::PagePolicy;
use crate::crawler::session::{CrawlSession, FetchResult, HttpSession};
use crate::crawler::SiteCrawler;
use crate::location::Country;
use crate::model::{JobPosting, SearchRequest, Site};
use crate::SweepError;
use async_trait::async_trait;
use std::time::Duration;
use url::Url;

/// Crawler for jobs.bdjobs.com search results
pub struct BdjobsCrawler {
    config: BdjobsConfig,
    http: HttpSession,
    base_url: Url,
    policy: PagePolicy,
}

impl BdjobsCrawler {
    /// The only region this board serves
    pub const REGION: Country = Country::Bangladesh;

    /// Builds the crawler and its HTTP session from configuration
    pub fn new(config: &BdjobsConfig, http: &HttpConfig) -> Result<Self, SweepError> {
        let session = HttpSession::build(http, &config.headers)?;
        Self::with_session(config.clone(), session)
    }

    /// Builds the crawler around an existing HTTP session
    pub fn with_session(config: BdjobsConfig, http: HttpSession) -> Result<Self, SweepError> {
        let base_url = Url::parse(&config.base_url)?;
        let policy = PagePolicy::from(&config.pacing);
        Ok(Self {
            config,
            http,
            base_url,
            policy,
        })
    }

    pub fn config(&self) -> &BdjobsConfig {
        &self.config
    }

    /// Query parameters for one search page; `pg` is sent from page 2 on
    fn page_query(&self, request: &SearchRequest, page: u32) -> Vec<(String, String)> {
        let mut query: Vec<(String, String)> = self
            .config
            .search_params
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        query.push(("txtKeyword".to_string(), request.search_term().to_string()));
        if !request.location().is_empty() {
            query.push(("txtlocation".to_string(), request.location().to_string()));
        }
        if page > 1 {
            query.push(("pg".to_string(), page.to_string()));
        }
        query
    }

    async fn paginate(&self, session: &mut CrawlSession) -> Vec<JobPosting> {
        let wanted = session.request().results_wanted();
        // BDJobs has no result offset parameter; earlier rounds' postings are
        // walked past instead
        let mut to_skip = session.request().offset();
        let mut postings: Vec<JobPosting> = Vec::new();
        let mut page: u32 = 1;

        while postings.len() < wanted && session.policy().allows_page(page) {
            tracing::info!("BDJobs search page: {}", page);

            let query = self.page_query(session.request(), page);
            let body = match session
                .fetch_search_page(&self.config.search_url, &query)
                .await
            {
                FetchResult::Success { body, .. } => body,
                FetchResult::HttpError { status_code } => {
                    tracing::error!("BDJobs response status code {}", status_code);
                    break;
                }
                FetchResult::NetworkError { error, .. } => {
                    tracing::error!("Error during BDJobs scraping: {}", error);
                    break;
                }
            };

            let cards = parse_listings(&body, &self.base_url, &self.config);
            if cards.is_empty() {
                tracing::info!("No more job listings found on BDJobs");
                break;
            }
            tracing::info!("Found {} job cards on BDJobs page {}", cards.len(), page);

            for posting in cards {
                if !session.remember(&posting.id) {
                    tracing::debug!("Skipping duplicate BDJobs posting {}", posting.id);
                    continue;
                }
                if to_skip > 0 {
                    to_skip -= 1;
                    continue;
                }
                postings.push(posting);
                if postings.len() >= wanted {
                    break;
                }
            }

            page += 1;
            if postings.len() < wanted && session.policy().allows_page(page) {
                session.policy().pause().await;
            }
        }

        postings
    }

    async fn enrich(&self, session: &CrawlSession, postings: &mut [JobPosting]) {
        let timeout = Duration::from_secs(self.config.detail_timeout_secs);
        for posting in postings.iter_mut() {
            match session.http().get(&posting.job_url, &[], Some(timeout)).await {
                FetchResult::Success { body, .. } => {
                    let info = parse_detail(&body);
                    if info.is_empty() {
                        tracing::debug!("No details found on {}", posting.job_url);
                    }
                    info.apply_to(posting);
                }
                other => {
                    tracing::debug!("Error fetching job details from {}: {:?}", posting.job_url, other);
                }
            }
        }
    }
}

#[async_trait]
impl SiteCrawler for BdjobsCrawler {
    fn site(&self) -> Site {
        Site::Bdjobs
    }

    fn region(&self) -> Option<Country> {
        Some(Self::REGION)
    }

    async fn scrape(&self, request: &SearchRequest) -> Vec<JobPosting> {
        if !self.applicable(request.location()) {
            tracing::info!(
                "BDJobs: skipping search for location '{}' as it's outside Bangladesh",
                request.location()
            );
            return Vec::new();
        }
        if request.hours_old().is_some() {
            tracing::debug!("BDJobs has no reliable posting dates; ignoring hours_old");
        }

        let mut session = CrawlSession::new(self.http.clone(), self.policy, request.clone());
        let mut postings = self.paginate(&mut session).await;

        if self.config.fetch_details {
            self.enrich(&session, &mut postings).await;
        }

        tracing::info!(
            "BDJobs: finished scraping, {} postings from {} pages",
            postings.len(),
            session.pages_fetched()
        );
        postings
    }
}
