//! LinkedIn guest search crawler
//!
//! Reads the public (logged-out) job search endpoint, which returns HTML
//! fragments of `div.base-search-card` cards, one page of `page-size` cards
//! per `start` offset.

use crate::config::{HttpConfig, LinkedinConfig};
use crate::crawler::extract::{element_text, mentions_remote, parse_posted_date};
use crate::crawler::pacing::PagePolicy;
use crate::crawler::session::{CrawlSession, FetchResult, HttpSession};
use crate::crawler::SiteCrawler;
use crate::location::{Country, Location, LocationClassifier};
use crate::model::{JobPosting, SearchRequest, Site};
use crate::SweepError;
use async_trait::async_trait;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeMap;
use url::Url;

/// Crawler for LinkedIn's guest job search
pub struct LinkedinCrawler {
    config: LinkedinConfig,
    http: HttpSession,
    classifier: LocationClassifier,
    policy: PagePolicy,
}

impl LinkedinCrawler {
    pub fn new(
        config: &LinkedinConfig,
        http: &HttpConfig,
        classifier: LocationClassifier,
    ) -> Result<Self, SweepError> {
        let session = HttpSession::build(http, &BTreeMap::new())?;
        Ok(Self::with_session(config.clone(), session, classifier))
    }

    pub fn with_session(
        config: LinkedinConfig,
        http: HttpSession,
        classifier: LocationClassifier,
    ) -> Self {
        let policy = PagePolicy::from(&config.pacing);
        Self {
            config,
            http,
            classifier,
            policy,
        }
    }

    fn page_query(&self, request: &SearchRequest, page: u32) -> Vec<(String, String)> {
        let start = request.offset()
            + (page.saturating_sub(1) as usize) * self.config.page_size as usize;
        let mut query = vec![
            ("keywords".to_string(), request.search_term().to_string()),
            ("location".to_string(), request.location().to_string()),
            ("start".to_string(), start.to_string()),
        ];
        if let Some(hours) = request.hours_old() {
            query.push(("f_TPR".to_string(), format!("r{}", u64::from(hours) * 3600)));
        }
        if request.is_remote() == Some(true) {
            query.push(("f_WT".to_string(), "2".to_string()));
        }
        query
    }

    /// Classifier for card locations: unmatched text falls back to the
    /// request's country hint, else the configured default
    fn classifier_for(&self, request: &SearchRequest) -> LocationClassifier {
        match Country::from_code(request.country_hint()) {
            Some(country) => LocationClassifier::new(country),
            None => self.classifier,
        }
    }

    /// Parses one page of search cards, in page order
    pub fn parse_cards(&self, html: &str, remote_filtered: bool) -> Vec<JobPosting> {
        parse_page(html, remote_filtered, &self.classifier)
    }
}

fn parse_page(
    html: &str,
    remote_filtered: bool,
    classifier: &LocationClassifier,
) -> Vec<JobPosting> {
    let document = Html::parse_fragment(html);
    let cards = match Selector::parse("div.base-search-card") {
        Ok(selector) => selector,
        Err(_) => return Vec::new(),
    };

    document
        .select(&cards)
        .filter_map(|card| {
            let posting = parse_card(&card, remote_filtered, classifier);
            if posting.is_none() {
                tracing::debug!("Skipping LinkedIn card without a job id");
            }
            posting
        })
        .collect()
}

fn parse_card(
    card: &ElementRef<'_>,
    remote_filtered: bool,
    classifier: &LocationClassifier,
) -> Option<JobPosting> {
    let href = select_attr(card, "a.base-card__full-link, a[href*='/jobs/view/']", "href");
    let job_id = card
        .value()
        .attr("data-entity-urn")
        .and_then(|urn| urn.rsplit(':').next())
        .map(str::to_string)
        .filter(|id| !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()))
        .or_else(|| href.as_deref().and_then(job_id_from_url))?;

    let job_url = href
        .as_deref()
        .and_then(|h| Url::parse(h).ok())
        .map(|mut url| {
            url.set_query(None);
            url.to_string()
        })
        .unwrap_or_else(|| format!("https://www.linkedin.com/jobs/view/{}", job_id));

    let title = select_text(card, "h3.base-search-card__title, h3")
        .unwrap_or_else(|| "N/A".to_string());
    let company = select_text(card, "h4.base-search-card__subtitle, h4")
        .unwrap_or_else(|| "N/A".to_string());
    let location_text = select_text(card, "span.job-search-card__location");
    let date_posted = select_attr(card, "time", "datetime")
        .or_else(|| select_text(card, "time"))
        .and_then(|t| parse_posted_date(&t));

    let location = location_text.as_deref().map(|text| {
        Location::parse(text, classifier.country_of(text))
    });
    let is_remote = remote_filtered
        || mentions_remote(&[title.as_str(), location_text.as_deref().unwrap_or_default()]);

    let mut posting = JobPosting::new(
        format!("{}-{}", Site::Linkedin, job_id),
        title,
        job_url,
        Site::Linkedin,
    );
    posting.company_name = Some(company);
    posting.location = location;
    posting.date_posted = date_posted;
    posting.is_remote = Some(is_remote);
    Some(posting)
}

#[async_trait]
impl SiteCrawler for LinkedinCrawler {
    fn site(&self) -> Site {
        Site::Linkedin
    }

    async fn scrape(&self, request: &SearchRequest) -> Vec<JobPosting> {
        let remote_filtered = request.is_remote() == Some(true);
        let classifier = self.classifier_for(request);
        let mut session = CrawlSession::new(self.http.clone(), self.policy, request.clone());
        let wanted = request.results_wanted();
        let mut postings: Vec<JobPosting> = Vec::new();
        let mut page: u32 = 1;

        while postings.len() < wanted && session.policy().allows_page(page) {
            tracing::info!("LinkedIn search page: {}", page);

            let query = self.page_query(session.request(), page);
            let body = match session
                .fetch_search_page(&self.config.search_url, &query)
                .await
            {
                FetchResult::Success { body, .. } => body,
                FetchResult::HttpError { status_code } => {
                    tracing::error!("LinkedIn response status code {}", status_code);
                    break;
                }
                FetchResult::NetworkError { error, .. } => {
                    tracing::error!("Error during LinkedIn scraping: {}", error);
                    break;
                }
            };

            let cards = parse_page(&body, remote_filtered, &classifier);
            if cards.is_empty() {
                tracing::info!("No more job cards found on LinkedIn");
                break;
            }

            for posting in cards {
                if !session.remember(&posting.id) {
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

        tracing::info!(
            "LinkedIn: finished scraping, {} postings from {} pages",
            postings.len(),
            session.pages_fetched()
        );
        postings
    }
}

fn select_text(element: &ElementRef<'_>, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    element.select(&selector).find_map(|el| element_text(&el))
}

fn select_attr(element: &ElementRef<'_>, selector: &str, attr: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    element
        .select(&selector)
        .find_map(|el| el.value().attr(attr))
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Trailing numeric id of a `/jobs/view/<slug>-<id>` URL
fn job_id_from_url(href: &str) -> Option<String> {
    let re = Regex::new(r"/jobs/view/(?:[^/?]*-)?(\d+)").ok()?;
    re.captures(href)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
