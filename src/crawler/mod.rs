//! Site crawlers and their shared plumbing
//!
//! This module contains:
//! - The [`SiteCrawler`] capability every job board implements
//! - The HTTP session factory with its retry policy
//! - Page pacing (page ceiling and randomized inter-page pause)
//! - Field extraction heuristics shared by the HTML crawlers
//! - The concrete crawlers: BDJobs and LinkedIn

pub mod bdjobs;
pub mod extract;
mod linkedin;
mod pacing;
mod session;

pub use bdjobs::BdjobsCrawler;
pub use linkedin::LinkedinCrawler;
pub use pacing::PagePolicy;
pub use session::{build_http_client, CrawlSession, FetchResult, HttpSession, RetryPolicy};

use crate::config::Config;
use crate::location::{Country, LocationClassifier};
use crate::model::{JobPosting, SearchRequest, Site};
use crate::SweepError;
use async_trait::async_trait;

/// One job board's crawler
///
/// `scrape` never fails: network errors, blocks and markup changes end the
/// run early and yield whatever was collected (possibly nothing). Each call
/// owns its own [`CrawlSession`], so one crawler can serve concurrent
/// searches.
#[async_trait]
pub trait SiteCrawler: Send + Sync {
    /// Board this crawler scrapes
    fn site(&self) -> Site;

    /// The single region a region-restricted board serves, `None` otherwise
    fn region(&self) -> Option<Country> {
        None
    }

    /// Whether a search at `location` should run this crawler at all
    fn applicable(&self, location: &str) -> bool {
        LocationClassifier::default()
            .classify(location, self.region())
            .applicable
    }

    /// Runs one search, returning at most `request.results_wanted()` postings
    async fn scrape(&self, request: &SearchRequest) -> Vec<JobPosting>;
}

/// Builds the crawler registered for `site`
///
/// Returns `Ok(None)` for boards without a crawler (Indeed, Glassdoor), whose
/// search needs scripted sessions this engine does not drive.
pub fn build_crawler(
    site: Site,
    config: &Config,
) -> Result<Option<Box<dyn SiteCrawler>>, SweepError> {
    let crawler: Box<dyn SiteCrawler> = match site {
        Site::Bdjobs => Box::new(BdjobsCrawler::new(&config.bdjobs, &config.http)?),
        Site::Linkedin => Box::new(LinkedinCrawler::new(
            &config.linkedin,
            &config.http,
            LocationClassifier::from_code(&config.search.default_country),
        )?),
        Site::Indeed | Site::Glassdoor | Site::Unknown => return Ok(None),
    };
    Ok(Some(crawler))
}

/// Sites with a registered crawler
pub const CRAWLABLE_SITES: [Site; 2] = [Site::Linkedin, Site::Bdjobs];
