//! The search engine: site selection, crawling, normalization and the
//! remote-filter backfill loop
//!
//! [`JobSearch::search`] is the single entry point callers use. It never
//! fails for site-level problems; the worst case is an empty list.

mod backfill;
mod normalize;
mod selector;

pub use backfill::{search_with_filter, BackfillPolicy, RoundFetcher};
pub use normalize::{NormalizeError, Normalizer, NOT_AVAILABLE};
pub use selector::select_sites;

use crate::config::Config;
use crate::crawler::{build_crawler, SiteCrawler, CRAWLABLE_SITES};
use crate::location::{Classification, LocationClassifier};
use crate::model::{JobPosting, RawRow, SearchRequest, Site};
use crate::{ConfigError, SweepError};
use async_trait::async_trait;
use futures::future::join_all;

/// A configured search engine with its registered crawlers
pub struct JobSearch {
    config: Config,
    classifier: LocationClassifier,
    baseline: Vec<Site>,
    crawlers: Vec<Box<dyn SiteCrawler>>,
}

impl JobSearch {
    /// Builds the engine with every crawler this crate provides
    pub fn from_config(config: Config) -> Result<Self, SweepError> {
        let mut crawlers = Vec::new();
        for site in CRAWLABLE_SITES {
            if let Some(crawler) = build_crawler(site, &config)? {
                crawlers.push(crawler);
            }
        }
        Self::with_crawlers(config, crawlers)
    }

    /// Builds the engine around explicitly supplied crawlers
    pub fn with_crawlers(
        config: Config,
        crawlers: Vec<Box<dyn SiteCrawler>>,
    ) -> Result<Self, SweepError> {
        let baseline = config
            .search
            .baseline_sites
            .iter()
            .map(|name| {
                name.parse::<Site>()
                    .map_err(|_| ConfigError::UnknownSite(name.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let classifier = LocationClassifier::from_code(&config.search.default_country);

        Ok(Self {
            config,
            classifier,
            baseline,
            crawlers,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Classifies a location against the default region
    pub fn classify(&self, location: &str) -> Classification {
        self.classifier.classify(location, None)
    }

    /// Sites a search at `location` would run, in run order
    pub fn select_sites(&self, location: &str) -> Vec<Site> {
        select_sites(location, &self.baseline, &self.crawlers)
    }

    /// Recency filter sent to crawlers for a request and site selection
    ///
    /// An explicit `hours_old` always wins. Otherwise the configured default
    /// applies, except when a region-restricted site was selected, since those
    /// boards carry no reliable posting dates.
    pub fn effective_hours_old(&self, request: &SearchRequest, sites: &[Site]) -> Option<u32> {
        if request.hours_old().is_some() {
            return request.hours_old();
        }
        let regional_selected = self
            .crawlers
            .iter()
            .any(|c| c.region().is_some() && sites.contains(&c.site()));
        if regional_selected {
            tracing::info!("Region-restricted site selected; removing hours_old filter");
            None
        } else {
            self.config.search.default_hours_old
        }
    }

    /// Runs a search: never fails, returns at most `results_wanted` postings
    pub async fn search(&self, request: &SearchRequest) -> Vec<JobPosting> {
        let request = if request.country_hint().is_empty() {
            let country = self.classifier.country_of(request.location());
            tracing::info!("Using country code: {}", country.code());
            request.clone().with_country_hint(country.code())
        } else {
            request.clone()
        };

        let policy = BackfillPolicy::from(&self.config.search);
        let postings = search_with_filter(self, &request, &policy).await;
        tracing::info!(
            "Search for '{}' in '{}' returned {} postings",
            request.search_term(),
            request.location(),
            postings.len()
        );
        postings
    }

    fn crawler_for(&self, site: Site) -> Option<&dyn SiteCrawler> {
        self.crawlers
            .iter()
            .find(|c| c.site() == site)
            .map(|c| &**c)
    }

    async fn crawl(&self, request: &SearchRequest, sites: &[Site]) -> Vec<JobPosting> {
        let crawlers: Vec<&dyn SiteCrawler> = sites
            .iter()
            .filter_map(|site| {
                let crawler = self.crawler_for(*site);
                if crawler.is_none() {
                    tracing::warn!("No crawler registered for {}; skipping", site);
                }
                crawler
            })
            .collect();

        let batches: Vec<Vec<JobPosting>> = if self.config.search.parallel_sites {
            join_all(crawlers.iter().map(|c| c.scrape(request))).await
        } else {
            let mut batches = Vec::with_capacity(crawlers.len());
            for crawler in &crawlers {
                batches.push(crawler.scrape(request).await);
            }
            batches
        };

        for (crawler, batch) in crawlers.iter().zip(&batches) {
            tracing::info!("{}: {} postings", crawler.site(), batch.len());
        }
        batches.into_iter().flatten().collect()
    }
}

#[async_trait]
impl RoundFetcher for JobSearch {
    async fn fetch_round(&self, request: &SearchRequest) -> Vec<JobPosting> {
        let sites = self.select_sites(request.location());
        tracing::info!(
            "Starting job scraping for '{}' in '{}' from {} sites: {:?}",
            request.search_term(),
            request.location(),
            sites.len(),
            sites
        );

        let hours_old = self.effective_hours_old(request, &sites);
        let request = request.clone().with_hours_old(hours_old);

        let rows: Vec<RawRow> = self
            .crawl(&request, &sites)
            .await
            .iter()
            .map(JobPosting::to_row)
            .collect();

        Normalizer::new(self.classifier).normalize(&rows)
    }
}
