use serde::Deserialize;
use std::collections::BTreeMap;

/// Main configuration structure for jobsweep
///
/// Every table has defaults, so an empty file is a valid configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub search: SearchConfig,
    pub http: HttpConfig,
    pub bdjobs: BdjobsConfig,
    pub linkedin: LinkedinConfig,
}

/// Engine-level search behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Hard cap on postings requested from crawlers in one search, across rounds
    #[serde(rename = "max-results")]
    pub max_results: usize,

    /// Over-fetch factor applied when a remote/on-site filter is requested
    #[serde(rename = "over-fetch-multiplier")]
    pub over_fetch_multiplier: usize,

    /// Maximum fetch rounds in the remote-filter loop (1 disables backfill)
    #[serde(rename = "max-backfill-rounds")]
    pub max_backfill_rounds: usize,

    /// Recency filter used when a request sets none
    #[serde(rename = "default-hours-old")]
    pub default_hours_old: Option<u32>,

    /// Country code used when a location matches no known region
    #[serde(rename = "default-country")]
    pub default_country: String,

    /// Run the crawlers of one pass concurrently instead of one after another
    #[serde(rename = "parallel-sites")]
    pub parallel_sites: bool,

    /// Generally-available sites that are always selected
    #[serde(rename = "baseline-sites")]
    pub baseline_sites: Vec<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: 200,
            over_fetch_multiplier: 3,
            max_backfill_rounds: 2,
            default_hours_old: Some(72),
            default_country: "usa".to_string(),
            parallel_sites: false,
            baseline_sites: vec![
                "linkedin".to_string(),
                "indeed".to_string(),
                "glassdoor".to_string(),
            ],
        }
    }
}

/// TLS negotiation mode for the HTTP session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TlsMode {
    /// Client library defaults
    #[default]
    Default,
    /// rustls capped at TLS 1.2, which presents a different handshake fingerprint
    Tls12,
}

/// HTTP session settings shared by every crawler
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Per-fetch timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Optional proxy URL applied to all schemes
    pub proxy: Option<String>,

    /// Optional PEM file with an extra root certificate
    #[serde(rename = "ca-cert")]
    pub ca_cert: Option<String>,

    #[serde(rename = "tls-mode")]
    pub tls_mode: TlsMode,

    /// Retries for connection failures and retryable statuses
    pub retries: u32,

    /// Delay between retries (milliseconds)
    #[serde(rename = "retry-delay-ms")]
    pub retry_delay_ms: u64,

    /// Drop cookies between requests instead of keeping a cookie jar
    #[serde(rename = "clear-cookies")]
    pub clear_cookies: bool,

    /// Extra headers merged over each crawler's own defaults
    pub headers: BTreeMap<String, String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36".to_string(),
            timeout_secs: 60,
            proxy: None,
            ca_cert: None,
            tls_mode: TlsMode::Default,
            retries: 3,
            retry_delay_ms: 5000,
            clear_cookies: true,
            headers: BTreeMap::new(),
        }
    }
}

/// Inter-page pacing and page ceiling for one crawler
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    /// Hard ceiling on search pages fetched per run
    #[serde(rename = "max-pages")]
    pub max_pages: u32,

    /// Fixed part of the pause between pages (milliseconds)
    #[serde(rename = "page-delay-base-ms")]
    pub page_delay_base_ms: u64,

    /// Upper bound of the random part of the pause (milliseconds)
    #[serde(rename = "page-delay-jitter-ms")]
    pub page_delay_jitter_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            max_pages: 5,
            page_delay_base_ms: 2000,
            page_delay_jitter_ms: 3000,
        }
    }
}

/// BDJobs (Bangladesh) crawler settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BdjobsConfig {
    #[serde(rename = "base-url")]
    pub base_url: String,

    #[serde(rename = "search-url")]
    pub search_url: String,

    #[serde(flatten)]
    pub pacing: PacingConfig,

    /// Location used when a listing shows none
    #[serde(rename = "default-location")]
    pub default_location: String,

    /// Fetch each posting's detail page for description and salary
    #[serde(rename = "fetch-details")]
    pub fetch_details: bool,

    #[serde(rename = "detail-timeout-secs")]
    pub detail_timeout_secs: u64,

    /// Request headers sent with every BDJobs request
    pub headers: BTreeMap<String, String>,

    /// Fixed query parameters added to every search
    #[serde(rename = "search-params")]
    pub search_params: BTreeMap<String, String>,

    /// Listing container selectors, tried in order
    #[serde(rename = "listing-selectors")]
    pub listing_selectors: Vec<String>,

    /// Substring identifying a listing-detail link
    #[serde(rename = "detail-link-marker")]
    pub detail_link_marker: String,
}

impl Default for BdjobsConfig {
    fn default() -> Self {
        let headers = [
            (
                "Accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            ),
            ("Accept-Language", "en-US,en;q=0.5"),
            ("Connection", "keep-alive"),
            ("Referer", "https://jobs.bdjobs.com/"),
            ("Cache-Control", "max-age=0"),
            ("Upgrade-Insecure-Requests", "1"),
        ];

        Self {
            base_url: "https://jobs.bdjobs.com".to_string(),
            search_url: "https://jobs.bdjobs.com/jobsearch.asp".to_string(),
            pacing: PacingConfig::default(),
            default_location: "Dhaka, Bangladesh".to_string(),
            fetch_details: false,
            detail_timeout_secs: 15,
            headers: headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            search_params: [("hidJobSearch", "jobsearch")]
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            listing_selectors: [
                "div[class*='job']",
                "tr[class*='job']",
                "div[class*='sout']",
                "div[class*='norm']",
                "div[class*='featured']",
                "table tr",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            detail_link_marker: "jobdetail".to_string(),
        }
    }
}

/// Pacing keys as written in a site table; unset keys keep the site's defaults
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct PacingOverrides {
    #[serde(rename = "max-pages")]
    pub max_pages: Option<u32>,

    #[serde(rename = "page-delay-base-ms")]
    pub page_delay_base_ms: Option<u64>,

    #[serde(rename = "page-delay-jitter-ms")]
    pub page_delay_jitter_ms: Option<u64>,
}

impl PacingOverrides {
    /// Fills the unset keys from `defaults`
    pub fn over(self, defaults: PacingConfig) -> PacingConfig {
        PacingConfig {
            max_pages: self.max_pages.unwrap_or(defaults.max_pages),
            page_delay_base_ms: self.page_delay_base_ms.unwrap_or(defaults.page_delay_base_ms),
            page_delay_jitter_ms: self
                .page_delay_jitter_ms
                .unwrap_or(defaults.page_delay_jitter_ms),
        }
    }
}

/// LinkedIn guest search crawler settings
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "LinkedinTable")]
pub struct LinkedinConfig {
    pub search_url: String,

    pub pacing: PacingConfig,

    /// Cards returned per page by the guest endpoint
    pub page_size: u32,
}

impl LinkedinConfig {
    /// LinkedIn's own pacing, slower than the BDJobs defaults
    pub fn default_pacing() -> PacingConfig {
        PacingConfig {
            max_pages: 5,
            page_delay_base_ms: 3000,
            page_delay_jitter_ms: 4000,
        }
    }
}

impl Default for LinkedinConfig {
    fn default() -> Self {
        Self {
            search_url:
                "https://www.linkedin.com/jobs-guest/jobs/api/seeMoreJobPostings/search"
                    .to_string(),
            pacing: Self::default_pacing(),
            page_size: 25,
        }
    }
}

/// `[linkedin]` as written in the file
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LinkedinTable {
    #[serde(rename = "search-url")]
    search_url: Option<String>,

    #[serde(flatten)]
    pacing: PacingOverrides,

    #[serde(rename = "page-size")]
    page_size: Option<u32>,
}

impl From<LinkedinTable> for LinkedinConfig {
    fn from(table: LinkedinTable) -> Self {
        let defaults = LinkedinConfig::default();
        Self {
            search_url: table.search_url.unwrap_or(defaults.search_url),
            pacing: table.pacing.over(defaults.pacing),
            page_size: table.page_size.unwrap_or(defaults.page_size),
        }
    }
}
