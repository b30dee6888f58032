//! HTTP session factory and per-run crawl state
//!
//! This module handles all HTTP requests for the crawlers, including:
//! - Building HTTP clients with site headers, proxy, TLS mode and cookie policy
//! - GET requests with query parameters and a fixed timeout
//! - Bounded retry for connection failures and retryable statuses
//! - Error classification into [`FetchResult`]
//! - The mutable state of one crawler run ([`CrawlSession`])

use crate::config::{HttpConfig, TlsMode};
use crate::crawler::pacing::PagePolicy;
use crate::model::SearchRequest;
use crate::{ConfigError, SweepError};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, StatusCode};
use std::collections::{BTreeMap, HashSet};
use std::time::Duration;

/// Statuses worth a second attempt
const RETRYABLE_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched the page
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Page body content
        body: String,
    },

    /// The server answered with a non-200 status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, etc.)
    NetworkError {
        /// Error description
        error: String,
        /// Whether the per-fetch timeout elapsed
        timed_out: bool,
    },
}

/// Bounded retry for transport-level failures
///
/// | Condition | Action |
/// |-----------|--------|
/// | Connection refused / reset | Retry up to `retries` times |
/// | HTTP 429, 500, 502, 503, 504 | Retry up to `retries` times |
/// | Timeout | Immediate failure |
/// | Any other status | Immediate failure |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub retries: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            retries: 0,
            delay: Duration::ZERO,
        }
    }
}

impl From<&HttpConfig> for RetryPolicy {
    fn from(config: &HttpConfig) -> Self {
        Self {
            retries: config.retries,
            delay: Duration::from_millis(config.retry_delay_ms),
        }
    }
}

/// A configured HTTP client plus its retry policy, shared by one crawler instance
#[derive(Debug, Clone)]
pub struct HttpSession {
    client: Client,
    retry: RetryPolicy,
}

impl HttpSession {
    /// Builds a session from the shared HTTP settings and a site's own headers
    ///
    /// Headers from `[http.headers]` override same-named site headers.
    pub fn build(
        config: &HttpConfig,
        site_headers: &BTreeMap<String, String>,
    ) -> Result<Self, SweepError> {
        let client = build_http_client(config, site_headers)?;
        Ok(Self {
            client,
            retry: RetryPolicy::from(config),
        })
    }

    pub fn from_parts(client: Client, retry: RetryPolicy) -> Self {
        Self { client, retry }
    }

    /// GET with query parameters, applying the retry policy
    pub async fn get(
        &self,
        url: &str,
        query: &[(String, String)],
        timeout: Option<Duration>,
    ) -> FetchResult {
        let mut attempt = 0;
        loop {
            let result = fetch_once(&self.client, url, query, timeout).await;
            if attempt >= self.retry.retries || !should_retry(&result) {
                return result;
            }
            attempt += 1;
            tracing::warn!(
                "Retrying {} (attempt {}/{}) after {:?}",
                url,
                attempt,
                self.retry.retries,
                result
            );
            if !self.retry.delay.is_zero() {
                tokio::time::sleep(self.retry.delay).await;
            }
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - Shared HTTP settings (user agent, timeout, proxy, TLS, cookies)
/// * `site_headers` - Default headers of the crawler using this client
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(SweepError)` - Invalid header, proxy, certificate, or builder failure
pub fn build_http_client(
    config: &HttpConfig,
    site_headers: &BTreeMap<String, String>,
) -> Result<Client, SweepError> {
    let mut merged = site_headers.clone();
    merged.extend(config.headers.clone());
    let headers = build_header_map(&merged)?;

    let timeout = Duration::from_secs(config.timeout_secs);
    let mut builder = Client::builder()
        .user_agent(config.user_agent.clone())
        .default_headers(headers)
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .pool_idle_timeout(Duration::from_secs(90))
        .cookie_store(!config.clear_cookies)
        .gzip(true)
        .brotli(true);

    if let Some(proxy) = &config.proxy {
        builder = builder.proxy(reqwest::Proxy::all(proxy.as_str())?);
    }

    if let Some(path) = &config.ca_cert {
        let pem = std::fs::read(path)?;
        builder = builder.add_root_certificate(reqwest::Certificate::from_pem(&pem)?);
    }

    if config.tls_mode == TlsMode::Tls12 {
        builder = builder
            .use_rustls_tls()
            .max_tls_version(reqwest::tls::Version::TLS_1_2);
    }

    Ok(builder.build()?)
}

fn build_header_map(headers: &BTreeMap<String, String>) -> Result<HeaderMap, SweepError> {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| ConfigError::Validation(format!("Invalid header name '{}'", name)))?;
        let header_value = HeaderValue::from_str(value).map_err(|_| {
            ConfigError::Validation(format!("Invalid value for header '{}'", name))
        })?;
        map.insert(header_name, header_value);
    }
    Ok(map)
}

async fn fetch_once(
    client: &Client,
    url: &str,
    query: &[(String, String)],
    timeout: Option<Duration>,
) -> FetchResult {
    let mut request = client.get(url).query(query);
    if let Some(timeout) = timeout {
        request = request.timeout(timeout);
    }

    match request.send().await {
        Ok(response) => {
            let status = response.status();
            let final_url = response.url().to_string();

            if status != StatusCode::OK {
                return FetchResult::HttpError {
                    status_code: status.as_u16(),
                };
            }

            match response.text().await {
                Ok(body) => FetchResult::Success {
                    final_url,
                    status_code: status.as_u16(),
                    body,
                },
                Err(e) => FetchResult::NetworkError {
                    timed_out: e.is_timeout(),
                    error: e.to_string(),
                },
            }
        }
        Err(e) => {
            if e.is_timeout() {
                FetchResult::NetworkError {
                    error: "Request timeout".to_string(),
                    timed_out: true,
                }
            } else if e.is_connect() {
                FetchResult::NetworkError {
                    error: format!("Connection failed: {}", e),
                    timed_out: false,
                }
            } else {
                FetchResult::NetworkError {
                    error: e.to_string(),
                    timed_out: false,
                }
            }
        }
    }
}

fn should_retry(result: &FetchResult) -> bool {
    match result {
        FetchResult::Success { .. } => false,
        FetchResult::HttpError { status_code } => RETRYABLE_STATUSES.contains(status_code),
        FetchResult::NetworkError { timed_out, .. } => !timed_out,
    }
}

/// Mutable state of one crawler run
///
/// Owned by a single `scrape` call and dropped with it; concurrent searches
/// never share a session.
pub struct CrawlSession {
    http: HttpSession,
    policy: PagePolicy,
    current_request: SearchRequest,
    seen_ids: HashSet<String>,
    pages_fetched: u32,
}

impl CrawlSession {
    pub fn new(http: HttpSession, policy: PagePolicy, request: SearchRequest) -> Self {
        Self {
            http,
            policy,
            current_request: request,
            seen_ids: HashSet::new(),
            pages_fetched: 0,
        }
    }

    pub fn request(&self) -> &SearchRequest {
        &self.current_request
    }

    pub fn policy(&self) -> &PagePolicy {
        &self.policy
    }

    pub fn http(&self) -> &HttpSession {
        &self.http
    }

    pub fn pages_fetched(&self) -> u32 {
        self.pages_fetched
    }

    /// Fetches one search-result page, counting it against the page ceiling
    pub async fn fetch_search_page(&mut self, url: &str, query: &[(String, String)]) -> FetchResult {
        self.pages_fetched += 1;
        self.http.get(url, query, None).await
    }

    /// Records a posting id; returns false if it was already seen this run
    pub fn remember(&mut self, id: &str) -> bool {
        self.seen_ids.insert(id.to_string())
    }
}
