use crate::model::{JobPosting, SearchRequest};
use serde::{Deserialize, Serialize};

/// Echo of the request parameters in a response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParams {
    pub location: String,
    pub search_keyword: String,
    pub results_wanted: usize,
    pub hours_old: Option<u32>,
    pub is_remote: Option<bool>,
}

impl From<&SearchRequest> for SearchParams {
    fn from(request: &SearchRequest) -> Self {
        Self {
            location: request.location().to_string(),
            search_keyword: request.search_term().to_string(),
            results_wanted: request.results_wanted(),
            hours_old: request.hours_old(),
            is_remote: request.is_remote(),
        }
    }
}

/// Caller-facing result of one search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub success: bool,
    pub message: String,
    pub total_jobs: usize,
    pub jobs: Vec<JobPosting>,
    pub search_params: SearchParams,
    /// RFC 3339 time the response was composed
    pub timestamp: String,
}

impl SearchResponse {
    /// Composes the response for a finished search
    ///
    /// Postings beyond `results_wanted` are dropped. An empty result is still
    /// a success, with a message explaining the likely causes.
    pub fn from_results(request: &SearchRequest, mut jobs: Vec<JobPosting>) -> Self {
        if jobs.len() > request.results_wanted() {
            jobs.truncate(request.results_wanted());
            tracing::info!(
                "Limited final results to {} as requested",
                request.results_wanted()
            );
        }

        let message = if jobs.is_empty() {
            format!(
                "No jobs found for '{}' in '{}'. This could be due to site restrictions, \
                 rate limiting, or no matching jobs available.",
                request.search_term(),
                request.location()
            )
        } else {
            format!("Successfully found {} jobs", jobs.len())
        };

        Self {
            success: true,
            message,
            total_jobs: jobs.len(),
            jobs,
            search_params: SearchParams::from(request),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Composes the response for a search that could not run at all
    pub fn failure(request: &SearchRequest, error: &str) -> Self {
        Self {
            success: false,
            message: format!("Unable to complete job search: {}", error),
            total_jobs: 0,
            jobs: Vec::new(),
            search_params: SearchParams::from(request),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
