//! Remote-filter backfill loop
//!
//! When a search asks for remote-only (or on-site-only) postings, crawlers
//! cannot always filter server-side, so the loop over-fetches, filters
//! locally and, if still short, issues exactly one supplementary round.
//! The combined size requested across rounds never exceeds the cap.

use crate::config::SearchConfig;
use crate::model::{JobPosting, SearchRequest};
use async_trait::async_trait;
use std::collections::HashSet;

/// One fetch round: select sites, crawl, normalize
#[async_trait]
pub trait RoundFetcher: Send + Sync {
    async fn fetch_round(&self, request: &SearchRequest) -> Vec<JobPosting>;
}

/// Sizes and bounds of the backfill loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackfillPolicy {
    pub over_fetch_multiplier: usize,
    /// Hard cap on postings requested across all rounds
    pub max_results: usize,
    /// 1 disables the supplementary round
    pub max_rounds: usize,
}

impl Default for BackfillPolicy {
    fn default() -> Self {
        Self {
            over_fetch_multiplier: 3,
            max_results: 200,
            max_rounds: 2,
        }
    }
}

impl From<&SearchConfig> for BackfillPolicy {
    fn from(config: &SearchConfig) -> Self {
        Self {
            over_fetch_multiplier: config.over_fetch_multiplier,
            max_results: config.max_results,
            max_rounds: config.max_backfill_rounds,
        }
    }
}

impl BackfillPolicy {
    /// Size of the first, over-fetching round
    pub fn initial_size(&self, wanted: usize) -> usize {
        wanted
            .saturating_mul(self.over_fetch_multiplier)
            .min(self.max_results)
            .max(1)
    }

    /// Size of the supplementary round, or `None` when it must not run
    pub fn supplementary_size(&self, initial: usize, shortfall: usize) -> Option<usize> {
        if shortfall == 0 || self.max_rounds < 2 || initial >= self.max_results {
            return None;
        }
        let size = shortfall
            .saturating_mul(2)
            .min(self.max_results - initial);
        (size > 0).then_some(size)
    }
}

/// Runs a search, applying the remote/on-site filter with bounded backfill
///
/// Without a filter the request is fetched once, unchanged. The result is
/// always truncated to `results_wanted`, keeping round and site order.
pub async fn search_with_filter<F>(
    fetcher: &F,
    request: &SearchRequest,
    policy: &BackfillPolicy,
) -> Vec<JobPosting>
where
    F: RoundFetcher + ?Sized,
{
    let wanted = request.results_wanted();

    let Some(remote) = request.is_remote() else {
        let mut postings = fetcher.fetch_round(request).await;
        postings.truncate(wanted);
        return postings;
    };

    let initial = policy.initial_size(wanted);
    let mut collected: Vec<JobPosting> = Vec::new();
    let mut seen_urls: HashSet<String> = HashSet::new();

    let first = fetch_sized(fetcher, request, initial, 0).await;
    merge_filtered(&mut collected, &mut seen_urls, first, remote);
    tracing::info!(
        "Remote filter ({}): {} of {} wanted after initial round of {}",
        remote,
        collected.len(),
        wanted,
        initial
    );

    let shortfall = wanted.saturating_sub(collected.len());
    if let Some(extra) = policy.supplementary_size(initial, shortfall) {
        tracing::info!("Backfilling {} short: requesting {} more", shortfall, extra);
        // Each crawler resumes after the postings it returned in the first round
        let more = fetch_sized(fetcher, request, extra, initial).await;
        merge_filtered(&mut collected, &mut seen_urls, more, remote);
    }

    collected.truncate(wanted);
    collected
}

async fn fetch_sized<F>(
    fetcher: &F,
    request: &SearchRequest,
    size: usize,
    offset: usize,
) -> Vec<JobPosting>
where
    F: RoundFetcher + ?Sized,
{
    match request.with_results_wanted(size) {
        Ok(sized) => fetcher.fetch_round(&sized.with_offset(offset)).await,
        Err(e) => {
            tracing::warn!("Cannot resize request to {}: {}", size, e);
            fetcher.fetch_round(request).await
        }
    }
}

/// Appends postings whose remote flag matches, skipping already-seen URLs
fn merge_filtered(
    collected: &mut Vec<JobPosting>,
    seen_urls: &mut HashSet<String>,
    postings: Vec<JobPosting>,
    remote: bool,
) {
    for posting in postings {
        if posting.is_remote.unwrap_or(false) != remote {
            continue;
        }
        if !posting.job_url.is_empty() && !seen_urls.insert(posting.job_url.clone()) {
            continue;
        }
        collected.push(posting);
    }
}
