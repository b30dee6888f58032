//! Page pacing for a single crawler run
//!
//! This module handles:
//! - The hard ceiling on search pages fetched per run
//! - The randomized pause between consecutive pages

use crate::config::PacingConfig;
use rand::Rng;
use std::time::Duration;

/// Page ceiling and inter-page jitter for one crawler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagePolicy {
    /// Maximum search pages fetched per run, regardless of results wanted
    pub max_pages: u32,

    /// Fixed part of the pause between pages
    pub page_delay_base: Duration,

    /// Upper bound of the uniformly random part of the pause
    pub page_delay_jitter: Duration,
}

impl PagePolicy {
    pub fn new(max_pages: u32, page_delay_base: Duration, page_delay_jitter: Duration) -> Self {
        Self {
            max_pages,
            page_delay_base,
            page_delay_jitter,
        }
    }

    /// A policy with no pauses, for tests and local fixtures
    pub fn immediate(max_pages: u32) -> Self {
        Self::new(max_pages, Duration::ZERO, Duration::ZERO)
    }

    /// Returns true while `page` (1-based) is within the ceiling
    pub fn allows_page(&self, page: u32) -> bool {
        page >= 1 && page <= self.max_pages
    }

    /// Draws the next pause: `base + uniform(0, jitter)`
    pub fn next_delay(&self) -> Duration {
        let jitter_ms = self.page_delay_jitter.as_millis() as u64;
        if jitter_ms == 0 {
            return self.page_delay_base;
        }
        let extra = rand::thread_rng().gen_range(0..=jitter_ms);
        self.page_delay_base + Duration::from_millis(extra)
    }

    /// Sleeps for one randomized inter-page pause
    pub async fn pause(&self) {
        let delay = self.next_delay();
        if delay.is_zero() {
            return;
        }
        tracing::debug!("Pausing {:?} before next page", delay);
        tokio::time::sleep(delay).await;
    }
}

impl From<&PacingConfig> for PagePolicy {
    fn from(config: &PacingConfig) -> Self {
        Self::new(
            config.max_pages,
            Duration::from_millis(config.page_delay_base_ms),
            Duration::from_millis(config.page_delay_jitter_ms),
        )
    }
}
