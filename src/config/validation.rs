use crate::config::types::{
    BdjobsConfig, Config, HttpConfig, LinkedinConfig, PacingConfig, SearchConfig,
};
use crate::location::Country;
use crate::model::Site;
use crate::ConfigError;
use url::Url;

/// Hard ceiling on postings one search may request, across all rounds
pub const MAX_RESULTS_CAP: usize = 200;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_search_config(&config.search)?;
    validate_http_config(&config.http)?;
    validate_bdjobs_config(&config.bdjobs)?;
    validate_linkedin_config(&config.linkedin)?;
    Ok(())
}

fn validate_search_config(config: &SearchConfig) -> Result<(), ConfigError> {
    if config.max_results < 1 || config.max_results > MAX_RESULTS_CAP {
        return Err(ConfigError::Validation(format!(
            "max_results must be between 1 and {}, got {}",
            MAX_RESULTS_CAP, config.max_results
        )));
    }

    if config.over_fetch_multiplier < 1 {
        return Err(ConfigError::Validation(format!(
            "over_fetch_multiplier must be >= 1, got {}",
            config.over_fetch_multiplier
        )));
    }

    // One initial round plus at most one supplementary round
    if config.max_backfill_rounds < 1 || config.max_backfill_rounds > 2 {
        return Err(ConfigError::Validation(format!(
            "max_backfill_rounds must be 1 or 2, got {}",
            config.max_backfill_rounds
        )));
    }

    if Country::from_code(&config.default_country).is_none() {
        return Err(ConfigError::Validation(format!(
            "default_country '{}' is not a supported country code",
            config.default_country
        )));
    }

    for name in &config.baseline_sites {
        match name.parse::<Site>() {
            Ok(Site::Unknown) | Err(_) => return Err(ConfigError::UnknownSite(name.clone())),
            Ok(_) => {}
        }
    }

    Ok(())
}

fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "timeout_secs must be >= 1".to_string(),
        ));
    }

    if let Some(proxy) = &config.proxy {
        Url::parse(proxy)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid proxy '{}': {}", proxy, e)))?;
    }

    if let Some(path) = &config.ca_cert {
        if path.trim().is_empty() {
            return Err(ConfigError::Validation(
                "ca_cert path cannot be empty".to_string(),
            ));
        }
    }

    Ok(())
}

fn validate_bdjobs_config(config: &BdjobsConfig) -> Result<(), ConfigError> {
    validate_http_url("bdjobs.base_url", &config.base_url)?;
    validate_http_url("bdjobs.search_url", &config.search_url)?;
    validate_pacing("bdjobs", &config.pacing)?;

    if config.listing_selectors.is_empty() {
        return Err(ConfigError::Validation(
            "bdjobs.listing_selectors must name at least one selector".to_string(),
        ));
    }

    for selector in &config.listing_selectors {
        scraper::Selector::parse(selector).map_err(|_| {
            ConfigError::Validation(format!("Invalid listing selector '{}'", selector))
        })?;
    }

    if config.detail_link_marker.trim().is_empty() {
        return Err(ConfigError::Validation(
            "bdjobs.detail_link_marker cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_linkedin_config(config: &LinkedinConfig) -> Result<(), ConfigError> {
    validate_http_url("linkedin.search_url", &config.search_url)?;
    validate_pacing("linkedin", &config.pacing)?;

    if config.page_size == 0 {
        return Err(ConfigError::Validation(
            "linkedin.page_size must be >= 1".to_string(),
        ));
    }

    Ok(())
}

fn validate_pacing(section: &str, pacing: &PacingConfig) -> Result<(), ConfigError> {
    if pacing.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "{}.max_pages must be >= 1, got {}",
            section, pacing.max_pages
        )));
    }
    Ok(())
}

/// Validates that a configured endpoint is an absolute HTTP(S) URL
fn validate_http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", field, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} must use HTTP or HTTPS, got '{}'",
            field, value
        )));
    }

    Ok(())
}
