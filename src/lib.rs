//! jobsweep: a job-board aggregation engine
//!
//! This crate turns one abstract search request into a normalized list of job
//! postings by running pluggable, site-specific crawlers over raw search-result
//! HTML. Site failures degrade gracefully: a blocked or broken board yields
//! fewer postings, never an error.

pub mod config;
pub mod crawler;
pub mod location;
pub mod model;
pub mod output;
pub mod search;

use thiserror::Error;

/// Main error type for jobsweep operations
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Unknown site name: {0}")]
    UnknownSite(String),
}

/// Search request validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("search term cannot be empty")]
    EmptySearchTerm,

    #[error("results_wanted must be between 1 and {max}, got {got}")]
    ResultsOutOfRange { got: usize, max: usize },
}

/// Result type alias for jobsweep operations
pub type Result<T> = std::result::Result<T, SweepError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::SiteCrawler;
pub use location::{Classification, Country, Location, LocationClassifier};
pub use model::{JobPosting, SearchRequest, Site};
pub use search::JobSearch;
