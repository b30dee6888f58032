//! Configuration module for jobsweep
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Crawler selectors, headers and pacing all live here as immutable structs that
//! are handed to each crawler at construction.
//!
//! # Example
//!
//! ```no_run
//! use jobsweep::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("jobsweep.toml")).unwrap();
//! println!("BDJobs page ceiling: {}", config.bdjobs.pacing.max_pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    BdjobsConfig, Config, HttpConfig, LinkedinConfig, PacingConfig, PacingOverrides,
    SearchConfig, TlsMode,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::{validate, MAX_RESULTS_CAP};
