//! jobsweep main entry point
//!
//! This is the command-line interface for the jobsweep job-board aggregator.

use anyhow::Context;
use clap::Parser;
use jobsweep::config::{load_config_with_hash, validate, Config};
use jobsweep::output::{write_response, Format, SearchResponse};
use jobsweep::{JobSearch, SearchRequest};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// jobsweep: search several job boards at once
///
/// jobsweep runs the crawlers that apply to a location, normalizes their
/// postings and prints them as JSON or a markdown report. Boards that block
/// or fail simply contribute fewer postings.
#[derive(Parser, Debug)]
#[command(name = "jobsweep")]
#[command(version)]
#[command(about = "Aggregate job postings from multiple job boards", long_about = None)]
struct Cli {
    /// Search keyword(s)
    #[arg(value_name = "TERM")]
    term: String,

    /// Location to search in (city, region or country)
    #[arg(short, long, default_value = "")]
    location: String,

    /// Number of postings wanted (1-200)
    #[arg(short, long, default_value_t = 20)]
    results: usize,

    /// Only postings newer than this many hours
    #[arg(long)]
    hours_old: Option<u32>,

    /// Only remote postings
    #[arg(long, conflicts_with = "onsite")]
    remote: bool,

    /// Only on-site postings
    #[arg(long, conflicts_with = "remote")]
    onsite: bool,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Output format: json or markdown
    #[arg(short, long, default_value = "json")]
    format: Format,

    /// Write output to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Show site selection and configuration without fetching anything
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    fn remote_filter(&self) -> Option<bool> {
        match (self.remote, self.onsite) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load config {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            let config = Config::default();
            validate(&config).context("built-in configuration is invalid")?;
            config
        }
    };

    let request = SearchRequest::new(&cli.term, &cli.location, cli.results)?
        .with_hours_old(cli.hours_old)
        .with_remote(cli.remote_filter());

    let engine = match build_engine(config, &request) {
        Ok(engine) => engine,
        Err(response) => {
            write_response(&response, cli.format, cli.output.as_deref())
                .context("failed to write search results")?;
            anyhow::bail!("{}", response.message);
        }
    };

    if cli.dry_run {
        handle_dry_run(&engine, &request);
        return Ok(());
    }

    let jobs = engine.search(&request).await;
    let response = SearchResponse::from_results(&request, jobs);
    tracing::info!("{}", response.message);

    write_response(&response, cli.format, cli.output.as_deref())
        .context("failed to write search results")?;

    if let Some(path) = &cli.output {
        tracing::info!("Results written to: {}", path.display());
    }

    Ok(())
}

/// Builds the engine, or the failure response to report instead
fn build_engine(config: Config, request: &SearchRequest) -> Result<JobSearch, SearchResponse> {
    JobSearch::from_config(config).map_err(|e| {
        tracing::error!("Failed to build crawlers: {}", e);
        SearchResponse::failure(request, &e.to_string())
    })
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so stdout carries only the rendered results.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("jobsweep=info,warn"),
            1 => EnvFilter::new("jobsweep=debug,info"),
            2 => EnvFilter::new("jobsweep=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows what a search would do
fn handle_dry_run(engine: &JobSearch, request: &SearchRequest) {
    let config = engine.config();
    let classification = engine.classify(request.location());
    let sites = engine.select_sites(request.location());

    println!("=== jobsweep Dry Run ===\n");

    println!("Search:");
    println!("  Term: {}", request.search_term());
    println!("  Location: {:?}", request.location());
    println!("  Results wanted: {}", request.results_wanted());
    println!("  Remote filter: {:?}", request.is_remote());
    println!(
        "  Country: {} ({})",
        classification.country,
        classification.country_code()
    );

    println!("\nSelected Sites ({}):", sites.len());
    for site in &sites {
        println!("  - {}", site);
    }
    println!(
        "  Recency filter: {:?} hours",
        engine.effective_hours_old(request, &sites)
    );

    println!("\nHTTP:");
    println!("  Timeout: {}s", config.http.timeout_secs);
    println!("  Retries: {}", config.http.retries);
    println!("  Proxy: {}", config.http.proxy.as_deref().unwrap_or("none"));
    println!("  TLS mode: {:?}", config.http.tls_mode);

    println!("\nBDJobs:");
    println!("  Search URL: {}", config.bdjobs.search_url);
    println!("  Max pages: {}", config.bdjobs.pacing.max_pages);
    println!(
        "  Page delay: {}ms + up to {}ms",
        config.bdjobs.pacing.page_delay_base_ms, config.bdjobs.pacing.page_delay_jitter_ms
    );
    println!("  Fetch details: {}", config.bdjobs.fetch_details);

    println!("\nLinkedIn:");
    println!("  Search URL: {}", config.linkedin.search_url);
    println!("  Max pages: {}", config.linkedin.pacing.max_pages);

    println!("\n✓ Configuration is valid");
}
