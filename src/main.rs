//! Webtrail main entry point
//!
//! Command-line interface for the Webtrail single-domain crawler.

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use webtrail::config::{load_config, validate, Config};
use webtrail::report::ReportWriter;
use webtrail::Crawler;

/// Webtrail: a single-domain web crawler with safe redirect handling
///
/// Webtrail crawls every reachable page on the seed URL's domain,
/// follows redirects manually so it can classify loops instead of
/// hanging on them, and writes a timestamped report for each run.
#[derive(Parser, Debug)]
#[command(name = "webtrail")]
#[command(version = "0.1.0")]
#[command(about = "A single-domain web crawler", long_about = None)]
struct Cli {
    /// Seed URL to start crawling from
    #[arg(value_name = "URL")]
    url: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Delay between requests in milliseconds
    #[arg(long, value_name = "MS")]
    delay_ms: Option<u64>,

    /// Maximum redirect hops before giving up on a URL
    #[arg(long, value_name = "N")]
    max_redirects: Option<usize>,

    /// Maximum concurrent requests
    #[arg(long, value_name = "N")]
    max_concurrent: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout_secs: Option<u64>,

    /// User-Agent header to send
    #[arg(long, value_name = "AGENT")]
    user_agent: Option<String>,

    /// Directory where run reports are written
    #[arg(long, value_name = "DIR")]
    runs_dir: Option<String>,

    /// Skip writing the run report
    #[arg(long)]
    no_report: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;

    let crawler = Crawler::new(config.clone())?;
    let result = match crawler.crawl(&cli.url).await {
        Ok(result) => result,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    // Sorted output so runs are comparable
    let mut found: Vec<&String> = result.urls.iter().collect();
    found.sort();
    println!("Found {} URLs:", found.len());
    for url in found {
        println!("{}", url);
    }
    println!(
        "Visited: {}, errors: {}, redirects: {}",
        result.visited_count, result.error_count, result.redirect_count
    );

    if !cli.no_report {
        let writer = ReportWriter::new(&config.output.runs_dir);
        let run_dir = writer.write(&cli.url, &result)?;
        println!("Report: {}", run_dir.display());
    }

    Ok(())
}

/// Loads the config file (if given) and applies CLI overrides on top
fn build_config(cli: &Cli) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)?
        }
        None => Config::default(),
    };

    if let Some(delay_ms) = cli.delay_ms {
        config.crawler.delay_ms = delay_ms;
    }
    if let Some(max_redirects) = cli.max_redirects {
        config.crawler.max_redirects = max_redirects;
    }
    if let Some(max_concurrent) = cli.max_concurrent {
        config.crawler.max_concurrent = max_concurrent;
    }
    if let Some(timeout_secs) = cli.timeout_secs {
        config.crawler.timeout_secs = timeout_secs;
    }
    if let Some(user_agent) = &cli.user_agent {
        config.crawler.user_agent = user_agent.clone();
    }
    if let Some(runs_dir) = &cli.runs_dir {
        config.output.runs_dir = runs_dir.clone();
    }

    // Overrides can invalidate a config the file-level validation passed
    validate(&config)?;
    Ok(config)
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("webtrail=info,warn"),
            1 => EnvFilter::new("webtrail=debug,info"),
            2 => EnvFilter::new("webtrail=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
