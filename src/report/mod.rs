//! Crawl report generation
//!
//! Each run gets its own timestamped directory under the configured runs
//! directory, holding a human-readable details file plus newline-delimited
//! URL lists for everything found, every error and every redirect. URL
//! lists are sorted so diffing two runs of the same site is meaningful.

use crate::crawler::CrawlResult;
use crate::Result;
use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Writes crawl reports into per-run directories
pub struct ReportWriter {
    runs_dir: PathBuf,
}

impl ReportWriter {
    pub fn new(runs_dir: impl Into<PathBuf>) -> Self {
        Self {
            runs_dir: runs_dir.into(),
        }
    }

    /// Writes the full report for one run and returns its directory
    ///
    /// The directory is named after the crawl's start time so consecutive
    /// runs sort chronologically.
    pub fn write(&self, seed: &str, result: &CrawlResult) -> Result<PathBuf> {
        let run_dir = self
            .runs_dir
            .join(result.started_at.format("%Y-%m-%d_%H-%M-%S").to_string());
        fs::create_dir_all(&run_dir)?;

        let details = format_run_details(seed, result);
        let mut file = fs::File::create(run_dir.join("run_details.txt"))?;
        file.write_all(details.as_bytes())?;

        write_url_list(&run_dir.join("all_found_urls.txt"), &result.urls)?;
        write_url_list(&run_dir.join("all_error_urls.txt"), &result.error_urls)?;
        write_url_list(&run_dir.join("all_redirect_urls.txt"), &result.redirect_urls)?;

        tracing::info!("Report written to {}", run_dir.display());
        Ok(run_dir)
    }
}

/// Formats the run summary as plain text
pub fn format_run_details(seed: &str, result: &CrawlResult) -> String {
    let elapsed = result.finished_at - result.started_at;
    let elapsed_secs = elapsed.num_milliseconds() as f64 / 1000.0;

    let mut out = String::new();
    out.push_str(&format!("Base URL: {}\n", seed));
    out.push_str(&format!(
        "Start Time: {}\n",
        result.started_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    out.push_str(&format!(
        "End Time: {}\n",
        result.finished_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    out.push_str(&format!("Total Time: {:.2}s\n", elapsed_secs));
    out.push_str(&format!("URLs Found: {}\n", result.urls.len()));
    out.push_str(&format!("URLs Visited: {}\n", result.visited_count));
    out.push_str(&format!("Error URLs: {}\n", result.error_urls.len()));
    out.push_str(&format!("Redirect URLs: {}\n", result.redirect_urls.len()));
    out.push_str(&format!("Total Errors: {}\n", result.error_count));
    out.push_str(&format!("Total Redirects: {}\n", result.redirect_count));
    out
}

/// Writes a URL set to `path`, one per line, lexicographically sorted
fn write_url_list(path: &Path, urls: &HashSet<String>) -> Result<()> {
    let mut sorted: Vec<&String> = urls.iter().collect();
    sorted.sort();

    let mut file = fs::File::create(path)?;
    for url in sorted {
        writeln!(file, "{}", url)?;
    }
    Ok(())
}
