//! Crawl orchestration
//!
//! The orchestrator drains the frontier in waves: each batch is dispatched
//! to semaphore-gated workers, every worker resolves redirects and extracts
//! links, and the results are merged back sequentially. Workers return pure
//! values and never touch shared state, so the visited set, the frontier
//! and the counters need no locking: they are only mutated between batches.

use crate::config::Config;
use crate::crawler::fetcher::{FetchOutcome, HttpResolver, RedirectResolver};
use crate::crawler::frontier::Frontier;
use crate::crawler::parser::extract_links;
use crate::crawler::redirect::RedirectLoop;
use crate::url::{canonicalize, extract_domain};
use crate::verify::{SeedGate, StandardGate};
use crate::{CrawlError, UrlError};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Semaphore;
use url::Url;

/// Immutable snapshot of a completed crawl
#[derive(Debug, Clone)]
pub struct CrawlResult {
    /// Canonical URLs the crawl attempted, including ones that errored
    pub urls: HashSet<String>,

    /// Distinct canonical URLs marked visited (includes redirect targets)
    pub visited_count: usize,

    /// Number of per-URL failures (network, loops, HTTP >= 400)
    pub error_count: usize,

    /// Number of URLs whose resolution followed at least one redirect hop
    pub redirect_count: usize,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// Original URLs that ended in a per-URL failure
    pub error_urls: HashSet<String>,

    /// Original URLs whose chain had more than one entry
    pub redirect_urls: HashSet<String>,
}

/// What a worker concluded about one URL; pure data, merged sequentially
#[derive(Debug)]
enum PageVerdict {
    /// Content below 400 was reached; links are canonical and same-domain
    Page { links: Vec<String> },
    /// Content with status >= 400
    HttpError { status: u16 },
    NetworkFailure { error: String },
    RedirectLoop(RedirectLoop),
}

#[derive(Debug)]
struct WorkerOutcome {
    /// Canonical URL that was dequeued
    requested: String,
    /// Canonical form of the last URL in the chain
    final_url: String,
    /// Whether at least one redirect hop was followed
    redirected: bool,
    verdict: PageVerdict,
}

/// The crawl orchestrator
///
/// Holds its redirect resolver and seed gate as injected capabilities;
/// `new` wires the production implementations, `with_parts` lets tests
/// substitute instrumented ones.
pub struct Crawler {
    config: Config,
    resolver: Arc<dyn RedirectResolver>,
    gate: Arc<dyn SeedGate>,
}

impl Crawler {
    /// Creates a crawler with the HTTP resolver and the standard seed gate
    pub fn new(config: Config) -> Result<Self, CrawlError> {
        let resolver = Arc::new(HttpResolver::new(&config.crawler)?);
        let gate = Arc::new(StandardGate::new(&config.crawler.user_agent)?);
        Ok(Self {
            config,
            resolver,
            gate,
        })
    }

    /// Creates a crawler from explicit capability implementations
    pub fn with_parts(
        config: Config,
        resolver: Arc<dyn RedirectResolver>,
        gate: Arc<dyn SeedGate>,
    ) -> Self {
        Self {
            config,
            resolver,
            gate,
        }
    }

    /// Crawls the site rooted at `seed`, restricted to the seed's domain
    ///
    /// The raw seed goes through the admission gate first; a rejection
    /// aborts the whole crawl with no partial result. Per-URL failures
    /// after that never abort the crawl.
    pub async fn crawl(&self, seed: &str) -> Result<CrawlResult, CrawlError> {
        self.gate
            .verify(seed)
            .await
            .map_err(|reason| CrawlError::SeedInvalid {
                url: seed.to_string(),
                reason,
            })?;

        let canonical_seed = canonicalize(seed);
        let seed_url = Url::parse(&canonical_seed)?;
        let base_domain = extract_domain(&seed_url).ok_or(UrlError::MissingDomain)?;

        let started_at = Utc::now();
        tracing::info!("Starting crawl of {}", seed);
        tracing::info!("Domain: {}", base_domain);
        tracing::info!(
            "Delay: {}ms, max redirects: {}, max concurrent: {}",
            self.config.crawler.delay_ms,
            self.config.crawler.max_redirects,
            self.config.crawler.max_concurrent
        );

        // Fresh state per crawl; nothing carries over between runs
        let mut frontier = Frontier::new();
        frontier.enqueue(canonical_seed);

        let mut urls: HashSet<String> = HashSet::new();
        let mut error_urls: HashSet<String> = HashSet::new();
        let mut redirect_urls: HashSet<String> = HashSet::new();
        let mut error_count = 0usize;
        let mut redirect_count = 0usize;

        let semaphore = Arc::new(Semaphore::new(self.config.crawler.max_concurrent));
        let delay = self.config.crawler.delay();

        loop {
            let batch = frontier.dequeue_batch(self.config.crawler.max_concurrent, &base_domain);
            if batch.is_empty() {
                tracing::debug!("Frontier drained, crawl complete");
                break;
            }

            let mut handles = Vec::with_capacity(batch.len());
            for url in &batch {
                let resolver = Arc::clone(&self.resolver);
                let semaphore = Arc::clone(&semaphore);
                let url = url.clone();
                let base_domain = base_domain.clone();
                handles.push(tokio::spawn(async move {
                    // The semaphore is never closed; ok() just keeps the
                    // permit alive for the worker's lifetime
                    let _permit = semaphore.acquire_owned().await.ok();
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    crawl_single(resolver, url, base_domain).await
                }));
            }

            // Sequential merge: the only place shared state is mutated.
            // One worker failing must not fail its siblings.
            for (url, handle) in batch.into_iter().zip(handles) {
                let outcome = match handle.await {
                    Ok(outcome) => outcome,
                    Err(e) => {
                        tracing::error!("Worker for {} failed: {}", url, e);
                        frontier.mark_visited(&url);
                        urls.insert(url.clone());
                        error_count += 1;
                        error_urls.insert(url);
                        continue;
                    }
                };

                frontier.mark_visited(&outcome.requested);
                urls.insert(outcome.requested.clone());

                // Counted regardless of the terminal outcome
                if outcome.redirected {
                    redirect_count += 1;
                    redirect_urls.insert(outcome.requested.clone());
                }

                if let PageVerdict::RedirectLoop(detected) = &outcome.verdict {
                    tracing::warn!("Redirect loop for {}: {}", outcome.requested, detected);
                    error_count += 1;
                    error_urls.insert(outcome.requested);
                    continue;
                }

                if outcome.final_url != outcome.requested {
                    let final_domain = Url::parse(&outcome.final_url)
                        .ok()
                        .and_then(|u| extract_domain(&u));
                    if final_domain.as_deref() != Some(base_domain.as_str()) {
                        tracing::info!("Redirected to external domain: {}", outcome.final_url);
                        continue;
                    }
                    if frontier.is_visited(&outcome.final_url) {
                        tracing::info!("Final URL already visited: {}", outcome.final_url);
                        continue;
                    }
                    // The redirect target was fetched as part of this
                    // resolution; marking it visited stops a later re-fetch
                    frontier.mark_visited(&outcome.final_url);
                }

                match outcome.verdict {
                    PageVerdict::NetworkFailure { error } => {
                        tracing::warn!("Failed to fetch {}: {}", outcome.requested, error);
                        error_count += 1;
                        error_urls.insert(outcome.requested);
                    }
                    PageVerdict::HttpError { status } => {
                        tracing::warn!("HTTP {} error for {}", status, outcome.requested);
                        error_count += 1;
                        error_urls.insert(outcome.requested);
                    }
                    PageVerdict::Page { links } => {
                        for link in links {
                            frontier.enqueue(link);
                        }
                    }
                    // Handled before the redirect checks
                    PageVerdict::RedirectLoop(_) => {}
                }
            }
        }

        let finished_at = Utc::now();
        let result = CrawlResult {
            visited_count: frontier.visited_count(),
            urls,
            error_count,
            redirect_count,
            started_at,
            finished_at,
            error_urls,
            redirect_urls,
        };

        tracing::info!(
            "Crawl completed: {} URLs found, {} errors, {} redirects",
            result.urls.len(),
            result.error_count,
            result.redirect_count
        );

        Ok(result)
    }
}

/// Fetches one URL and derives a pure verdict from the resolution
///
/// Link extraction only happens for content below 400; discovered links are
/// resolved absolute against the final URL, canonicalized, and filtered to
/// the base domain. Visited filtering is left to the merge step.
async fn crawl_single(
    resolver: Arc<dyn RedirectResolver>,
    url: String,
    base_domain: String,
) -> WorkerOutcome {
    tracing::info!("Crawling: {}", url);
    let resolution = resolver.resolve(&url).await;
    let redirected = resolution.redirected();
    let final_url = canonicalize(&resolution.final_url);

    let verdict = match resolution.outcome {
        FetchOutcome::Loop(detected) => PageVerdict::RedirectLoop(detected),
        FetchOutcome::NetworkFailure { error } => PageVerdict::NetworkFailure { error },
        FetchOutcome::Content { status, body } => {
            if status >= 400 {
                PageVerdict::HttpError { status }
            } else {
                let links = match Url::parse(&final_url) {
                    Ok(base) => extract_links(&body, &base)
                        .iter()
                        .map(|link| canonicalize(link))
                        .filter(|link| {
                            Url::parse(link)
                                .ok()
                                .and_then(|u| extract_domain(&u))
                                .map(|d| d == base_domain)
                                .unwrap_or(false)
                        })
                        .collect(),
                    Err(_) => Vec::new(),
                };
                PageVerdict::Page { links }
            }
        }
    };

    WorkerOutcome {
        requested: url,
        final_url,
        redirected,
        verdict,
    }
}
