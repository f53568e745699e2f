//! The crawl frontier: discovered-but-not-yet-fetched canonical URLs
//!
//! A FIFO queue plus the visited set. All URLs entering the frontier must
//! already be canonical; membership checks against raw URLs would break the
//! dedup invariant.

use crate::url::extract_domain;
use std::collections::{HashSet, VecDeque};
use url::Url;

/// FIFO queue of canonical URLs with idempotent insertion
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<String>,
    queued: HashSet<String>,
    visited: HashSet<String>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a canonical URL to the queue
    ///
    /// No-op when the URL was already visited or is already queued.
    pub fn enqueue(&mut self, url: String) {
        if self.visited.contains(&url) || self.queued.contains(&url) {
            return;
        }
        self.queued.insert(url.clone());
        self.queue.push_back(url);
    }

    /// Pops up to `n` dispatchable URLs in FIFO order
    ///
    /// Entries that were visited since being queued are skipped, and domain
    /// membership is re-checked at pop time: entries whose canonical form
    /// falls outside `base_domain` are dropped.
    pub fn dequeue_batch(&mut self, n: usize, base_domain: &str) -> Vec<String> {
        let mut batch = Vec::new();

        while batch.len() < n {
            let url = match self.queue.pop_front() {
                Some(url) => url,
                None => break,
            };
            self.queued.remove(&url);

            if self.visited.contains(&url) {
                continue;
            }

            let in_domain = Url::parse(&url)
                .ok()
                .and_then(|u| extract_domain(&u))
                .map(|d| d == base_domain)
                .unwrap_or(false);
            if !in_domain {
                tracing::debug!("Dropping out-of-domain frontier entry: {}", url);
                continue;
            }

            batch.push(url);
        }

        batch
    }

    /// Marks a canonical URL as visited
    pub fn mark_visited(&mut self, url: &str) {
        self.visited.insert(url.to_string());
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    /// Number of distinct canonical URLs visited so far
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }
}
