// src/crawl/state.rs
// =============================================================================
// State shared by every traversal step of one crawl.
//
// - deadline: fixed when the crawl starts, read-only afterwards; None when
//   the timeout is too large to land on the clock
// - ignored_urls: read-only
// - visited: DashSet, insert() is the atomic claim
// - counts: DashMap, merged entry by entry
//
// Only the two dash collections are mutated, and both lock internally, so
// any number of tasks can share a CrawlState through an Arc.
// =============================================================================

use std::collections::HashMap;
use std::time::Duration;

use dashmap::{DashMap, DashSet};
use regex::Regex;
use tokio::time::Instant;
use tracing::debug;

use super::ranking::rank;
use super::CrawlResult;
use crate::config::matches_any;
use crate::page::PageSource;

pub struct CrawlState {
    deadline: Option<Instant>,
    ignored_urls: Vec<Regex>,
    visited: DashSet<String>,
    counts: DashMap<String, u64>,
}

impl CrawlState {
    pub fn new(timeout: Duration, ignored_urls: Vec<Regex>) -> Self {
        Self {
            deadline: Instant::now().checked_add(timeout),
            ignored_urls,
            visited: DashSet::new(),
            counts: DashMap::new(),
        }
    }

    /// True once the deadline has passed.
    pub fn expired(&self) -> bool {
        self.deadline
            .is_some_and(|deadline| Instant::now() >= deadline)
    }

    /// Decides whether the step `(url, depth)` may go ahead, and if so
    /// claims `url` for the caller. Returns false when the step must stop.
    pub fn claim(&self, url: &str, depth: usize) -> bool {
        if depth == 0 || self.expired() {
            return false;
        }
        if matches_any(&self.ignored_urls, url) {
            return false;
        }
        self.visited.insert(url.to_string())
    }

    /// Fetches a claimed page and merges its words. Returns the links to
    /// follow, or None if the page could not be fetched.
    pub async fn fetch_and_merge(&self, source: &dyn PageSource, url: &str) -> Option<Vec<String>> {
        match source.fetch(url).await {
            Ok(page) => {
                debug!(url, words = page.word_counts.len(), links = page.links.len(), "visited page");
                self.merge(page.word_counts);
                Some(page.links)
            }
            Err(err) => {
                debug!(url, error = %err, "skipping page");
                None
            }
        }
    }

    fn merge(&self, counts: HashMap<String, u64>) {
        for (word, count) in counts {
            *self.counts.entry(word).or_insert(0) += count;
        }
    }

    /// Builds the final result. Only meaningful once every step has finished.
    pub fn result(&self, popular_word_count: usize) -> CrawlResult {
        let urls_visited = self.visited.len();

        if self.counts.is_empty() {
            return CrawlResult::new(Vec::new(), urls_visited);
        }

        let counts = self
            .counts
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()));

        CrawlResult::new(rank(counts, popular_word_count), urls_visited)
    }
}
