// src/crawl/testing.rs
// =============================================================================
// An in-memory PageSource for crawler tests.
//
// Pages are registered with their words and links up front. Unknown URLs
// fail with HTTP 404, and every fetch is counted so tests can check that a
// page was downloaded at most once.
// =============================================================================

use std::collections::HashMap;
use std::time::Duration;

use dashmap::DashMap;
use futures::future::{BoxFuture, FutureExt};

use crate::page::{PageContent, PageError, PageSource};

#[derive(Default)]
pub struct FakePageSource {
    pages: HashMap<String, PageContent>,
    fetches: DashMap<String, usize>,
    delay: Option<Duration>,
}

impl FakePageSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a page with the given words (each counted once per
    /// occurrence in the slice) and links.
    pub fn page(mut self, url: &str, words: &[&str], links: &[&str]) -> Self {
        let mut word_counts = HashMap::new();
        for word in words {
            *word_counts.entry(word.to_string()).or_insert(0) += 1;
        }
        self.pages.insert(
            url.to_string(),
            PageContent {
                word_counts,
                links: links.iter().map(|l| l.to_string()).collect(),
            },
        );
        self
    }

    /// Every fetch sleeps this long (on the tokio clock) before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn fetch_count(&self, url: &str) -> usize {
        self.fetches.get(url).map_or(0, |count| *count)
    }

    pub fn total_fetches(&self) -> usize {
        self.fetches.iter().map(|entry| *entry.value()).sum()
    }
}

impl PageSource for FakePageSource {
    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<PageContent, PageError>> {
        async move {
            *self.fetches.entry(url.to_string()).or_insert(0) += 1;

            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }

            self.pages.get(url).cloned().ok_or(PageError::Status(404))
        }
        .boxed()
    }
}
