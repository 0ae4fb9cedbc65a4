// src/crawl/sequential.rs
// =============================================================================
// A crawler that fetches one page at a time.
//
// Same rules as ParallelCrawler (depth, deadline, ignoredUrls, one claim
// per URL), but links are followed depth-first, in the order they appear on
// the page, with nothing spawned. Useful as a baseline and when a site
// should not see concurrent requests.
// =============================================================================

use std::sync::Arc;
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt};
use regex::Regex;
use tracing::info;

use super::state::CrawlState;
use super::{CrawlResult, WebCrawler, WEB_CRAWLER_OPERATIONS};
use crate::config::CrawlerConfig;
use crate::page::PageSource;
use crate::profiler::Profileable;

pub struct SequentialCrawler {
    source: Arc<dyn PageSource>,
    timeout: Duration,
    popular_word_count: usize,
    max_depth: usize,
    ignored_urls: Vec<Regex>,
}

impl SequentialCrawler {
    pub fn new(source: Arc<dyn PageSource>, config: &CrawlerConfig) -> Self {
        Self {
            source,
            timeout: config.timeout,
            popular_word_count: config.popular_word_count,
            max_depth: config.max_depth,
            ignored_urls: config.ignored_urls.clone(),
        }
    }

    fn visit<'a>(&'a self, state: &'a CrawlState, url: String, depth: usize) -> BoxFuture<'a, ()> {
        async move {
            if !state.claim(&url, depth) {
                return;
            }

            if let Some(links) = state.fetch_and_merge(&*self.source, &url).await {
                for link in links {
                    self.visit(state, link, depth - 1).await;
                }
            }
        }
        .boxed()
    }
}

impl WebCrawler for SequentialCrawler {
    fn crawl<'a>(&'a self, start_urls: &'a [String]) -> BoxFuture<'a, CrawlResult> {
        async move {
            let state = CrawlState::new(self.timeout, self.ignored_urls.clone());

            info!(
                start_pages = start_urls.len(),
                max_depth = self.max_depth,
                "starting sequential crawl"
            );

            for url in start_urls {
                self.visit(&state, url.clone(), self.max_depth).await;
            }

            let result = state.result(self.popular_word_count);
            info!(urls_visited = result.urls_visited(), "crawl finished");
            result
        }
        .boxed()
    }

    fn max_parallelism(&self) -> usize {
        1
    }
}

impl Profileable for SequentialCrawler {
    fn operations(&self) -> &'static [&'static str] {
        WEB_CRAWLER_OPERATIONS
    }
}
