// src/crawl/parallel.rs
// =============================================================================
// The parallel crawl engine.
//
// Every (url, depth) step is its own tokio task. A step that finds links
// spawns one child task per link into a JoinSet and then drains that set,
// so a step is only finished once its whole subtree is. Awaiting the
// JoinSet hands the worker thread back to the scheduler, which means a
// pool of N workers never deadlocks no matter how deep the tree gets.
//
// The worker pool itself is the tokio runtime (sized in main.rs). On top
// of that a semaphore caps the number of page fetches in flight at
// `parallelism`; the permit is held only while claiming and fetching, never
// while waiting on children. The claim (and with it the deadline check)
// happens after the permit is granted, so pages still queued for a slot when
// the deadline passes are never fetched.
// =============================================================================

use std::sync::Arc;
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt};
use regex::Regex;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};

use super::state::CrawlState;
use super::{clamp_parallelism, CrawlResult, WebCrawler, WEB_CRAWLER_OPERATIONS};
use crate::config::CrawlerConfig;
use crate::page::PageSource;
use crate::profiler::Profileable;

pub struct ParallelCrawler {
    source: Arc<dyn PageSource>,
    timeout: Duration,
    popular_word_count: usize,
    max_depth: usize,
    ignored_urls: Vec<Regex>,
    parallelism: usize,
}

// Everything a traversal task needs, shared by all tasks of one crawl
struct Traversal {
    state: CrawlState,
    source: Arc<dyn PageSource>,
    fetch_permits: Semaphore,
}

impl ParallelCrawler {
    pub fn new(source: Arc<dyn PageSource>, config: &CrawlerConfig) -> Self {
        Self {
            source,
            timeout: config.timeout,
            popular_word_count: config.popular_word_count,
            max_depth: config.max_depth,
            ignored_urls: config.ignored_urls.clone(),
            parallelism: clamp_parallelism(config.parallelism),
        }
    }
}

impl WebCrawler for ParallelCrawler {
    fn crawl<'a>(&'a self, start_urls: &'a [String]) -> BoxFuture<'a, CrawlResult> {
        async move {
            let traversal = Arc::new(Traversal {
                state: CrawlState::new(self.timeout, self.ignored_urls.clone()),
                source: Arc::clone(&self.source),
                fetch_permits: Semaphore::new(self.parallelism),
            });

            info!(
                start_pages = start_urls.len(),
                max_depth = self.max_depth,
                parallelism = self.parallelism,
                "starting parallel crawl"
            );

            let mut roots = JoinSet::new();
            for url in start_urls {
                roots.spawn(visit(Arc::clone(&traversal), url.clone(), self.max_depth));
            }
            join_all(&mut roots).await;

            let result = traversal.state.result(self.popular_word_count);
            info!(urls_visited = result.urls_visited(), "crawl finished");
            result
        }
        .boxed()
    }

    fn max_parallelism(&self) -> usize {
        self.parallelism
    }
}

impl Profileable for ParallelCrawler {
    fn operations(&self) -> &'static [&'static str] {
        WEB_CRAWLER_OPERATIONS
    }
}

// One traversal step. Boxed because it spawns copies of itself.
fn visit(traversal: Arc<Traversal>, url: String, depth: usize) -> BoxFuture<'static, ()> {
    async move {
        if depth == 0 || traversal.state.expired() {
            return;
        }

        let links = {
            // Claim only once a fetch slot is free: a step that waited past
            // the deadline stops here without counting as visited
            let permit = traversal.fetch_permits.acquire().await;
            if permit.is_err() || !traversal.state.claim(&url, depth) {
                return;
            }
            traversal
                .state
                .fetch_and_merge(&*traversal.source, &url)
                .await
        };

        let Some(links) = links else {
            return;
        };

        let mut children = JoinSet::new();
        for link in links {
            children.spawn(visit(Arc::clone(&traversal), link, depth - 1));
        }
        join_all(&mut children).await;
    }
    .boxed()
}

async fn join_all(tasks: &mut JoinSet<()>) {
    while let Some(joined) = tasks.join_next().await {
        if let Err(err) = joined {
            warn!(error = %err, "crawl task did not complete");
        }
    }
}
