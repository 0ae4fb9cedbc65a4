// src/crawl/mod.rs
// =============================================================================
// This module crawls pages and ranks the words found on them.
//
// Submodules:
// - state: shared per-crawl state (deadline, visited set, word counts)
// - parallel: the default engine, one tokio task per page
// - sequential: one page at a time, for comparison and debugging
// - ranking: orders the final word counts
// - result: the CrawlResult value and its JSON writer
//
// Both engines follow the same rules for every (url, depth) step:
// 1. stop if depth is 0 or the deadline has passed
// 2. stop if the URL matches an ignoredUrls pattern
// 3. stop if another step already claimed the URL
// 4. fetch the page (a failure just ends this branch)
// 5. add its word counts to the shared total
// 6. visit every link with depth - 1, and wait for all of them
// =============================================================================

mod parallel;
mod ranking;
mod result;
mod sequential;
mod state;

pub use parallel::ParallelCrawler;
pub use result::{CrawlResult, CrawlResultWriter};
pub use sequential::SequentialCrawler;

use std::num::NonZeroUsize;

use futures::future::BoxFuture;

/// Capability: crawl from a set of start pages and report popular words.
pub trait WebCrawler: Send + Sync {
    fn crawl<'a>(&'a self, start_urls: &'a [String]) -> BoxFuture<'a, CrawlResult>;

    /// How many pages this crawler may fetch at the same time.
    fn max_parallelism(&self) -> usize;
}

/// Operation names exposed by WebCrawler, for the profiler.
pub const WEB_CRAWLER_OPERATIONS: &[&str] = &["crawl", "max_parallelism"];

/// Number of threads the host can run at once.
pub fn host_parallelism() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

/// Applies a configured parallelism hint: anything non-positive or larger
/// than the host can run becomes the host's own concurrency.
pub fn clamp_parallelism(hint: i64) -> usize {
    let host = host_parallelism();
    if hint <= 0 {
        host
    } else {
        usize::try_from(hint).map_or(host, |hint| hint.min(host))
    }
}

#[cfg(test)]
pub(crate) mod testing;
