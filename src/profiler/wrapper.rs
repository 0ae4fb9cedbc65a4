// src/profiler/wrapper.rs
// =============================================================================
// Profiled<T>: a decorator that times selected operations of T.
//
// Every call goes through call() or call_async(). If the operation is one
// of the measured ones a Stopwatch is started first; the Stopwatch records
// its elapsed time when it is dropped. Dropping happens on every way out of
// the call (normal return, an Err, a panic, or an async call being
// cancelled), so no measurement is ever lost, and the callee's return value
// is handed back untouched.
// =============================================================================

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use futures::future::{BoxFuture, FutureExt};

use super::state::ProfilingState;
use super::Profileable;
use crate::crawl::{CrawlResult, WebCrawler};
use crate::page::{PageContent, PageError, PageSource};

pub struct Profiled<T> {
    delegate: T,
    component: &'static str,
    measured: Vec<&'static str>,
    state: Arc<ProfilingState>,
}

struct Stopwatch<'a> {
    state: &'a ProfilingState,
    component: &'static str,
    operation: &'static str,
    started: Instant,
}

impl Drop for Stopwatch<'_> {
    fn drop(&mut self) {
        self.state
            .record(self.component, self.operation, self.started.elapsed());
    }
}

impl<T> Profiled<T> {
    pub(super) fn new(
        delegate: T,
        component: &'static str,
        measured: Vec<&'static str>,
        state: Arc<ProfilingState>,
    ) -> Self {
        Self {
            delegate,
            component,
            measured,
            state,
        }
    }

    /// The operations being timed.
    pub fn measured(&self) -> &[&'static str] {
        &self.measured
    }

    fn stopwatch(&self, operation: &'static str) -> Option<Stopwatch<'_>> {
        if !self.measured.contains(&operation) {
            return None;
        }
        Some(Stopwatch {
            state: &self.state,
            component: self.component,
            operation,
            started: Instant::now(),
        })
    }

    /// Runs a synchronous operation on the wrapped component.
    pub fn call<R>(&self, operation: &'static str, f: impl FnOnce(&T) -> R) -> R {
        let _stopwatch = self.stopwatch(operation);
        f(&self.delegate)
    }

    /// Runs an asynchronous operation on the wrapped component. Timing
    /// starts when the returned future is first polled.
    pub async fn call_async<'a, F, Fut>(&'a self, operation: &'static str, f: F) -> Fut::Output
    where
        F: FnOnce(&'a T) -> Fut,
        Fut: Future,
    {
        let _stopwatch = self.stopwatch(operation);
        f(&self.delegate).await
    }
}

impl<T: Profileable> Profileable for Profiled<T> {
    fn operations(&self) -> &'static [&'static str] {
        self.delegate.operations()
    }

    fn component_name(&self) -> &'static str {
        self.component
    }
}

impl<T: WebCrawler> WebCrawler for Profiled<T> {
    fn crawl<'a>(&'a self, start_urls: &'a [String]) -> BoxFuture<'a, CrawlResult> {
        self.call_async("crawl", move |crawler| crawler.crawl(start_urls))
            .boxed()
    }

    fn max_parallelism(&self) -> usize {
        self.call("max_parallelism", |crawler| crawler.max_parallelism())
    }
}

impl<T: PageSource> PageSource for Profiled<T> {
    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<PageContent, PageError>> {
        self.call_async("fetch", move |source| source.fetch(url))
            .boxed()
    }
}
