// src/page/mod.rs
// =============================================================================
// This module is the boundary between the crawler and the web.
//
// A PageSource turns one URL into:
// - the words on that page, with how many times each one appears
// - the absolute URLs of the links on that page
//
// The crawl engines only ever talk to the PageSource trait, so tests can
// plug in an in-memory link graph and the profiler can wrap the real one.
//
// Submodules:
// - html: the real implementation (HTTP or file:// + HTML parsing)
// =============================================================================

mod html;

pub use html::HtmlPageSource;

use std::collections::HashMap;

use futures::future::BoxFuture;
use thiserror::Error;

/// Everything the crawler needs from a single page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageContent {
    pub word_counts: HashMap<String, u64>,
    pub links: Vec<String>,
}

/// Why a page could not be turned into a PageContent.
///
/// The crawlers swallow these: a failing page simply contributes nothing.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("unsupported URL scheme '{0}'")]
    UnsupportedScheme(String),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {0}")]
    Status(u16),

    #[error("could not read local page: {0}")]
    Io(#[from] std::io::Error),
}

/// Capability: fetch one page.
///
/// `fetch` returns a boxed future so the trait stays object-safe and can be
/// shared as `Arc<dyn PageSource>` across crawl tasks.
pub trait PageSource: Send + Sync {
    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<PageContent, PageError>>;
}

/// Operation names exposed by PageSource, for the profiler.
pub const PAGE_SOURCE_OPERATIONS: &[&str] = &["fetch"];
