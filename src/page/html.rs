// src/page/html.rs
// =============================================================================
// The real PageSource: downloads a page and pulls words and links out of it.
//
// How a page is processed:
// 1. Parse the URL (http, https and file are supported)
// 2. Download it with reqwest, or read it from disk for file:// URLs
// 3. Parse the HTML with scraper
// 4. Collect the visible text under <body> and split it into words
// 5. Collect every <a href>, resolved to an absolute URL
//
// Words are lowercased and split on anything that is not a letter or digit,
// so "Rust's" becomes "rust" and "s". Words that fully match one of the
// ignoredWords patterns are dropped before counting.
// =============================================================================

use std::collections::HashMap;
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt};
use regex::Regex;
use reqwest::Client;
use scraper::{Html, Selector};
use url::Url;

use super::{PageContent, PageError, PageSource};
use crate::config::matches_any;
use crate::profiler::Profileable;

// Text inside these elements is never shown to a reader
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

pub struct HtmlPageSource {
    client: Client,
    ignored_words: Vec<Regex>,
}

impl HtmlPageSource {
    pub fn new(ignored_words: Vec<Regex>) -> Result<Self, PageError> {
        // One client for the whole crawl so connections are pooled
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            ignored_words,
        })
    }

    async fn download(&self, url: &Url) -> Result<String, PageError> {
        match url.scheme() {
            "http" | "https" => {
                let response = self.client.get(url.clone()).send().await?;

                if !response.status().is_success() {
                    return Err(PageError::Status(response.status().as_u16()));
                }

                Ok(response.text().await?)
            }
            "file" => {
                let path = url
                    .to_file_path()
                    .map_err(|_| PageError::UnsupportedScheme(url.scheme().to_string()))?;
                Ok(tokio::fs::read_to_string(path).await?)
            }
            other => Err(PageError::UnsupportedScheme(other.to_string())),
        }
    }
}

impl PageSource for HtmlPageSource {
    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<PageContent, PageError>> {
        async move {
            let parsed = Url::parse(url).map_err(|source| PageError::InvalidUrl {
                url: url.to_string(),
                source,
            })?;

            let html = self.download(&parsed).await?;

            Ok(parse_page(&html, &parsed, &self.ignored_words))
        }
        .boxed()
    }
}

impl Profileable for HtmlPageSource {
    fn operations(&self) -> &'static [&'static str] {
        super::PAGE_SOURCE_OPERATIONS
    }
}

/// Turns an HTML document into word counts and outgoing links.
pub fn parse_page(html: &str, page_url: &Url, ignored_words: &[Regex]) -> PageContent {
    let document = Html::parse_document(html);

    let mut word_counts = HashMap::new();
    for text in visible_text(&document) {
        for word in split_words(text) {
            if matches_any(ignored_words, &word) {
                continue;
            }
            *word_counts.entry(word).or_insert(0) += 1;
        }
    }

    PageContent {
        word_counts,
        links: extract_links(&document, page_url),
    }
}

// Text nodes under <body> (or the whole document if there is no body),
// minus anything inside a hidden element
fn visible_text(document: &Html) -> Vec<&str> {
    // Constant selector, known to be valid
    let body = Selector::parse("body").expect("static selector");
    let root = document
        .select(&body)
        .next()
        .unwrap_or_else(|| document.root_element());

    root.descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let hidden = node
                .ancestors()
                .filter_map(|ancestor| ancestor.value().as_element())
                .any(|element| HIDDEN_ELEMENTS.contains(&element.name()));
            if hidden {
                None
            } else {
                Some(&**text)
            }
        })
        .collect()
}

fn split_words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(|word| word.to_lowercase())
}

fn extract_links(document: &Html, page_url: &Url) -> Vec<String> {
    let selector = Selector::parse("a[href]").expect("static selector");

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(page_url, href))
        .collect()
}

// Resolves a link (possibly relative) to an absolute, crawlable URL
fn resolve_link(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();

    // Skip self-references, anchors and special protocols
    if href.is_empty()
        || href.starts_with('#')
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("javascript:")
    {
        return None;
    }

    let mut url = base.join(href).ok()?;
    if !matches!(url.scheme(), "http" | "https" | "file") {
        return None;
    }

    // "page#a" and "page#b" are the same page
    url.set_fragment(None);
    Some(url.into())
}
