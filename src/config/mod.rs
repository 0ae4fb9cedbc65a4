// src/config/mod.rs
// =============================================================================
// Crawl configuration.
//
// The configuration arrives as a JSON file (see loader.rs). It is first
// deserialized into RawConfig, which mirrors the file one-to-one, and then
// validated into CrawlerConfig, which is what the rest of the program uses:
// - depth / timeout / word limit are range-checked
// - URL and word patterns are compiled into full-match regexes
// - duplicate start pages and patterns are dropped (first one wins)
//
// A CrawlerConfig can only be obtained through validation, so any value of
// that type is known to be good.
// =============================================================================

mod loader;

pub use loader::ConfigLoader;

use std::collections::HashSet;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

use crate::error::FileError;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    File(#[from] FileError),

    #[error("invalid configuration JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("maxDepth cannot be negative (got {0})")]
    NegativeDepth(i64),

    #[error("timeoutSeconds must be positive (got {0})")]
    NonPositiveTimeout(i64),

    #[error("popularWordCount cannot be negative (got {0})")]
    NegativePopularWordCount(i64),

    #[error("invalid pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("unknown implementationOverride '{0}' (expected 'parallel' or 'sequential')")]
    UnknownImplementation(String),
}

/// Which crawler implementation to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Implementation {
    #[default]
    Parallel,
    Sequential,
}

impl FromStr for Implementation {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "parallel" => Ok(Implementation::Parallel),
            "sequential" => Ok(Implementation::Sequential),
            _ => Err(ConfigError::UnknownImplementation(s.to_string())),
        }
    }
}

/// The configuration file exactly as written. Missing keys take the
/// defaults below.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawConfig {
    pub start_pages: Vec<String>,
    pub ignored_urls: Vec<String>,
    pub ignored_words: Vec<String>,
    pub parallelism: i64,
    pub implementation_override: String,
    pub max_depth: i64,
    pub timeout_seconds: i64,
    pub popular_word_count: i64,
    pub profile_output_path: String,
    pub result_path: String,
}

impl Default for RawConfig {
    fn default() -> Self {
        Self {
            start_pages: Vec::new(),
            ignored_urls: Vec::new(),
            ignored_words: Vec::new(),
            parallelism: -1,
            implementation_override: String::new(),
            max_depth: 0,
            timeout_seconds: 1,
            popular_word_count: 0,
            profile_output_path: String::new(),
            result_path: String::new(),
        }
    }
}

/// A validated crawl configuration.
#[derive(Debug, Clone)]
pub struct CrawlerConfig {
    pub start_pages: Vec<String>,
    pub ignored_urls: Vec<Regex>,
    pub ignored_words: Vec<Regex>,
    /// Raw hint; see `crawl::clamp_parallelism` for how it is applied.
    pub parallelism: i64,
    pub implementation: Implementation,
    pub max_depth: usize,
    pub timeout: Duration,
    pub popular_word_count: usize,
    /// `None` means stdout.
    pub profile_output_path: Option<PathBuf>,
    /// `None` means stdout.
    pub result_path: Option<PathBuf>,
}

impl TryFrom<RawConfig> for CrawlerConfig {
    type Error = ConfigError;

    fn try_from(raw: RawConfig) -> Result<Self, Self::Error> {
        if raw.max_depth < 0 {
            return Err(ConfigError::NegativeDepth(raw.max_depth));
        }
        if raw.timeout_seconds <= 0 {
            return Err(ConfigError::NonPositiveTimeout(raw.timeout_seconds));
        }
        if raw.popular_word_count < 0 {
            return Err(ConfigError::NegativePopularWordCount(raw.popular_word_count));
        }

        let implementation = raw.implementation_override.parse()?;

        Ok(CrawlerConfig {
            start_pages: dedup(raw.start_pages),
            ignored_urls: compile_patterns(raw.ignored_urls)?,
            ignored_words: compile_patterns(raw.ignored_words)?,
            parallelism: raw.parallelism,
            implementation,
            max_depth: raw.max_depth as usize,
            timeout: Duration::from_secs(raw.timeout_seconds as u64),
            popular_word_count: raw.popular_word_count as usize,
            profile_output_path: non_empty_path(raw.profile_output_path),
            result_path: non_empty_path(raw.result_path),
        })
    }
}

/// Compiles a pattern so that it must match the whole input, not just a
/// substring of it.
pub fn full_match_pattern(pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(&format!("^(?:{})$", pattern)).map_err(|source| ConfigError::Pattern {
        pattern: pattern.to_string(),
        source,
    })
}

/// True when `text` fully matches any of `patterns`.
pub fn matches_any(patterns: &[Regex], text: &str) -> bool {
    patterns.iter().any(|p| p.is_match(text))
}

fn compile_patterns(patterns: Vec<String>) -> Result<Vec<Regex>, ConfigError> {
    dedup(patterns)
        .iter()
        .map(|p| full_match_pattern(p))
        .collect()
}

// Removes duplicates while keeping the first occurrence's position
fn dedup(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

fn non_empty_path(path: String) -> Option<PathBuf> {
    if path.trim().is_empty() {
        None
    } else {
        Some(PathBuf::from(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw() -> RawConfig {
        RawConfig::default()
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = CrawlerConfig::try_from(raw()).unwrap();
        assert!(config.start_pages.is_empty());
        assert_eq!(config.max_depth, 0);
        assert_eq!(config.timeout, Duration::from_secs(1));
        assert_eq!(config.popular_word_count, 0);
        assert_eq!(config.parallelism, -1);
        assert_eq!(config.implementation, Implementation::Parallel);
        assert!(config.result_path.is_none());
        assert!(config.profile_output_path.is_none());
    }

    #[test]
    fn test_negative_depth_rejected() {
        let err = CrawlerConfig::try_from(RawConfig { max_depth: -1, ..raw() }).unwrap_err();
        assert!(matches!(err, ConfigError::NegativeDepth(-1)));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = CrawlerConfig::try_from(RawConfig { timeout_seconds: 0, ..raw() }).unwrap_err();
        assert!(matches!(err, ConfigError::NonPositiveTimeout(0)));
    }

    #[test]
    fn test_huge_timeout_accepted() {
        let config =
            CrawlerConfig::try_from(RawConfig { timeout_seconds: i64::MAX, ..raw() }).unwrap();
        assert_eq!(config.timeout, Duration::from_secs(i64::MAX as u64));
    }

    #[test]
    fn test_negative_word_count_rejected() {
        let err =
            CrawlerConfig::try_from(RawConfig { popular_word_count: -3, ..raw() }).unwrap_err();
        assert!(matches!(err, ConfigError::NegativePopularWordCount(-3)));
    }

    #[test]
    fn test_bad_pattern_rejected() {
        let err = CrawlerConfig::try_from(RawConfig {
            ignored_urls: vec!["(unclosed".to_string()],
            ..raw()
        })
        .unwrap_err();
        match err {
            ConfigError::Pattern { pattern, .. } => assert_eq!(pattern, "(unclosed"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_implementation_rejected() {
        let err = CrawlerConfig::try_from(RawConfig {
            implementation_override: "quantum".to_string(),
            ..raw()
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownImplementation(_)));
    }

    #[test]
    fn test_sequential_override() {
        let config = CrawlerConfig::try_from(RawConfig {
            implementation_override: "Sequential".to_string(),
            ..raw()
        })
        .unwrap();
        assert_eq!(config.implementation, Implementation::Sequential);
    }

    #[test]
    fn test_start_pages_deduplicated_in_order() {
        let config = CrawlerConfig::try_from(RawConfig {
            start_pages: vec!["b".into(), "a".into(), "b".into(), "c".into()],
            ..raw()
        })
        .unwrap();
        assert_eq!(config.start_pages, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_patterns_match_whole_string_only() {
        let pattern = full_match_pattern("http://example\\.com/.*").unwrap();
        assert!(pattern.is_match("http://example.com/page"));
        assert!(!pattern.is_match("see http://example.com/page"));

        let word = full_match_pattern("the").unwrap();
        assert!(word.is_match("the"));
        assert!(!word.is_match("there"));
    }

    #[test]
    fn test_alternation_is_anchored_as_a_whole() {
        let pattern = full_match_pattern("a|b").unwrap();
        assert!(pattern.is_match("a"));
        assert!(!pattern.is_match("ab"));
        assert!(!pattern.is_match("xb"));
    }

    #[test]
    fn test_empty_paths_mean_stdout() {
        let config = CrawlerConfig::try_from(RawConfig {
            result_path: "  ".to_string(),
            profile_output_path: "out/profile.txt".to_string(),
            ..raw()
        })
        .unwrap();
        assert!(config.result_path.is_none());
        assert_eq!(config.profile_output_path, Some(PathBuf::from("out/profile.txt")));
    }
}
