// src/crawl/result.rs
// =============================================================================
// The outcome of a crawl, and how it is written out as JSON.
//
// Output shape:
//   {"wordCounts":{"most":9,"popular":7},"urlsVisited":12}
//
// wordCounts is a JSON object whose key order is the ranking order, so it
// is stored as a Vec of pairs and serialized as a map by hand.
// =============================================================================

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::{Serialize, Serializer};

use crate::error::{create_parent_dirs, FileError};

/// Ranked word counts plus the number of distinct URLs visited.
/// Built once at the end of a crawl and never changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlResult {
    #[serde(serialize_with = "serialize_ranked")]
    word_counts: Vec<(String, u64)>,
    urls_visited: usize,
}

impl CrawlResult {
    pub fn new(word_counts: Vec<(String, u64)>, urls_visited: usize) -> Self {
        Self {
            word_counts,
            urls_visited,
        }
    }

    /// Words in rank order.
    pub fn word_counts(&self) -> &[(String, u64)] {
        &self.word_counts
    }

    pub fn urls_visited(&self) -> usize {
        self.urls_visited
    }
}

// serde hands over the field itself, hence &Vec
#[allow(clippy::ptr_arg)]
fn serialize_ranked<S: Serializer>(
    counts: &Vec<(String, u64)>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_map(counts.iter().map(|(word, count)| (word, count)))
}

pub struct CrawlResultWriter<'a> {
    result: &'a CrawlResult,
}

impl<'a> CrawlResultWriter<'a> {
    pub fn new(result: &'a CrawlResult) -> Self {
        Self { result }
    }

    /// Writes the result as one line of JSON. The writer is flushed but left
    /// open.
    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        serde_json::to_writer(&mut *writer, self.result)?;
        writeln!(writer)?;
        writer.flush()
    }

    /// Writes the result to `path`, replacing any previous content and
    /// creating missing parent directories.
    pub fn write_path(&self, path: &Path) -> Result<(), FileError> {
        create_parent_dirs(path)?;

        let file = File::create(path).map_err(|e| FileError::write(path, e))?;
        let mut writer = BufWriter::new(file);
        self.write(&mut writer).map_err(|e| FileError::write(path, e))
    }
}
