// src/config/loader.rs
// =============================================================================
// Loads a CrawlerConfig from a JSON file or any reader.
// =============================================================================

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::PathBuf;

use super::{ConfigError, CrawlerConfig, RawConfig};
use crate::error::FileError;

pub struct ConfigLoader {
    path: PathBuf,
}

impl ConfigLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Reads and validates the configuration file given to `new`.
    pub fn load(&self) -> Result<CrawlerConfig, ConfigError> {
        let file = File::open(&self.path).map_err(|e| FileError::read(&self.path, e))?;
        Self::read(BufReader::new(file))
    }

    /// Reads and validates configuration JSON from `reader`.
    ///
    /// Pass `&mut reader` to keep using the reader afterwards; it is never
    /// closed here.
    pub fn read<R: Read>(reader: R) -> Result<CrawlerConfig, ConfigError> {
        let raw: RawConfig = serde_json::from_reader(reader)?;
        CrawlerConfig::try_from(raw)
    }
}
