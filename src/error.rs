// src/error.rs
// =============================================================================
// Error types shared by more than one module.
//
// Every failure to touch the filesystem (reading the config, writing the
// result, appending the profile) is reported as a FileError so the message
// always names what we were doing and which path it was.
// =============================================================================

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// The kind of file operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOp {
    Read,
    Write,
}

impl fmt::Display for FileOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileOp::Read => f.write_str("read"),
            FileOp::Write => f.write_str("write"),
        }
    }
}

/// An I/O failure tagged with the operation and the target path.
#[derive(Debug, Error)]
#[error("failed to {op} {}: {source}", path.display())]
pub struct FileError {
    pub op: FileOp,
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

impl FileError {
    pub fn read(path: &Path, source: io::Error) -> Self {
        Self {
            op: FileOp::Read,
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn write(path: &Path, source: io::Error) -> Self {
        Self {
            op: FileOp::Write,
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Creates the parent directories of `path` if it has any.
pub fn create_parent_dirs(path: &Path) -> Result<(), FileError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent).map_err(|e| FileError::write(parent, e))
        }
        _ => Ok(()),
    }
}
