// src/profiler/mod.rs
// =============================================================================
// Call-latency profiling for any component.
//
// How it fits together:
// - A component says which operations it has by implementing Profileable
// - Profiler::wrap() puts it inside a Profiled<T> decorator, choosing which
//   of those operations are measured
// - Profiled<T> implements the same capability traits as T (WebCrawler,
//   PageSource), so callers cannot tell it apart from the real thing
// - Measured calls add their wall-clock time to a shared ProfilingState
// - write_report() prints the totals
//
// Submodules:
// - state: the shared, concurrent timing table
// - wrapper: the Profiled<T> decorator
// =============================================================================

mod state;
mod wrapper;

pub use wrapper::Profiled;

use std::fs::OpenOptions;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Local};
use thiserror::Error;
use tracing::{debug, warn};

use crate::error::{create_parent_dirs, FileError};
use state::ProfilingState;

#[derive(Debug, Error)]
pub enum ProfilerError {
    #[error("{component} has no profiled operations (requested: {requested:?}, available: {available:?})")]
    NothingToProfile {
        component: &'static str,
        requested: Vec<String>,
        available: &'static [&'static str],
    },
}

/// A component whose operations can be measured.
pub trait Profileable {
    /// Names of the operations this component exposes.
    fn operations(&self) -> &'static [&'static str];

    /// Name used for this component in the profiling report.
    fn component_name(&self) -> &'static str {
        short_type_name(std::any::type_name::<Self>())
    }
}

// "webcrawler::crawl::parallel::ParallelCrawler" -> "ParallelCrawler"
fn short_type_name(full: &'static str) -> &'static str {
    let without_generics = full.split('<').next().unwrap_or(full);
    without_generics
        .rsplit("::")
        .next()
        .unwrap_or(without_generics)
}

pub struct Profiler {
    state: Arc<ProfilingState>,
    start_time: DateTime<Local>,
}

impl Profiler {
    pub fn new() -> Self {
        Self {
            state: Arc::new(ProfilingState::default()),
            start_time: Local::now(),
        }
    }

    /// Wraps `delegate` so that the operations named in `measured` are
    /// timed. Names the component does not have are ignored; if nothing is
    /// left to measure this is an error.
    pub fn wrap<T: Profileable>(
        &self,
        delegate: T,
        measured: &[&str],
    ) -> Result<Profiled<T>, ProfilerError> {
        let component = delegate.component_name();
        let available = delegate.operations();

        let mut selected: Vec<&'static str> = Vec::new();
        for name in measured {
            match available.iter().copied().find(|op| op == name) {
                Some(op) if !selected.contains(&op) => selected.push(op),
                Some(_) => {}
                None => warn!(component, operation = *name, "no such operation to profile"),
            }
        }

        if selected.is_empty() {
            return Err(ProfilerError::NothingToProfile {
                component,
                requested: measured.iter().map(|s| s.to_string()).collect(),
                available,
            });
        }

        let profiled = Profiled::new(delegate, component, selected, Arc::clone(&self.state));
        debug!(component, measured = ?profiled.measured(), "profiling enabled");
        Ok(profiled)
    }

    /// Writes the run timestamp and one line per measured operation.
    /// The writer is flushed but never closed.
    pub fn write_report<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "Run at {}", self.start_time.to_rfc2822())?;
        self.state.write(writer)?;
        writeln!(writer)?;
        writer.flush()
    }

    /// Appends the report to `path`, creating the file and any missing
    /// parent directories.
    pub fn write_report_path(&self, path: &Path) -> Result<(), FileError> {
        create_parent_dirs(path)?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| FileError::write(path, e))?;
        let mut writer = BufWriter::new(file);
        self.write_report(&mut writer)
            .map_err(|e| FileError::write(path, e))
    }
}

impl Default for Profiler {
    fn default() -> Self {
        Self::new()
    }
}
