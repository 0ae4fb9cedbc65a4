// src/profiler/state.rs
// =============================================================================
// Accumulated timings, keyed by (component, operation).
//
// Many wrapped components on many threads record into the same state, so it
// is a DashMap: each record() locks only the shard holding its key and adds
// to the running total in place. Keys remember the order in which they were
// first recorded so the report lists them in that order.
// =============================================================================

use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use dashmap::DashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct RecordKey {
    component: &'static str,
    operation: &'static str,
}

#[derive(Debug)]
struct Record {
    first_seen: u64,
    total: Duration,
    calls: u64,
}

/// One line of the profiling report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSummary {
    pub component: &'static str,
    pub operation: &'static str,
    pub total: Duration,
    pub calls: u64,
}

#[derive(Debug, Default)]
pub struct ProfilingState {
    records: DashMap<RecordKey, Record>,
    next_order: AtomicU64,
}

impl ProfilingState {
    pub fn record(&self, component: &'static str, operation: &'static str, elapsed: Duration) {
        let key = RecordKey {
            component,
            operation,
        };
        let mut record = self.records.entry(key).or_insert_with(|| Record {
            first_seen: self.next_order.fetch_add(1, Ordering::Relaxed),
            total: Duration::ZERO,
            calls: 0,
        });
        record.total += elapsed;
        record.calls += 1;
    }

    /// All records, in the order they were first measured.
    pub fn snapshot(&self) -> Vec<RecordSummary> {
        let mut records: Vec<(u64, RecordSummary)> = self
            .records
            .iter()
            .map(|entry| {
                let (key, record) = entry.pair();
                (
                    record.first_seen,
                    RecordSummary {
                        component: key.component,
                        operation: key.operation,
                        total: record.total,
                        calls: record.calls,
                    },
                )
            })
            .collect();
        records.sort_by_key(|(order, _)| *order);
        records.into_iter().map(|(_, summary)| summary).collect()
    }

    /// Writes one line per record.
    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        for record in self.snapshot() {
            writeln!(
                writer,
                "{}#{} took {} ({} {})",
                record.component,
                record.operation,
                format_duration(record.total),
                record.calls,
                if record.calls == 1 { "call" } else { "calls" },
            )?;
        }
        Ok(())
    }
}

// "<minutes>m <seconds>s <millis>ms"
fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.as_secs();
    format!(
        "{}m {}s {}ms",
        total_seconds / 60,
        total_seconds % 60,
        duration.subsec_millis()
    )
}
