//! Per-walk counters.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use fsvisitor_core::EntryKind;

/// Counters for a single walk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WalkStats {
    /// Directories discovered (before filtering).
    pub dirs_found: u64,
    /// Files discovered (before filtering).
    pub files_found: u64,
    /// Paths handed to the consumer.
    pub yielded: u64,
    /// Entries an observer excluded.
    pub excluded: u64,
    /// Entries the filter rejected.
    pub rejected: u64,
    /// An observer set `stop`.
    pub stopped: bool,
    /// The walk drained and fired `finish`.
    pub finished: bool,
    /// Time from `start` to the end of the walk. Zero while running.
    pub elapsed: Duration,
}

impl WalkStats {
    /// Create zeroed stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total entries discovered (dirs + files).
    pub fn total_found(&self) -> u64 {
        self.dirs_found + self.files_found
    }

    /// Calculate discovery rate in entries per second.
    pub fn entries_per_second(&self) -> f64 {
        if self.elapsed.as_secs_f64() > 0.0 {
            self.total_found() as f64 / self.elapsed.as_secs_f64()
        } else {
            0.0
        }
    }

    pub(crate) fn record_found(&mut self, kind: EntryKind) {
        match kind {
            EntryKind::Directory => self.dirs_found += 1,
            EntryKind::File => self.files_found += 1,
        }
    }

    pub(crate) fn close(&mut self, started_at: Option<Instant>) {
        if let Some(started_at) = started_at {
            self.elapsed = started_at.elapsed();
        }
    }
}
