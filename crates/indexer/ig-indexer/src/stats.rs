//! Statistics for indexing runs.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Statistics collected while walking a directory tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexStats {
    /// When the walk started
    pub started_at: Option<DateTime<Utc>>,

    /// When the walk completed
    pub completed_at: Option<DateTime<Utc>>,

    /// Directories visited
    pub directories_visited: usize,

    /// Directories that passed the eligibility check and were rendered
    pub directories_indexed: usize,

    /// Directories skipped because of a `.noindex` marker
    pub directories_opted_out: usize,

    /// Directories skipped because they lie outside the scan prefix
    pub directories_out_of_scope: usize,

    /// Index pages uploaded
    pub indexes_published: usize,

    /// Total size of rendered pages
    pub bytes_rendered: u64,

    /// Per-directory errors, as `"<prefix>: <error>"`
    pub errors: Vec<String>,
}

impl IndexStats {
    /// Create a new stats tracker with the current time as start time.
    pub fn new() -> Self {
        Self {
            started_at: Some(Utc::now()),
            ..Default::default()
        }
    }

    /// Mark the walk as complete with the current time.
    pub fn complete(&mut self) {
        self.completed_at = Some(Utc::now());
    }

    pub fn record_visited(&mut self) {
        self.directories_visited += 1;
    }

    pub fn record_opted_out(&mut self) {
        self.directories_opted_out += 1;
    }

    pub fn record_out_of_scope(&mut self) {
        self.directories_out_of_scope += 1;
    }

    /// Record a rendered index page of `bytes` bytes.
    pub fn record_rendered(&mut self, bytes: usize) {
        self.directories_indexed += 1;
        self.bytes_rendered += bytes as u64;
    }

    pub fn record_published(&mut self) {
        self.indexes_published += 1;
    }

    /// Record a per-directory error.
    pub fn record_error(&mut self, error: impl ToString) {
        self.errors.push(error.to_string());
    }

    /// Directories that were not indexed for either reason.
    pub fn directories_skipped(&self) -> usize {
        self.directories_opted_out + self.directories_out_of_scope
    }

    /// Get the duration of the walk.
    pub fn duration(&self) -> Option<Duration> {
        match (self.started_at, self.completed_at) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        }
    }

    /// Check if any errors occurred.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Get the number of errors.
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }
}
