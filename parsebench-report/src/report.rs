//! Report Data Structures

use chrono::{DateTime, Utc};
use parsebench_core::{FileId, SourceKind};
use std::collections::BTreeMap;

/// Integer mean with truncating division; 0 for an empty slice
pub fn truncating_mean(times: &[u64]) -> u64 {
    let total: u64 = times.iter().sum();
    total.checked_div(times.len() as u64).unwrap_or(0)
}

/// Timing record for one file across all timed passes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStat {
    times: Vec<u64>,
    success: bool,
}

impl FileStat {
    /// Empty record with one zeroed slot per run
    pub fn new(runs: usize) -> Self {
        Self {
            times: vec![0; runs],
            success: true,
        }
    }

    /// Store the elapsed time of `run` (0-based) and fold in its outcome.
    ///
    /// Once a run fails the overall flag stays false.
    pub fn record(&mut self, run: usize, elapsed_ms: u64, success: bool) {
        if let Some(slot) = self.times.get_mut(run) {
            *slot = elapsed_ms;
        }
        self.success &= success;
    }

    /// Elapsed milliseconds per run
    pub fn times(&self) -> &[u64] {
        &self.times
    }

    /// True iff every recorded run succeeded
    pub fn success(&self) -> bool {
        self.success
    }

    /// Truncating mean over all runs
    pub fn mean(&self) -> u64 {
        truncating_mean(&self.times)
    }
}

/// Header information for a report
#[derive(Debug, Clone)]
pub struct RunMeta {
    /// Time the report was produced
    pub timestamp: DateTime<Utc>,
    /// Parser name
    pub parser: String,
    /// Backend-specific option tokens, in configuration order
    pub options: Vec<String>,
    /// Whether a warm-up pass ran before measurement
    pub warmed_up: bool,
    /// File or directory
    pub source_kind: SourceKind,
    /// Last component of the source path
    pub source_name: String,
}

impl RunMeta {
    /// Modifiers shown in parentheses after the parser name
    pub fn modifiers(&self) -> Vec<&str> {
        let mut modifiers = Vec::with_capacity(self.options.len() + 1);
        if self.warmed_up {
            modifiers.push("warmed up");
        }
        modifiers.extend(self.options.iter().map(String::as_str));
        modifiers
    }
}

/// Aggregate result of one engine invocation
#[derive(Debug, Clone)]
pub struct RunReport {
    meta: RunMeta,
    runs: usize,
    totals: Vec<u64>,
    files: BTreeMap<FileId, FileStat>,
}

impl RunReport {
    /// Empty report for `runs` timed passes
    pub fn new(meta: RunMeta, runs: usize) -> Self {
        Self {
            meta,
            runs,
            totals: vec![0; runs],
            files: BTreeMap::new(),
        }
    }

    /// Record one file's result for pass `run` (0-based).
    ///
    /// The elapsed time also goes into that pass's total, so each total is
    /// always the sum of the per-file times of the same pass.
    pub fn record(&mut self, run: usize, file: &FileId, elapsed_ms: u64, success: bool) {
        let runs = self.runs;
        self.files
            .entry(file.clone())
            .or_insert_with(|| FileStat::new(runs))
            .record(run, elapsed_ms, success);
        if let Some(total) = self.totals.get_mut(run) {
            *total += elapsed_ms;
        }
    }

    /// Report header information
    pub fn meta(&self) -> &RunMeta {
        &self.meta
    }

    /// Number of timed passes
    pub fn runs(&self) -> usize {
        self.runs
    }

    /// Sum of all per-file times, per pass
    pub fn totals(&self) -> &[u64] {
        &self.totals
    }

    /// Per-file table in canonical order
    pub fn files(&self) -> &BTreeMap<FileId, FileStat> {
        &self.files
    }

    /// Statistics for one file
    pub fn file(&self, id: &FileId) -> Option<&FileStat> {
        self.files.get(id)
    }

    /// Truncating mean of the per-pass totals
    pub fn mean_total(&self) -> u64 {
        truncating_mean(&self.totals)
    }
}
