#![warn(missing_docs)]
//! ParseBench Report - Timing Tables and Text Output
//!
//! Holds the per-file statistics collected during a benchmark run and renders
//! them as the line-oriented text report:
//! - Header block (timestamp, parser, modifiers, source)
//! - One timing line per file, sorted by canonical file identity
//! - One aggregate line with the per-pass totals

mod report;
mod text;

pub use report::{FileStat, RunMeta, RunReport, truncating_mean};
pub use text::{
    AGGREGATE_LABEL, Reporter, SEPARATOR, format_executed, format_header, format_timing_line,
};
