//! Benchmark Executor
//!
//! Drives one parser over the enumerated source files and produces the
//! report. Everything runs on the calling thread, one file at a time.
//!
//! ## Pipeline Overview
//!
//! ```text
//! ParserPlugin + RunConfiguration + FileEnumerator
//!       │
//!       ▼
//! ┌─────────────┐
//! │  validate   │  Reject unsupported option keys, nothing touched yet
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │   setup     │  One-time plugin initialization, outside timing
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │  warm-up    │  Optional untimed pass, faults ignored
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │   passes    │  R timed passes, re-enumerating the source each time
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │   report    │  Text report, then the plugin's own report
//! └─────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`execution`] - The engine and its error type
//! - [`metadata`] - Report header collection
//! - [`report`] - Report emission

mod execution;
mod metadata;
mod report;

pub use execution::{BenchmarkEngine, EngineError};
pub use metadata::build_run_meta;
pub use report::emit_report;
