#![warn(missing_docs)]
//! # ParseBench
//!
//! Micro-benchmark harness comparing interchangeable parser back-ends over a
//! corpus of source files.
//!
//! - **Pluggable Parsers**: every back-end implements [`ParserPlugin`] and is
//!   registered explicitly in a [`PluginRegistry`]
//! - **Amortized Setup**: one-time initialization happens before the timed region
//! - **Optional Warm-up**: an untimed pass lets caches settle before measurement
//! - **Deterministic Reports**: per-file timings keyed by a canonical file
//!   identity, AND-ed success flags and per-pass totals
//! - **Append-friendly Output**: flushed plain-text report compatible with
//!   earlier reports
//!
//! ## Quick Start
//!
//! ```ignore
//! use parsebench::prelude::*;
//!
//! let config = RunConfiguration::builder().runs(3).warm_up(true).build()?;
//! let source = FileEnumerator::new("corpus", "js")?;
//! let mut registry = builtin_registry()?;
//! let report = BenchmarkEngine::new(config, source).run_named(&mut registry, "scan")?;
//! ```
//!
//! ## Writing a Parser
//!
//! ```ignore
//! struct Always;
//!
//! impl ParserPlugin for Always {
//!     fn name(&self) -> &str { "always" }
//!     fn parse(&mut self, _file: &Path, _config: &RunConfiguration) -> Result<bool, PluginError> {
//!         Ok(true)
//!     }
//! }
//! ```

// Re-export core types
pub use parsebench_core::{
    ConfigError, FileId, MemoryBuffer, OutputSink, ParserPlugin, PluginError, PluginRegistry,
    RunConfiguration, RunConfigurationBuilder, SourceKind, SupportedOptions, Timer,
    parse_run_count, split_option,
};

// Re-export report types
pub use parsebench_report::{
    AGGREGATE_LABEL, FileStat, Reporter, RunMeta, RunReport, SEPARATOR, format_header,
    format_timing_line, truncating_mean,
};

// Re-export engine and command line
pub use parsebench_cli::{
    BenchmarkEngine, Cli, EngineError, EnumerateError, FileEnumerator, Invocation,
    ParsebenchConfig, list_parsers, parse_args, usage_text,
};

// Re-export built-in parsers
pub use parsebench_plugins::{
    DEFAULT_PARSER, RegexParser, ScanParser, builtin_registry, register_builtins,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        BenchmarkEngine, FileEnumerator, ParserPlugin, PluginError, PluginRegistry,
        RunConfiguration, builtin_registry,
    };
}

/// Run the ParseBench command line with the built-in parsers.
///
/// ```ignore
/// fn main() -> anyhow::Result<()> {
///     parsebench::run()
/// }
/// ```
pub fn run() -> anyhow::Result<()> {
    parsebench_cli::run(builtin_registry()?)
}
