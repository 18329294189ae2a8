//! Benchmark Execution
//!
//! The engine is a straight line: validate, setup, optional warm-up, timed
//! passes, report. Nothing loops back and nothing is retried.
//!
//! ## Failure Semantics
//!
//! - Unsupported option keys are rejected before the plugin is touched.
//! - A failing `setup` aborts before any timing begins.
//! - Warm-up faults are logged and dropped.
//! - Any fault during a timed pass aborts the whole run; a file that merely
//!   fails to parse is recorded as data and the run continues.
//!
//! ## Data Flow
//!
//! ```text
//! FileEnumerator::files()   (fresh walk per pass)
//!        │
//!        ▼
//! ┌──────────────────┐
//! │ Timer → parse()  │  one file at a time, progress line per file
//! └────────┬─────────┘
//!          │
//!          ▼
//!   RunReport (per-file times, AND-ed success, per-pass totals)
//! ```

use super::metadata::build_run_meta;
use super::report::emit_report;
use crate::enumerate::{EnumerateError, FileEnumerator};
use parsebench_core::{
    ConfigError, ParserPlugin, PluginError, PluginRegistry, RunConfiguration, Timer,
};
use parsebench_report::RunReport;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a benchmark run
#[derive(Debug, Error)]
pub enum EngineError {
    /// Rejected as misconfigured; the CLI prints usage
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// `setup` failed for a reason other than configuration
    #[error("Parser '{parser}' failed to initialize: {source}")]
    Setup {
        /// Parser name
        parser: String,
        /// Error reported by the parser
        #[source]
        source: PluginError,
    },

    /// The source tree could not be walked during a timed pass
    #[error(transparent)]
    Enumerate(#[from] EnumerateError),

    /// A parse call faulted during a timed pass
    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        /// File being parsed
        path: PathBuf,
        /// Error reported by the parser
        #[source]
        source: PluginError,
    },

    /// Progress or report sink write failure
    #[error("Failed to write output: {0}")]
    Output(#[from] io::Error),

    /// The parser's own post-run report failed
    #[error("Parser '{parser}' failed to write its report: {source}")]
    Report {
        /// Parser name
        parser: String,
        /// Error reported by the parser
        #[source]
        source: PluginError,
    },
}

impl EngineError {
    /// Whether the run was rejected as misconfigured rather than faulted
    pub fn is_config(&self) -> bool {
        match self {
            Self::Config(_) => true,
            Self::Parse { source, .. } => source.is_config(),
            _ => false,
        }
    }
}

/// Runs one parser over one source with one configuration
#[derive(Debug, Clone)]
pub struct BenchmarkEngine {
    config: RunConfiguration,
    source: FileEnumerator,
}

impl BenchmarkEngine {
    /// Create an engine for `source`
    pub fn new(config: RunConfiguration, source: FileEnumerator) -> Self {
        Self { config, source }
    }

    /// Execution parameters
    pub fn config(&self) -> &RunConfiguration {
        &self.config
    }

    /// Benchmark source
    pub fn source(&self) -> &FileEnumerator {
        &self.source
    }

    /// Reject option keys `plugin` does not support
    pub fn validate(&self, plugin: &dyn ParserPlugin) -> Result<(), ConfigError> {
        self.config
            .validate_options(plugin.name(), &plugin.supported_options())
    }

    /// Resolve `name` in `registry` and run it
    pub fn run_named(
        &self,
        registry: &mut PluginRegistry,
        name: &str,
    ) -> Result<RunReport, EngineError> {
        let plugin = registry.resolve(name)?;
        self.run(plugin)
    }

    /// Run the full benchmark and return the recorded report.
    ///
    /// The report has already been written to the report sink when this
    /// returns `Ok`.
    pub fn run(&self, plugin: &mut dyn ParserPlugin) -> Result<RunReport, EngineError> {
        let parser = plugin.name().to_string();
        self.validate(plugin)?;

        tracing::info!(
            parser = %parser,
            runs = self.config.runs(),
            warm_up = self.config.warm_up(),
            source = %self.source.root().display(),
            "starting benchmark"
        );
        plugin.setup(&self.config).map_err(|source| {
            if source.is_config() {
                EngineError::Config(ConfigError::Plugin {
                    parser: parser.clone(),
                    source,
                })
            } else {
                EngineError::Setup {
                    parser: parser.clone(),
                    source,
                }
            }
        })?;

        if self.config.warm_up() {
            self.warm_up(plugin)?;
        }

        let report = self.timed_passes(plugin, &parser)?;
        emit_report(&report, plugin, &self.config)?;
        Ok(report)
    }

    /// One untimed pass; results and faults are discarded
    fn warm_up(&self, plugin: &mut dyn ParserPlugin) -> Result<(), EngineError> {
        self.config.progress().line(format_args!("Warm up..."))?;
        for file in self.source.files() {
            match file {
                Ok(file) => {
                    if let Err(e) = plugin.parse(file.path(), &self.config) {
                        tracing::warn!(file = %file.path().display(), error = %e, "ignoring warm-up fault");
                    }
                }
                Err(e) => tracing::warn!(error = %e, "ignoring warm-up enumeration fault"),
            }
        }
        Ok(())
    }

    fn timed_passes(
        &self,
        plugin: &mut dyn ParserPlugin,
        parser: &str,
    ) -> Result<RunReport, EngineError> {
        let runs = self.config.runs() as usize;
        let progress = self.config.progress();
        let mut report = RunReport::new(build_run_meta(parser, &self.config, &self.source), runs);

        progress.line(format_args!(
            "Parsing {} using {} in {} round(s).",
            self.source.source_name(),
            parser,
            runs
        ))?;

        for run in 0..runs {
            progress.line(format_args!("Run: {}", run + 1))?;
            for file in self.source.files() {
                let file = file?;
                let timer = Timer::start();
                let success = plugin
                    .parse(file.path(), &self.config)
                    .map_err(|source| EngineError::Parse {
                        path: file.path().to_path_buf(),
                        source,
                    })?;
                let elapsed = timer.stop();

                progress.line(format_args!(
                    "Parsing {} took: {}ms, success: {}.",
                    file.name(),
                    elapsed,
                    success
                ))?;
                report.record(run, &file, elapsed, success);
            }
            tracing::debug!(
                run = run + 1,
                total_ms = report.totals().get(run).copied().unwrap_or(0),
                "pass complete"
            );
        }

        Ok(report)
    }
}
