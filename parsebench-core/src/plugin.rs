//! Parser Plugin Contract
//!
//! Every parser back-end implements [`ParserPlugin`]. The engine drives a
//! plugin through a fixed lifecycle:
//!
//! ```text
//! supported_options()  validated against the run configuration
//!        │
//!        ▼
//!     setup()          once per benchmark run, outside the timed region
//!        │
//!        ▼
//!     parse()          once per file per pass (warm-up and timed)
//!        │
//!        ▼
//!     report()         once, after the report table is written
//! ```
//!
//! Expensive one-time work (compiling grammars, loading a runtime) belongs in
//! `setup` so that per-file timings stay comparable across back-ends with
//! very different start-up costs.

use crate::options::RunConfiguration;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Recognized option keys mapped to a human-readable description.
pub type SupportedOptions = BTreeMap<&'static str, &'static str>;

/// Errors raised by a parser plugin
#[derive(Debug, Error)]
pub enum PluginError {
    /// Option key the plugin does not recognize
    #[error("Unsupported option: {0}")]
    UnsupportedOption(String),

    /// Recognized option key with an unusable value
    #[error("Invalid value '{value}' for option '{key}'")]
    InvalidOptionValue {
        /// Option key
        key: String,
        /// Rejected value
        value: String,
    },

    /// `parse` was called before a successful `setup`
    #[error("The {plugin} parser was used before setup")]
    NotInitialized {
        /// Plugin name
        plugin: String,
    },

    /// One-time initialization failed
    #[error("Setup failed: {0}")]
    Setup(String),

    /// The file being parsed could not be read
    #[error("Cannot read {}: {source}", path.display())]
    Io {
        /// File being parsed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Writing plugin output to a sink failed
    #[error("Cannot write plugin output: {0}")]
    Output(#[from] std::io::Error),
}

impl PluginError {
    /// Build an I/O fault for the file being parsed
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        PluginError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Whether this failure stems from the run configuration rather than from
    /// the environment (unsupported options, bad values, missing setup).
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            PluginError::UnsupportedOption(_)
                | PluginError::InvalidOptionValue { .. }
                | PluginError::NotInitialized { .. }
        )
    }
}

/// An interchangeable parser back-end.
///
/// `parse` must not fail for malformed input: a syntax error is an ordinary
/// `Ok(false)`. Only faults such as an unreadable file are returned as `Err`.
pub trait ParserPlugin {
    /// Stable identifier used for selection and reporting
    fn name(&self) -> &str;

    /// Recognized backend-specific option keys and their effect
    fn supported_options(&self) -> SupportedOptions {
        SupportedOptions::new()
    }

    /// One-time initialization before a run.
    ///
    /// Resets any per-run state and reads backend-specific flags from
    /// `config.parser_options()`.
    fn setup(&mut self, _config: &RunConfiguration) -> Result<(), PluginError> {
        Ok(())
    }

    /// Parse one file, returning whether it parsed without fatal errors
    fn parse(&mut self, file: &Path, config: &RunConfiguration) -> Result<bool, PluginError>;

    /// Emit plugin-specific diagnostics to the report sink at end of run
    fn report(&mut self, _config: &RunConfiguration) -> Result<(), PluginError> {
        Ok(())
    }
}
