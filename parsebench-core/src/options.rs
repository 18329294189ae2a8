//! Run Configuration
//!
//! A [`RunConfiguration`] is built once through [`RunConfigurationBuilder`]
//! and shared read-only by the engine and the plugin for the whole run.
//!
//! Backend-specific options are plain tokens of the form `key` or
//! `key:value`; only the key is validated against the plugin's supported set,
//! the value is interpreted by the plugin itself during `setup`.

use crate::plugin::{PluginError, SupportedOptions};
use crate::sink::OutputSink;
use std::path::PathBuf;
use thiserror::Error;

/// Errors detected while validating a run, before anything is parsed
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No registered parser has this name
    #[error("Unknown parser: {0}")]
    UnknownParser(String),

    /// A second parser was registered under an existing name
    #[error("Parser '{0}' is already registered")]
    DuplicateParser(String),

    /// No source path on the command line
    #[error("No source file or directory given")]
    MissingSource,

    /// The source path cannot be resolved or read
    #[error("Source {} does not exist or is not readable: {source}", path.display())]
    SourceUnreadable {
        /// Path as given
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// An option key the selected parser does not list
    #[error("Option '{option}' is not supported by the {parser} parser")]
    UnsupportedOption {
        /// Parser name
        parser: String,
        /// Offending key
        option: String,
    },

    /// Run count that is zero, negative or not a number
    #[error("Invalid run count '{0}': expected a positive integer")]
    InvalidRunCount(String),

    /// The parser rejected its options during setup
    #[error("Invalid {parser} parser configuration: {source}")]
    Plugin {
        /// Parser name
        parser: String,
        /// Error reported by the parser
        #[source]
        source: PluginError,
    },
}

/// Split an option token into its key and optional value.
///
/// Only the first `:` separates; `atn:a:b` yields `("atn", Some("a:b"))`.
pub fn split_option(token: &str) -> (&str, Option<&str>) {
    match token.split_once(':') {
        Some((key, value)) => (key, Some(value)),
        None => (token, None),
    }
}

/// Parse a run count, rejecting zero, negative and non-numeric input
pub fn parse_run_count(s: &str) -> Result<u32, ConfigError> {
    match s.trim().parse::<u32>() {
        Ok(0) | Err(_) => Err(ConfigError::InvalidRunCount(s.to_string())),
        Ok(n) => Ok(n),
    }
}

/// Immutable execution parameters for one benchmark invocation
#[derive(Debug, Clone)]
pub struct RunConfiguration {
    print_errors: bool,
    parser_options: Vec<String>,
    progress: OutputSink,
    report: OutputSink,
    runs: u32,
    warm_up: bool,
}

impl RunConfiguration {
    /// Start building a configuration
    pub fn builder() -> RunConfigurationBuilder {
        RunConfigurationBuilder::default()
    }

    /// Whether plugins should print parse errors to the progress sink
    pub fn print_errors(&self) -> bool {
        self.print_errors
    }

    /// Backend-specific option tokens, in the order they were given
    pub fn parser_options(&self) -> &[String] {
        &self.parser_options
    }

    /// Keys of the backend-specific options, in configuration order
    pub fn option_keys(&self) -> impl Iterator<Item = &str> {
        self.parser_options.iter().map(|o| split_option(o).0)
    }

    /// Progress stream
    pub fn progress(&self) -> &OutputSink {
        &self.progress
    }

    /// Report stream
    pub fn report(&self) -> &OutputSink {
        &self.report
    }

    /// Number of timed passes (always at least 1)
    pub fn runs(&self) -> u32 {
        self.runs
    }

    /// Whether an untimed warm-up pass precedes measurement
    pub fn warm_up(&self) -> bool {
        self.warm_up
    }

    /// Reject the first option key missing from `supported`
    pub fn validate_options(
        &self,
        parser: &str,
        supported: &SupportedOptions,
    ) -> Result<(), ConfigError> {
        check_option_keys(parser, &self.parser_options, supported)
    }
}

/// Reject the first option token whose key is missing from `supported`.
///
/// Needs no [`RunConfiguration`], so callers can check options before any
/// output file is opened.
pub fn check_option_keys<S: AsRef<str>>(
    parser: &str,
    options: &[S],
    supported: &SupportedOptions,
) -> Result<(), ConfigError> {
    let unsupported = options
        .iter()
        .map(|token| split_option(token.as_ref()).0)
        .find(|key| !supported.contains_key(key));
    match unsupported {
        Some(option) => Err(ConfigError::UnsupportedOption {
            parser: parser.to_string(),
            option: option.to_string(),
        }),
        None => Ok(()),
    }
}

/// Builder for [`RunConfiguration`]
#[derive(Debug, Default)]
pub struct RunConfigurationBuilder {
    print_errors: bool,
    parser_options: Vec<String>,
    progress: Option<OutputSink>,
    report: Option<OutputSink>,
    runs: Option<u32>,
    warm_up: bool,
}

impl RunConfigurationBuilder {
    /// Print parse errors to the progress sink
    pub fn print_errors(mut self, print_errors: bool) -> Self {
        self.print_errors = print_errors;
        self
    }

    /// Append one backend-specific `key[:value]` token
    pub fn parser_option(mut self, option: impl Into<String>) -> Self {
        self.parser_options.push(option.into());
        self
    }

    /// Replace the backend-specific option tokens
    pub fn parser_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parser_options = options.into_iter().map(Into::into).collect();
        self
    }

    /// Progress stream (default: stdout)
    pub fn progress(mut self, sink: OutputSink) -> Self {
        self.progress = Some(sink);
        self
    }

    /// Report stream (default: the progress stream)
    pub fn report(mut self, sink: OutputSink) -> Self {
        self.report = Some(sink);
        self
    }

    /// Number of timed passes (default: 1)
    pub fn runs(mut self, runs: u32) -> Self {
        self.runs = Some(runs);
        self
    }

    /// Enable the warm-up pass
    pub fn warm_up(mut self, warm_up: bool) -> Self {
        self.warm_up = warm_up;
        self
    }

    /// Finish the configuration, rejecting a zero run count
    pub fn build(self) -> Result<RunConfiguration, ConfigError> {
        let runs = self.runs.unwrap_or(1);
        if runs == 0 {
            return Err(ConfigError::InvalidRunCount(runs.to_string()));
        }
        let progress = self.progress.unwrap_or_else(OutputSink::stdout);
        let report = self.report.unwrap_or_else(|| progress.clone());

        Ok(RunConfiguration {
            print_errors: self.print_errors,
            parser_options: self.parser_options,
            progress,
            report,
            runs,
            warm_up: self.warm_up,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemoryBuffer;

    #[test]
    fn test_split_option() {
        assert_eq!(split_option("histo"), ("histo", None));
        assert_eq!(split_option("kinds:5"), ("kinds", Some("5")));
        assert_eq!(split_option("kinds:"), ("kinds", Some("")));
        assert_eq!(split_option("a:b:c"), ("a", Some("b:c")));
    }

    #[test]
    fn test_parse_run_count() {
        assert_eq!(parse_run_count("1").unwrap(), 1);
        assert_eq!(parse_run_count("12").unwrap(), 12);
        assert!(matches!(
            parse_run_count("0"),
            Err(ConfigError::InvalidRunCount(_))
        ));
        assert!(parse_run_count("-3").is_err());
        assert!(parse_run_count("three").is_err());
        assert!(parse_run_count("").is_err());
    }

    #[test]
    fn test_builder_defaults() {
        let config = RunConfiguration::builder().build().unwrap();
        assert_eq!(config.runs(), 1);
        assert!(!config.warm_up());
        assert!(!config.print_errors());
        assert!(config.parser_options().is_empty());
    }

    #[test]
    fn test_builder_rejects_zero_runs() {
        let err = RunConfiguration::builder().runs(0).build().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRunCount(_)));
    }

    #[test]
    fn test_report_defaults_to_progress() {
        let buffer = MemoryBuffer::new();
        let config = RunConfiguration::builder()
            .progress(OutputSink::new(buffer.clone()))
            .build()
            .unwrap();

        config.progress().line(format_args!("progress")).unwrap();
        config.report().line(format_args!("report")).unwrap();
        assert_eq!(buffer.contents(), "progress\nreport\n");
    }

    #[test]
    fn test_validate_options() {
        let mut supported = SupportedOptions::new();
        supported.insert("histo", "prints a histogram");
        supported.insert("kinds", "prints token counts");

        let config = RunConfiguration::builder()
            .parser_option("histo")
            .parser_option("kinds:3")
            .build()
            .unwrap();
        assert!(config.validate_options("scan", &supported).is_ok());
        assert_eq!(config.option_keys().collect::<Vec<_>>(), ["histo", "kinds"]);

        let config = RunConfiguration::builder()
            .parser_options(["histo", "bogus-flag"])
            .build()
            .unwrap();
        match config.validate_options("scan", &supported) {
            Err(ConfigError::UnsupportedOption { parser, option }) => {
                assert_eq!(parser, "scan");
                assert_eq!(option, "bogus-flag");
            }
            other => panic!("expected unsupported option, got {:?}", other),
        }
    }

    #[test]
    fn test_check_option_keys() {
        let mut supported = SupportedOptions::new();
        supported.insert("kinds", "prints token counts");

        assert!(check_option_keys("scan", &["kinds:2"], &supported).is_ok());
        assert!(check_option_keys::<String>("scan", &[], &supported).is_ok());
        let err = check_option_keys("scan", &["kinds", "bogus-flag:1"], &supported).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::UnsupportedOption { ref option, .. } if option == "bogus-flag"
        ));
    }
}
