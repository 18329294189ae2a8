//! Configuration loading from parsebench.toml
//!
//! ParseBench defaults can be stored in a `parsebench.toml` file in the
//! corpus or project directory. The file is discovered by walking up from the
//! current directory; command-line flags always win over file values.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the discovered configuration file
pub const CONFIG_FILE_NAME: &str = "parsebench.toml";

/// ParseBench configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ParsebenchConfig {
    /// Runner configuration
    #[serde(default)]
    pub runner: RunnerConfig,
    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
    /// Backend-specific options
    #[serde(default)]
    pub parser: ParserConfig,
}

/// Runner configuration for benchmark execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Parser back-end to benchmark
    #[serde(default = "default_parser")]
    pub parser: String,
    /// Number of timed passes
    #[serde(default = "default_runs")]
    pub runs: u32,
    /// Run an untimed pass before measurement
    #[serde(default)]
    pub warm_up: bool,
    /// Print parse errors to the progress stream
    #[serde(default)]
    pub print_errors: bool,
    /// Extension of benchmarked files when the source is a directory
    #[serde(default = "default_extension")]
    pub extension: String,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            parser: default_parser(),
            runs: default_runs(),
            warm_up: false,
            print_errors: false,
            extension: default_extension(),
        }
    }
}

fn default_parser() -> String {
    "scan".to_string()
}
fn default_runs() -> u32 {
    1
}
fn default_extension() -> String {
    "js".to_string()
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputConfig {
    /// File receiving progress lines (stdout if unset)
    #[serde(default)]
    pub progress: Option<PathBuf>,
    /// File the report is appended to (progress stream if unset)
    #[serde(default)]
    pub report: Option<PathBuf>,
}

/// Backend-specific options
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ParserConfig {
    /// `key` or `key:value` tokens passed to the selected parser
    #[serde(default)]
    pub options: Vec<String>,
}

impl ParsebenchConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Try to discover and load configuration by walking up from current directory
    pub fn discover() -> Option<Self> {
        let mut dir = std::env::current_dir().ok()?;
        loop {
            let config_path = dir.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                return match Self::load(&config_path) {
                    Ok(config) => {
                        tracing::debug!(path = %config_path.display(), "loaded configuration");
                        Some(config)
                    }
                    Err(e) => {
                        tracing::warn!(path = %config_path.display(), error = %e, "ignoring unreadable configuration");
                        None
                    }
                };
            }
            if !dir.pop() {
                break;
            }
        }
        None
    }

    /// Generate a default configuration as TOML string
    pub fn default_toml() -> String {
        r#"# ParseBench Configuration

[runner]
# Parser back-end: "scan" or "regex"
parser = "scan"
# Number of timed passes over the corpus
runs = 1
# Run one untimed pass before measuring
warm_up = false
# Print parse errors to the progress stream
print_errors = false
# Extension of benchmarked files when the source is a directory
extension = "js"

[output]
# File receiving progress lines (uncomment to enable, default stdout)
# progress = "progress.log"
# File the report is appended to (uncomment to enable, default progress stream)
# report = "report.txt"

[parser]
# Backend-specific options, "key" or "key:value"
options = []
"#
        .to_string()
    }
}
