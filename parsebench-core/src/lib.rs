#![warn(missing_docs)]
//! ParseBench Core - Plugin Contract
//!
//! This crate provides the building blocks shared by the engine and by every
//! parser back-end:
//! - `ParserPlugin` trait: name, supported options, setup, parse, report
//! - `RunConfiguration`: immutable execution parameters built once per run
//! - `OutputSink`: flushed, append-only progress and report streams
//! - `PluginRegistry`: explicit name-to-plugin map built at startup
//! - `FileId`: canonical, totally ordered file identity
//! - High-level millisecond `Timer` over the monotonic clock

mod measure;
mod options;
mod plugin;
mod registry;
mod sink;
mod source;

pub use measure::Timer;
pub use options::{
    ConfigError, RunConfiguration, RunConfigurationBuilder, check_option_keys, parse_run_count,
    split_option,
};
pub use plugin::{ParserPlugin, PluginError, SupportedOptions};
pub use registry::PluginRegistry;
pub use sink::{MemoryBuffer, OutputSink};
pub use source::{FileId, SourceKind};
