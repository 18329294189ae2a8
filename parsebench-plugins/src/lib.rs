#![warn(missing_docs)]
//! ParseBench Plugins - Built-in Parser Back-ends
//!
//! - [`ScanParser`] (`scan`, the default): hand-written ECMAScript tokenizer
//!   with a delimiter-balance pass and histogram options
//! - [`RegexParser`] (`regex`): lexical coverage check driven by a token
//!   grammar compiled during setup
//!
//! Both are registered explicitly through [`builtin_registry`]; there is no
//! global discovery.

mod pattern;
mod scan;

pub use pattern::RegexParser;
pub use scan::ScanParser;

use parsebench_core::{ConfigError, PluginRegistry};

/// Parser used when none is selected
pub const DEFAULT_PARSER: &str = ScanParser::NAME;

/// Register every built-in parser into `registry`
pub fn register_builtins(registry: &mut PluginRegistry) -> Result<(), ConfigError> {
    registry.register(ScanParser::new())?;
    registry.register(RegexParser::new())?;
    Ok(())
}

/// A registry holding every built-in parser
pub fn builtin_registry() -> Result<PluginRegistry, ConfigError> {
    let mut registry = PluginRegistry::new();
    register_builtins(&mut registry)?;
    Ok(registry)
}
