//! Plugin Registry
//!
//! Parsers are registered explicitly at startup instead of being discovered
//! through process-wide global state. Names are unique and iteration is in
//! name order, so usage text and `--list` output are stable.

use crate::options::ConfigError;
use crate::plugin::ParserPlugin;
use std::collections::BTreeMap;

/// Name-to-plugin map built once during process initialization
#[derive(Default)]
pub struct PluginRegistry {
    plugins: BTreeMap<String, Box<dyn ParserPlugin>>,
}

impl PluginRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a plugin under its own name
    pub fn register(&mut self, plugin: impl ParserPlugin + 'static) -> Result<(), ConfigError> {
        self.register_boxed(Box::new(plugin))
    }

    /// Register an already boxed plugin
    pub fn register_boxed(&mut self, plugin: Box<dyn ParserPlugin>) -> Result<(), ConfigError> {
        let name = plugin.name().to_string();
        if self.plugins.contains_key(&name) {
            return Err(ConfigError::DuplicateParser(name));
        }
        tracing::debug!(parser = %name, "registered parser");
        self.plugins.insert(name, plugin);
        Ok(())
    }

    /// Builder-style registration
    pub fn with(mut self, plugin: impl ParserPlugin + 'static) -> Result<Self, ConfigError> {
        self.register(plugin)?;
        Ok(self)
    }

    /// Look up a plugin by name
    pub fn get(&self, name: &str) -> Option<&dyn ParserPlugin> {
        self.plugins.get(name).map(|p| p.as_ref())
    }

    /// Look up a plugin by name for a benchmark run
    pub fn get_mut(&mut self, name: &str) -> Option<&mut (dyn ParserPlugin + 'static)> {
        self.plugins.get_mut(name).map(|p| p.as_mut())
    }

    /// Resolve a plugin or fail with [`ConfigError::UnknownParser`]
    pub fn resolve(&mut self, name: &str) -> Result<&mut (dyn ParserPlugin + 'static), ConfigError> {
        self.get_mut(name)
            .ok_or_else(|| ConfigError::UnknownParser(name.to_string()))
    }

    /// Registered names, sorted
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.plugins.keys().map(String::as_str)
    }

    /// Registered plugins, in name order
    pub fn iter(&self) -> impl Iterator<Item = &dyn ParserPlugin> {
        self.plugins.values().map(|p| p.as_ref())
    }

    /// Number of registered plugins
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Whether no plugin is registered
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

impl std::fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
