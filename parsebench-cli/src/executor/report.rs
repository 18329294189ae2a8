//! Report Emission
//!
//! The text report goes to the report sink first; the plugin's own
//! end-of-run diagnostics follow it on the same sink.

use super::execution::EngineError;
use parsebench_core::{ParserPlugin, RunConfiguration};
use parsebench_report::{Reporter, RunReport};

/// Write `report`, then let `plugin` append its post-run report
pub fn emit_report(
    report: &RunReport,
    plugin: &mut dyn ParserPlugin,
    config: &RunConfiguration,
) -> Result<(), EngineError> {
    Reporter::new(config.report().clone()).write_report(report)?;

    let parser = plugin.name().to_string();
    plugin
        .report(config)
        .map_err(|source| EngineError::Report { parser, source })
}
