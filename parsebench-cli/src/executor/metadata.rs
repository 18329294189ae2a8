//! Report Header Collection

use crate::enumerate::FileEnumerator;
use chrono::Utc;
use parsebench_core::RunConfiguration;
use parsebench_report::RunMeta;

/// Build the report header for `parser` running with `config` over `source`
pub fn build_run_meta(parser: &str, config: &RunConfiguration, source: &FileEnumerator) -> RunMeta {
    RunMeta {
        timestamp: Utc::now(),
        parser: parser.to_string(),
        options: config.parser_options().to_vec(),
        warmed_up: config.warm_up(),
        source_kind: source.kind(),
        source_name: source.source_name(),
    }
}
