//! Text Report
//!
//! Line-oriented plain text, append-friendly. Field order and separators are
//! fixed so new reports line up with reports produced by earlier versions:
//!
//! ```text
//! ########################################
//! Executed: Mon Oct 19 10:00:00 UTC 2026
//! Parser: scan (warmed up, histo)
//! Tested files in directory: corpus
//! ########################################
//! a.js: 1 : 4ms 2 : 5ms\t\t\tAvg : 4ms\t\t\tSuccess: true
//! Whole parsing took: 1 : 4ms 2 : 5ms\t\t\tAvg : 4ms
//! ```

use crate::report::{RunMeta, RunReport, truncating_mean};
use chrono::{DateTime, Utc};
use parsebench_core::{OutputSink, SourceKind};
use std::fmt::Write as _;
use std::io;

/// Separator line opening and closing the header block
pub const SEPARATOR: &str = "########################################";

/// Label of the aggregate line
pub const AGGREGATE_LABEL: &str = "Whole parsing took";

/// `Executed: <timestamp>` header line
pub fn format_executed(timestamp: &DateTime<Utc>) -> String {
    format!("Executed: {}", timestamp.format("%a %b %d %H:%M:%S UTC %Y"))
}

/// Render the header block, one entry per line
pub fn format_header(meta: &RunMeta) -> Vec<String> {
    let modifiers = meta.modifiers();
    let parser = if modifiers.is_empty() {
        format!("Parser: {}", meta.parser)
    } else {
        format!("Parser: {} ({})", meta.parser, modifiers.join(", "))
    };
    let source = match meta.source_kind {
        SourceKind::Directory => format!("Tested files in directory: {}", meta.source_name),
        SourceKind::File => format!("Tested file: {}", meta.source_name),
    };

    vec![
        SEPARATOR.to_string(),
        format_executed(&meta.timestamp),
        parser,
        source,
        SEPARATOR.to_string(),
    ]
}

/// Render one timing line.
///
/// `success` is `None` for the aggregate line, which carries no flag.
pub fn format_timing_line(label: &str, times: &[u64], success: Option<bool>) -> String {
    let mut line = format!("{}:", label);
    for (i, t) in times.iter().enumerate() {
        let _ = write!(line, " {} : {}ms", i + 1, t);
    }
    let _ = write!(line, "\t\t\tAvg : {}ms", truncating_mean(times));
    if let Some(success) = success {
        let _ = write!(line, "\t\t\tSuccess: {}", success);
    }
    line
}

/// Writes report blocks to a sink, flushing after every line
#[derive(Debug, Clone)]
pub struct Reporter {
    sink: OutputSink,
}

impl Reporter {
    /// Reporter writing to `sink`
    pub fn new(sink: OutputSink) -> Self {
        Self { sink }
    }

    /// Write the header block
    pub fn header(&self, meta: &RunMeta) -> io::Result<()> {
        for line in format_header(meta) {
            self.sink.line(format_args!("{}", line))?;
        }
        Ok(())
    }

    /// Write one timing line
    pub fn timing_line(&self, label: &str, times: &[u64], success: Option<bool>) -> io::Result<()> {
        self.sink
            .line(format_args!("{}", format_timing_line(label, times, success)))
    }

    /// Header, one line per file in canonical order, then the aggregate line
    pub fn write_report(&self, report: &RunReport) -> io::Result<()> {
        self.header(report.meta())?;
        for (file, stat) in report.files() {
            self.timing_line(file.name(), stat.times(), Some(stat.success()))?;
        }
        self.timing_line(AGGREGATE_LABEL, report.totals(), None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use parsebench_core::{FileId, MemoryBuffer};

    fn meta(kind: SourceKind, warmed_up: bool, options: &[&str]) -> RunMeta {
        RunMeta {
            timestamp: Utc.with_ymd_and_hms(2026, 10, 19, 10, 0, 0).unwrap(),
            parser: "scan".to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
            warmed_up,
            source_kind: kind,
            source_name: "corpus".to_string(),
        }
    }

    #[test]
    fn test_timing_line() {
        assert_eq!(
            format_timing_line("a.js", &[4, 5], Some(true)),
            "a.js: 1 : 4ms 2 : 5ms\t\t\tAvg : 4ms\t\t\tSuccess: true"
        );
        assert_eq!(
            format_timing_line(AGGREGATE_LABEL, &[10, 13, 20], None),
            "Whole parsing took: 1 : 10ms 2 : 13ms 3 : 20ms\t\t\tAvg : 14ms"
        );
        assert_eq!(
            format_timing_line("y.js", &[0], Some(false)),
            "y.js: 1 : 0ms\t\t\tAvg : 0ms\t\t\tSuccess: false"
        );
    }

    #[test]
    fn test_header() {
        let lines = format_header(&meta(SourceKind::Directory, true, &["histo", "kinds:3"]));
        assert_eq!(
            lines,
            [
                SEPARATOR,
                "Executed: Mon Oct 19 10:00:00 UTC 2026",
                "Parser: scan (warmed up, histo, kinds:3)",
                "Tested files in directory: corpus",
                SEPARATOR,
            ]
        );

        let lines = format_header(&meta(SourceKind::File, false, &[]));
        assert_eq!(lines[2], "Parser: scan");
        assert_eq!(lines[3], "Tested file: corpus");

        let lines = format_header(&meta(SourceKind::File, false, &["lex"]));
        assert_eq!(lines[2], "Parser: scan (lex)");
    }

    #[test]
    fn test_write_report() {
        let buffer = MemoryBuffer::new();
        let reporter = Reporter::new(OutputSink::new(buffer.clone()));

        let mut report = RunReport::new(meta(SourceKind::Directory, false, &[]), 2);
        let x = FileId::new("/corpus/x.js");
        let y = FileId::new("/corpus/y.js");
        report.record(0, &y, 2, false);
        report.record(0, &x, 1, true);
        report.record(1, &y, 4, false);
        report.record(1, &x, 3, true);

        reporter.write_report(&report).unwrap();

        let lines = buffer.lines();
        assert_eq!(lines.len(), 5 + 2 + 1);
        assert_eq!(lines[5], "x.js: 1 : 1ms 2 : 3ms\t\t\tAvg : 2ms\t\t\tSuccess: true");
        assert_eq!(lines[6], "y.js: 1 : 2ms 2 : 4ms\t\t\tAvg : 3ms\t\t\tSuccess: false");
        assert_eq!(lines[7], "Whole parsing took: 1 : 3ms 2 : 7ms\t\t\tAvg : 5ms");
    }
}
