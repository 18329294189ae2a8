//! Scan Parser
//!
//! The canonical built-in back-end: a hand-written ECMAScript tokenizer
//! followed by a delimiter-balance pass. A file succeeds when it tokenizes
//! cleanly and every `(`, `[` and `{` is closed by its matching delimiter.
//!
//! ## Options
//!
//! - `lex` - measure only the tokenizer, skip the balance pass
//! - `histo` - print a token-kind histogram for each file to the progress sink
//! - `kinds[:N]` - print cumulative token counts per kind to the report sink at
//!   the end of the run, optionally limited to the N most frequent kinds

mod lexer;

use fxhash::FxHashMap;
use lexer::{DelimiterBalance, Lexer, SyntaxError, TokenKind};
use parsebench_core::{
    ParserPlugin, PluginError, RunConfiguration, SupportedOptions, split_option,
};
use std::path::Path;

const OPT_LEX: &str = "lex";
const OPT_HISTO: &str = "histo";
const OPT_KINDS: &str = "kinds";

/// Tokenizer plus delimiter-balance back-end
#[derive(Debug, Default)]
pub struct ScanParser {
    lex_only: bool,
    print_histogram: bool,
    print_kinds: bool,
    kinds_limit: Option<usize>,
    /// Token counts over every file of the run, for the `kinds` report
    kind_totals: FxHashMap<TokenKind, u64>,
}

impl ScanParser {
    /// Parser name used for selection
    pub const NAME: &'static str = "scan";

    /// Create a parser with all options off
    pub fn new() -> Self {
        Self::default()
    }

    /// Tokenize and check `source`, counting tokens per kind into `counts`
    fn check(&self, source: &str, counts: &mut FxHashMap<TokenKind, u64>) -> Result<(), SyntaxError> {
        let mut balance = DelimiterBalance::new();
        for token in Lexer::new(source) {
            let token = token?;
            *counts.entry(token.kind).or_default() += 1;
            if !self.lex_only {
                balance.feed(&token)?;
            }
        }
        if self.lex_only {
            Ok(())
        } else {
            balance.finish()
        }
    }
}

/// Counts sorted most frequent first, ties by kind
fn sorted_counts(counts: &FxHashMap<TokenKind, u64>) -> Vec<(TokenKind, u64)> {
    let mut sorted: Vec<_> = counts.iter().map(|(k, n)| (*k, *n)).collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    sorted
}

impl ParserPlugin for ScanParser {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn supported_options(&self) -> SupportedOptions {
        let mut options = SupportedOptions::new();
        options.insert(OPT_LEX, "measures only the lexer");
        options.insert(OPT_HISTO, "prints a token kind histogram for each file");
        options.insert(
            OPT_KINDS,
            "prints token count per kind at the end of the run, [:N] limits to the N most frequent",
        );
        options
    }

    fn setup(&mut self, config: &RunConfiguration) -> Result<(), PluginError> {
        *self = Self::default();
        for option in config.parser_options() {
            match split_option(option) {
                (OPT_LEX, _) => self.lex_only = true,
                (OPT_HISTO, _) => self.print_histogram = true,
                (OPT_KINDS, limit) => {
                    self.print_kinds = true;
                    if let Some(value) = limit {
                        let n = value.parse::<usize>().map_err(|_| {
                            PluginError::InvalidOptionValue {
                                key: OPT_KINDS.to_string(),
                                value: value.to_string(),
                            }
                        })?;
                        self.kinds_limit = Some(n);
                    }
                }
                _ => return Err(PluginError::UnsupportedOption(option.clone())),
            }
        }
        tracing::debug!(
            lex_only = self.lex_only,
            histogram = self.print_histogram,
            kinds = self.print_kinds,
            "scan parser configured"
        );
        Ok(())
    }

    fn parse(&mut self, file: &Path, config: &RunConfiguration) -> Result<bool, PluginError> {
        let bytes = std::fs::read(file).map_err(|e| PluginError::io(file, e))?;
        let progress = config.progress();

        let source = match String::from_utf8(bytes) {
            Ok(source) => source,
            Err(e) => {
                if config.print_errors() {
                    progress.line(format_args!(
                        "{}: invalid UTF-8 at byte {}",
                        file.display(),
                        e.utf8_error().valid_up_to()
                    ))?;
                }
                return Ok(false);
            }
        };

        let mut counts = FxHashMap::default();
        let result = self.check(&source, &mut counts);

        if let Err(e) = &result {
            if config.print_errors() {
                progress.line(format_args!("{}:{}", file.display(), e))?;
            }
        }
        if self.print_histogram {
            for (kind, n) in sorted_counts(&counts) {
                progress.line(format_args!("{}\t\t{}", kind, n))?;
            }
        }
        for (kind, n) in counts {
            *self.kind_totals.entry(kind).or_default() += n;
        }

        Ok(result.is_ok())
    }

    fn report(&mut self, config: &RunConfiguration) -> Result<(), PluginError> {
        if !self.print_kinds {
            return Ok(());
        }
        let report = config.report();
        report.line(format_args!(""))?;
        report.line(format_args!("Token count per kind:"))?;
        let sorted = sorted_counts(&self.kind_totals);
        let limit = self.kinds_limit.unwrap_or(sorted.len());
        for (kind, n) in sorted.into_iter().take(limit) {
            report.line(format_args!("Kind: {} Tokens: {}", kind, n))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parsebench_core::{MemoryBuffer, OutputSink};
    use std::fs;
    use tempfile::TempDir;

    fn config(options: &[&str], print_errors: bool) -> (RunConfiguration, MemoryBuffer, MemoryBuffer) {
        let progress = MemoryBuffer::new();
        let report = MemoryBuffer::new();
        let config = RunConfiguration::builder()
            .parser_options(options.iter().copied())
            .print_errors(print_errors)
            .progress(OutputSink::new(progress.clone()))
            .report(OutputSink::new(report.clone()))
            .build()
            .unwrap();
        (config, progress, report)
    }

    fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_valid_and_invalid_sources() {
        let dir = TempDir::new().unwrap();
        let good = write(&dir, "good.js", "function add(a, b) { return a + b; }\n");
        let bad = write(&dir, "bad.js", "function add(a, b) { return a + b;\n");

        let (config, progress, _) = config(&[], false);
        let mut parser = ScanParser::new();
        parser.setup(&config).unwrap();

        assert!(parser.parse(&good, &config).unwrap());
        assert!(!parser.parse(&bad, &config).unwrap());
        // Nothing printed without print-errors
        assert!(progress.contents().is_empty());
    }

    #[test]
    fn test_lex_only_skips_balance() {
        let dir = TempDir::new().unwrap();
        let unbalanced = write(&dir, "open.js", "if (x) {");

        let (config, _, _) = config(&["lex"], false);
        let mut parser = ScanParser::new();
        parser.setup(&config).unwrap();
        assert!(parser.parse(&unbalanced, &config).unwrap());
    }

    #[test]
    fn test_print_errors() {
        let dir = TempDir::new().unwrap();
        let bad = write(&dir, "bad.js", "let s = 'open\n");

        let (config, progress, _) = config(&[], true);
        let mut parser = ScanParser::new();
        parser.setup(&config).unwrap();
        assert!(!parser.parse(&bad, &config).unwrap());

        let out = progress.contents();
        assert!(out.contains("bad.js:1:9: unterminated string literal"), "{}", out);
    }

    #[test]
    fn test_invalid_utf8_is_a_parse_failure() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("binary.js");
        fs::write(&path, [0x66, 0x6f, 0xff, 0xfe]).unwrap();

        let (config, _, _) = config(&[], false);
        let mut parser = ScanParser::new();
        parser.setup(&config).unwrap();
        assert!(!parser.parse(&path, &config).unwrap());
    }

    #[test]
    fn test_missing_file_is_io_fault() {
        let dir = TempDir::new().unwrap();
        let (config, _, _) = config(&[], false);
        let mut parser = ScanParser::new();
        parser.setup(&config).unwrap();

        let err = parser.parse(&dir.path().join("gone.js"), &config).unwrap_err();
        assert!(matches!(err, PluginError::Io { .. }));
    }

    #[test]
    fn test_histogram() {
        let dir = TempDir::new().unwrap();
        let file = write(&dir, "h.js", "a(b, c);");

        let (config, progress, _) = config(&["histo"], false);
        let mut parser = ScanParser::new();
        parser.setup(&config).unwrap();
        assert!(parser.parse(&file, &config).unwrap());

        assert_eq!(progress.lines(), ["Punctuator\t\t4", "Identifier\t\t3"]);
    }

    #[test]
    fn test_kinds_report() {
        let dir = TempDir::new().unwrap();
        let a = write(&dir, "a.js", "x = 1;");
        let b = write(&dir, "b.js", "y = 'two'; // note");

        let (config, _, report) = config(&["kinds:2"], false);
        let mut parser = ScanParser::new();
        parser.setup(&config).unwrap();
        parser.parse(&a, &config).unwrap();
        parser.parse(&b, &config).unwrap();
        parser.report(&config).unwrap();

        assert_eq!(
            report.lines(),
            ["", "Token count per kind:", "Kind: Punctuator Tokens: 4", "Kind: Identifier Tokens: 2"]
        );
    }

    #[test]
    fn test_setup_resets_state() {
        let dir = TempDir::new().unwrap();
        let a = write(&dir, "a.js", "x;");

        let (config, _, report) = config(&["kinds"], false);
        let mut parser = ScanParser::new();
        parser.setup(&config).unwrap();
        parser.parse(&a, &config).unwrap();
        parser.setup(&config).unwrap();
        parser.parse(&a, &config).unwrap();
        parser.report(&config).unwrap();

        assert!(report.contents().contains("Kind: Identifier Tokens: 1"));
    }

    #[test]
    fn test_setup_rejects_bad_options() {
        let (config, _, _) = config(&["kinds:many"], false);
        let err = ScanParser::new().setup(&config).unwrap_err();
        assert!(matches!(err, PluginError::InvalidOptionValue { ref key, ref value } if key == "kinds" && value == "many"));
        assert!(err.is_config());

        let (config, _, _) = self::config(&["bogus-flag"], false);
        let err = ScanParser::new().setup(&config).unwrap_err();
        assert!(matches!(err, PluginError::UnsupportedOption(ref o) if o == "bogus-flag"));
    }

    #[test]
    fn test_report_is_noop_without_kinds() {
        let (config, progress, report) = config(&[], false);
        let mut parser = ScanParser::new();
        parser.setup(&config).unwrap();
        parser.report(&config).unwrap();
        assert!(report.contents().is_empty());
        assert!(progress.contents().is_empty());
    }
}
