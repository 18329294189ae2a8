//! Regex Parser
//!
//! A table-driven lexical scanner: one anchored alternation describing every
//! ECMAScript token class, compiled once in `setup`. A file succeeds when the
//! grammar covers it from the first byte to the last.
//!
//! Compiling the grammar dominates a cold start, which is exactly the cost
//! `setup` keeps out of the timed region.

use parsebench_core::{ParserPlugin, PluginError, RunConfiguration};
use regex::Regex;
use std::path::Path;
use std::time::Instant;

const TOKEN_GRAMMAR: &str = r##"(?x)
    ^(?:
        \s+
      | //[^\n]*
      | /\*(?s:.*?)\*/
      | "(?:[^"\\\n]|\\(?s:.))*"
      | '(?:[^'\\\n]|\\(?s:.))*'
      | `(?:[^`\\]|\\(?s:.))*`
      | 0[xXoObB][0-9a-fA-F_]+n?
      | (?:[0-9][0-9_]*(?:\.[0-9_]*)?|\.[0-9][0-9_]*)(?:[eE][+-]?[0-9]+)?n?
      | [\p{L}$_][\p{L}\p{N}$_\x{200C}\x{200D}]*
      | >>>= | \.\.\. | === | !== | \*\*= | <<= | >>= | >>> | &&= | \|\|= | \?\?=
      | => | == | != | <= | >= | && | \|\| | \?\? | \?\. | \+\+ | -- | [-+*/%&|^]= | << | >> | \*\*
      | [{}()\[\];,<>+\-*/%&|^!~?:=.@\#]
    )"##;

/// Lexical coverage back-end built on the `regex` crate
#[derive(Debug, Default)]
pub struct RegexParser {
    grammar: Option<Regex>,
}

impl RegexParser {
    /// Parser name used for selection
    pub const NAME: &'static str = "regex";

    /// Create a parser; `setup` must run before `parse`
    pub fn new() -> Self {
        Self::default()
    }
}

/// 1-based line and column of a byte offset
fn position(source: &str, offset: usize) -> (usize, usize) {
    let before = &source[..offset];
    let line = before.matches('\n').count() + 1;
    let column = before
        .rsplit('\n')
        .next()
        .map_or(0, |l| l.chars().count())
        + 1;
    (line, column)
}

impl ParserPlugin for RegexParser {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn setup(&mut self, config: &RunConfiguration) -> Result<(), PluginError> {
        if let Some(option) = config.parser_options().first() {
            return Err(PluginError::UnsupportedOption(option.clone()));
        }
        let start = Instant::now();
        let grammar = Regex::new(TOKEN_GRAMMAR).map_err(|e| PluginError::Setup(e.to_string()))?;
        tracing::debug!(elapsed = ?start.elapsed(), "compiled token grammar");
        self.grammar = Some(grammar);
        Ok(())
    }

    fn parse(&mut self, file: &Path, config: &RunConfiguration) -> Result<bool, PluginError> {
        let grammar = self.grammar.as_ref().ok_or_else(|| PluginError::NotInitialized {
            plugin: Self::NAME.to_string(),
        })?;
        let bytes = std::fs::read(file).map_err(|e| PluginError::io(file, e))?;
        let Ok(source) = String::from_utf8(bytes) else {
            return Ok(false);
        };

        let mut pos = 0;
        while pos < source.len() {
            match grammar.find(&source[pos..]) {
                Some(m) if m.end() > 0 => pos += m.end(),
                _ => {
                    if config.print_errors() {
                        let (line, column) = position(&source, pos);
                        config.progress().line(format_args!(
                            "{}:{}:{}: no token matches",
                            file.display(),
                            line,
                            column
                        ))?;
                    }
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }
}
