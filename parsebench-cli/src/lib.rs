#![warn(missing_docs)]
//! ParseBench CLI Library
//!
//! Command line, configuration layering and the benchmark engine. A binary
//! builds a [`PluginRegistry`] with the parsers it ships and hands it to
//! [`run`]:
//!
//! ```ignore
//! fn main() -> anyhow::Result<()> {
//!     let registry = parsebench_plugins::builtin_registry()?;
//!     parsebench_cli::run(registry)
//! }
//! ```
//!
//! Settings are layered: command-line flags, then `parsebench.toml`, then
//! built-in defaults.

mod config;
mod enumerate;
mod executor;

pub use config::*;
pub use enumerate::{EnumerateError, FileEnumerator, SourceFiles};
pub use executor::{BenchmarkEngine, EngineError, build_run_meta, emit_report};

use clap::{CommandFactory, FromArgMatches, Parser};
use parsebench_core::{
    ConfigError, OutputSink, PluginRegistry, RunConfiguration, check_option_keys, parse_run_count,
};
use parsebench_report::RunReport;
use std::ffi::OsString;
use std::fmt::Write as _;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// ParseBench CLI arguments
#[derive(Parser, Debug)]
#[command(name = "parsebench")]
#[command(
    author,
    version,
    about = "ParseBench - compare parser back-ends over a source corpus"
)]
pub struct Cli {
    /// Parser back-end to benchmark (default: scan, or parsebench.toml)
    #[arg(short, long, value_name = "NAME")]
    pub parser: Option<String>,

    /// Print parse errors to the progress stream
    #[arg(short = 'e', long)]
    pub print_errors: bool,

    /// Run one untimed pass before measuring
    #[arg(short, long)]
    pub warm_up: bool,

    /// Write progress lines to FILE (truncated) instead of stdout
    #[arg(short = 'l', long, value_name = "FILE")]
    pub progress: Option<PathBuf>,

    /// Append the report to FILE instead of the progress stream
    #[arg(short, long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Backend-specific option, repeatable
    #[arg(short = 'o', long = "option", value_name = "KEY[:VALUE]")]
    pub options: Vec<String>,

    /// Extension of benchmarked files in a directory source (default: js)
    #[arg(long, value_name = "EXT")]
    pub extension: Option<String>,

    /// Read settings from FILE instead of discovering parsebench.toml
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// List available parsers with their options and exit
    #[arg(long)]
    pub list: bool,

    /// Verbose diagnostics on stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Source file or directory to benchmark
    #[arg(required_unless_present = "list")]
    pub source: Option<PathBuf>,

    /// Number of timed passes (default: 1)
    pub runs: Option<String>,
}

/// Run the ParseBench CLI with the process arguments.
///
/// Malformed arguments and configuration errors print the usage text,
/// including every parser's options, and exit with status 1.
pub fn run(registry: PluginRegistry) -> anyhow::Result<()> {
    let cli = match parse_args(&registry, std::env::args_os()) {
        Ok(cli) => cli,
        Err(e) if !e.use_stderr() => {
            e.print()?;
            return Ok(());
        }
        Err(e) => {
            e.print()?;
            eprintln!();
            eprint!("{}", usage_text(&registry));
            std::process::exit(1);
        }
    };
    run_with_cli(cli, registry)
}

/// Run the ParseBench CLI with pre-parsed arguments.
pub fn run_with_cli(cli: Cli, mut registry: PluginRegistry) -> anyhow::Result<()> {
    init_logging(cli.verbose);

    if cli.list {
        print!("{}", list_parsers(&registry));
        return Ok(());
    }

    // Discover parsebench.toml unless one was named (CLI flags override)
    let config = match &cli.config {
        Some(path) => ParsebenchConfig::load(path)
            .map_err(|e| anyhow::anyhow!("Failed to load {}: {}", path.display(), e))?,
        None => ParsebenchConfig::discover().unwrap_or_default(),
    };

    let outcome = Invocation::resolve(&cli, &config)
        .map_err(EngineError::from)
        .and_then(|invocation| invocation.execute(&mut registry));

    match outcome {
        Ok(_) => Ok(()),
        Err(e) if e.is_config() => {
            eprintln!("Error: {}", e);
            eprintln!();
            eprint!("{}", usage_text(&registry));
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}

/// Parse `args` against the command line, with every parser's options in the help text
pub fn parse_args<I, T>(registry: &PluginRegistry, args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = command(registry).try_get_matches_from(args)?;
    Cli::from_arg_matches(&matches)
}

fn command(registry: &PluginRegistry) -> clap::Command {
    Cli::command().after_help(parser_options_text(registry))
}

/// Full usage text: global flags followed by each parser's options
pub fn usage_text(registry: &PluginRegistry) -> String {
    command(registry).render_help().to_string()
}

fn parser_options_text(registry: &PluginRegistry) -> String {
    let mut text = String::from("Parser options (-o KEY[:VALUE]):");
    for plugin in registry.iter() {
        let options = plugin.supported_options();
        if options.is_empty() {
            let _ = write!(text, "\n  {}: no options", plugin.name());
            continue;
        }
        let _ = write!(text, "\n  {}:", plugin.name());
        let width = options.keys().map(|k| k.len()).max().unwrap_or(0);
        for (key, description) in &options {
            let _ = write!(text, "\n    {:width$}  {}", key, description, width = width);
        }
    }
    text
}

/// `--list` output: every registered parser with its options
pub fn list_parsers(registry: &PluginRegistry) -> String {
    let mut text = String::from("Available parsers:\n");
    for plugin in registry.iter() {
        let _ = writeln!(text, "├── {}", plugin.name());
        for (key, description) in plugin.supported_options() {
            let _ = writeln!(text, "│   ├── {}: {}", key, description);
        }
    }
    let _ = writeln!(text, "{} parsers found.", registry.len());
    text
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // Already installed when called twice in one process
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// One benchmark invocation with command line and file settings resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Parser name
    pub parser: String,
    /// Source file or directory
    pub source: PathBuf,
    /// Number of timed passes
    pub runs: u32,
    /// Warm-up pass enabled
    pub warm_up: bool,
    /// Parse errors printed to the progress stream
    pub print_errors: bool,
    /// Backend-specific option tokens
    pub options: Vec<String>,
    /// Extension filter for directory sources
    pub extension: String,
    /// Progress file, stdout if unset
    pub progress: Option<PathBuf>,
    /// Report file, progress stream if unset
    pub report: Option<PathBuf>,
}

impl Invocation {
    /// Layer `cli` over `config`.
    ///
    /// A non-empty `-o` list replaces the configured options; boolean flags
    /// can only switch a setting on.
    pub fn resolve(cli: &Cli, config: &ParsebenchConfig) -> Result<Self, ConfigError> {
        let source = cli.source.clone().ok_or(ConfigError::MissingSource)?;
        let runs = match (&cli.runs, config.runner.runs) {
            (Some(runs), _) => parse_run_count(runs)?,
            (None, 0) => return Err(ConfigError::InvalidRunCount("0".to_string())),
            (None, runs) => runs,
        };
        let options = if cli.options.is_empty() {
            config.parser.options.clone()
        } else {
            cli.options.clone()
        };

        Ok(Self {
            parser: cli
                .parser
                .clone()
                .unwrap_or_else(|| config.runner.parser.clone()),
            source,
            runs,
            warm_up: cli.warm_up || config.runner.warm_up,
            print_errors: cli.print_errors || config.runner.print_errors,
            options,
            extension: cli
                .extension
                .clone()
                .unwrap_or_else(|| config.runner.extension.clone()),
            progress: cli.progress.clone().or_else(|| config.output.progress.clone()),
            report: cli.report.clone().or_else(|| config.output.report.clone()),
        })
    }

    /// Open the progress (truncated) and report (appended) files
    pub fn run_configuration(&self) -> Result<RunConfiguration, EngineError> {
        let mut builder = RunConfiguration::builder()
            .runs(self.runs)
            .warm_up(self.warm_up)
            .print_errors(self.print_errors)
            .parser_options(self.options.iter().cloned());
        if let Some(path) = &self.progress {
            builder = builder.progress(OutputSink::create(path)?);
        }
        if let Some(path) = &self.report {
            builder = builder.report(OutputSink::append(path)?);
        }
        Ok(builder.build()?)
    }

    /// Resolve the parser and source, then run the benchmark.
    ///
    /// Option keys are checked before the output files are opened, so a
    /// rejected invocation leaves an existing progress file untouched.
    pub fn execute(&self, registry: &mut PluginRegistry) -> Result<RunReport, EngineError> {
        let plugin = registry.resolve(&self.parser)?;
        let source = FileEnumerator::new(&self.source, &self.extension)?;
        check_option_keys(plugin.name(), &self.options, &plugin.supported_options())?;
        let config = self.run_configuration()?;
        BenchmarkEngine::new(config, source).run(plugin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parsebench_core::{ParserPlugin, PluginError, SupportedOptions};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    /// Succeeds on every non-empty file
    struct NonEmpty;

    impl ParserPlugin for NonEmpty {
        fn name(&self) -> &str {
            "nonempty"
        }

        fn supported_options(&self) -> SupportedOptions {
            let mut options = SupportedOptions::new();
            options.insert("trace", "prints every visited node");
            options
        }

        fn parse(&mut self, file: &Path, _config: &RunConfiguration) -> Result<bool, PluginError> {
            let len = fs::metadata(file).map_err(|e| PluginError::io(file, e))?.len();
            Ok(len > 0)
        }
    }

    struct Silent;

    impl ParserPlugin for Silent {
        fn name(&self) -> &str {
            "silent"
        }

        fn parse(&mut self, _file: &Path, _config: &RunConfiguration) -> Result<bool, PluginError> {
            Ok(true)
        }
    }

    fn registry() -> PluginRegistry {
        PluginRegistry::new()
            .with(NonEmpty)
            .and_then(|r| r.with(Silent))
            .unwrap()
    }

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["parsebench"];
        argv.extend_from_slice(args);
        parse_args(&registry(), argv).unwrap()
    }

    #[test]
    fn test_parse_flags() {
        let cli = cli(&[
            "-p", "silent", "-e", "-w", "-o", "trace", "-o", "depth:3", "corpus", "5",
        ]);
        assert_eq!(cli.parser.as_deref(), Some("silent"));
        assert!(cli.print_errors);
        assert!(cli.warm_up);
        assert_eq!(cli.options, ["trace", "depth:3"]);
        assert_eq!(cli.source, Some(PathBuf::from("corpus")));
        assert_eq!(cli.runs.as_deref(), Some("5"));
    }

    #[test]
    fn test_source_required_unless_listing() {
        let err = parse_args(&registry(), ["parsebench", "-w"]).unwrap_err();
        assert!(err.use_stderr());
        assert!(parse_args(&registry(), ["parsebench", "--list"]).is_ok());
    }

    #[test]
    fn test_usage_lists_parser_options() {
        let usage = usage_text(&registry());
        assert!(usage.contains("--option <KEY[:VALUE]>"));
        assert!(usage.contains("--warm-up"));
        assert!(usage.contains("nonempty:"));
        assert!(usage.contains("trace  prints every visited node"));
        assert!(usage.contains("silent: no options"));
    }

    #[test]
    fn test_list_parsers() {
        let text = list_parsers(&registry());
        assert_eq!(
            text,
            "Available parsers:\n├── nonempty\n│   ├── trace: prints every visited node\n├── silent\n2 parsers found.\n"
        );
    }

    #[test]
    fn test_resolve_defaults() {
        let invocation = Invocation::resolve(&cli(&["corpus"]), &ParsebenchConfig::default()).unwrap();
        assert_eq!(invocation.parser, "scan");
        assert_eq!(invocation.runs, 1);
        assert_eq!(invocation.extension, "js");
        assert!(!invocation.warm_up);
        assert!(invocation.options.is_empty());
        assert!(invocation.progress.is_none());
    }

    #[test]
    fn test_cli_overrides_file() {
        let mut config = ParsebenchConfig::default();
        config.runner.parser = "silent".to_string();
        config.runner.runs = 4;
        config.runner.warm_up = true;
        config.parser.options = vec!["trace".to_string()];
        config.output.report = Some(PathBuf::from("file-report.txt"));

        let from_file = Invocation::resolve(&cli(&["corpus"]), &config).unwrap();
        assert_eq!(from_file.parser, "silent");
        assert_eq!(from_file.runs, 4);
        assert!(from_file.warm_up);
        assert_eq!(from_file.options, ["trace"]);

        let overridden = Invocation::resolve(
            &cli(&["-p", "nonempty", "-o", "depth:2", "-r", "cli.txt", "corpus", "2"]),
            &config,
        )
        .unwrap();
        assert_eq!(overridden.parser, "nonempty");
        assert_eq!(overridden.runs, 2);
        assert_eq!(overridden.options, ["depth:2"]);
        assert_eq!(overridden.report, Some(PathBuf::from("cli.txt")));
    }

    #[test]
    fn test_invalid_run_counts() {
        let config = ParsebenchConfig::default();
        for runs in ["0", "-1", "many"] {
            let err = Invocation::resolve(&cli(&["corpus", "--", runs]), &config).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidRunCount(_)), "{}", runs);
        }

        let mut config = ParsebenchConfig::default();
        config.runner.runs = 0;
        let err = Invocation::resolve(&cli(&["corpus"]), &config).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRunCount(_)));
    }

    #[test]
    fn test_execute_with_output_files() {
        let dir = TempDir::new().unwrap();
        let corpus = dir.path().join("corpus");
        fs::create_dir(&corpus).unwrap();
        fs::write(corpus.join("full.js"), "x").unwrap();
        fs::write(corpus.join("empty.js"), "").unwrap();

        let progress = dir.path().join("progress.log");
        let report = dir.path().join("report.txt");
        fs::write(&progress, "stale progress\n").unwrap();
        fs::write(&report, "earlier report\n").unwrap();

        let argv: Vec<OsString> = vec![
            "parsebench".into(),
            "-p".into(),
            "nonempty".into(),
            "-l".into(),
            progress.clone().into_os_string(),
            "-r".into(),
            report.clone().into_os_string(),
            corpus.into_os_string(),
            "2".into(),
        ];
        let cli = parse_args(&registry(), argv).unwrap();

        let invocation = Invocation::resolve(&cli, &ParsebenchConfig::default()).unwrap();
        let run = invocation.execute(&mut registry()).unwrap();
        assert_eq!(run.files().len(), 2);

        // Progress is truncated, the report is appended to
        let progress = fs::read_to_string(&progress).unwrap();
        assert!(progress.starts_with("Parsing corpus using nonempty in 2 round(s).\n"));
        let report = fs::read_to_string(&report).unwrap();
        let lines: Vec<_> = report.lines().collect();
        assert_eq!(lines[0], "earlier report");
        assert_eq!(lines[3], "Parser: nonempty");
        assert!(lines[6].starts_with("empty.js: 1 : "));
        assert!(lines[6].ends_with("Success: false"));
        assert!(lines[7].ends_with("Success: true"));
        assert!(lines[8].starts_with("Whole parsing took: "));
    }

    #[test]
    fn test_execute_config_errors() {
        let dir = TempDir::new().unwrap();
        let config = ParsebenchConfig::default();
        let source = dir.path().to_str().unwrap();

        let err = Invocation::resolve(&cli(&["-p", "antlr", source]), &config)
            .unwrap()
            .execute(&mut registry())
            .unwrap_err();
        assert!(matches!(err, EngineError::Config(ConfigError::UnknownParser(_))));

        let missing = dir.path().join("missing");
        let err = Invocation::resolve(&cli(&["-p", "silent", missing.to_str().unwrap()]), &config)
            .unwrap()
            .execute(&mut registry())
            .unwrap_err();
        assert!(err.is_config());

        let err = Invocation::resolve(&cli(&["-p", "silent", "-o", "bogus-flag", source]), &config)
            .unwrap()
            .execute(&mut registry())
            .unwrap_err();
        assert!(matches!(err, EngineError::Config(ConfigError::UnsupportedOption { .. })));
    }

    #[test]
    fn test_unsupported_option_keeps_progress_file() {
        let dir = TempDir::new().unwrap();
        let corpus = dir.path().join("corpus");
        fs::create_dir(&corpus).unwrap();
        fs::write(corpus.join("a.js"), "x").unwrap();
        let progress = dir.path().join("progress.log");
        let report = dir.path().join("report.txt");
        fs::write(&progress, "previous run log\n").unwrap();

        let argv: Vec<OsString> = vec![
            "parsebench".into(),
            "-p".into(),
            "nonempty".into(),
            "-l".into(),
            progress.clone().into_os_string(),
            "-r".into(),
            report.clone().into_os_string(),
            "-o".into(),
            "bogus-flag".into(),
            corpus.into_os_string(),
        ];
        let cli = parse_args(&registry(), argv).unwrap();
        let err = Invocation::resolve(&cli, &ParsebenchConfig::default())
            .unwrap()
            .execute(&mut registry())
            .unwrap_err();

        assert!(err.is_config());
        assert!(matches!(
            err,
            EngineError::Config(ConfigError::UnsupportedOption { ref option, .. }) if option == "bogus-flag"
        ));
        assert_eq!(fs::read_to_string(&progress).unwrap(), "previous run log\n");
        assert!(!report.exists());
    }
}
