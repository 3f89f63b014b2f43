//! `cssvar-fallback`: add literal fallbacks before `var()` declarations.
//!
//! ```text
//! cssvar-fallback --primary static/css/main.css static/css/login.css
//! cssvar-fallback --config fallbacks.toml --check
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use cssvar_fallback::Result;
use cssvar_fallback::prelude::*;

/// Exit code when a file failed or the run could not start.
const EXIT_FAILURE: u8 = 1;
/// Exit code when `--check` finds files that are out of date.
const EXIT_OUT_OF_DATE: u8 = 2;

/// Rewrite stylesheets so every `var()` declaration has a literal fallback.
#[derive(Debug, Parser)]
#[command(name = "cssvar-fallback", version, about)]
struct Args {
    /// Read settings from a TOML configuration file.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Stylesheet whose root scope declares the variables.
    #[arg(short, long, value_name = "FILE", required_unless_present = "config")]
    primary: Option<PathBuf>,

    /// Further stylesheets to rewrite with the primary's variables.
    #[arg(value_name = "TARGET")]
    targets: Vec<PathBuf>,

    /// Selector of the rule declaring the variables.
    #[arg(long, value_name = "SELECTOR")]
    root_selector: Option<String>,

    /// Do not write; exit with status 2 if any file would change.
    #[arg(long)]
    check: bool,

    /// Keep running and re-process whenever a stylesheet changes.
    #[cfg(feature = "hot-reload")]
    #[arg(short, long, conflicts_with = "check")]
    watch: bool,

    /// Log more (repeat for more detail).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors.
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Args {
    /// Combine the configuration file (if any) with command-line overrides.
    fn pipeline_config(&self) -> Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_toml_file(path)?,
            None => PipelineConfig::new(PathBuf::new()),
        };
        if let Some(primary) = &self.primary {
            config.primary = primary.clone();
        }

        config.targets.extend(self.targets.iter().cloned());
        if let Some(selector) = &self.root_selector {
            config.root_selector = selector.clone();
        }
        config.check |= self.check;

        config.validate(self.config.as_deref().unwrap_or(config.primary.as_path()))?;
        Ok(config)
    }

    fn log_level(&self) -> tracing::Level {
        if self.quiet {
            return tracing::Level::ERROR;
        }
        match self.verbose {
            0 => tracing::Level::INFO,
            1 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = match args.pipeline_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            return ExitCode::from(EXIT_FAILURE);
        }
    };
    let pipeline = FallbackPipeline::new(config);

    let code = run_once(&pipeline);

    #[cfg(feature = "hot-reload")]
    if args.watch {
        if let Err(e) = watch(&pipeline) {
            tracing::error!("{}", e);
            return ExitCode::from(EXIT_FAILURE);
        }
    }

    code
}

/// Run the pipeline once and turn the report into an exit code.
fn run_once(pipeline: &FallbackPipeline) -> ExitCode {
    let report = match pipeline.run() {
        Ok(report) => report,
        Err(_) => return ExitCode::from(EXIT_FAILURE),
    };

    tracing::info!(
        "{} file(s) processed, {} fallback(s), {} unresolved",
        report.files.len(),
        report.total_inserted(),
        report.total_unresolved()
    );

    exit_code(&report, pipeline.config().check)
}

fn exit_code(report: &RunReport, check: bool) -> ExitCode {
    if report.has_failures() {
        return ExitCode::from(EXIT_FAILURE);
    }

    if check {
        let changed = report.changed_files();
        for path in &changed {
            tracing::warn!("{} is out of date", path.display());
        }
        if !changed.is_empty() {
            return ExitCode::from(EXIT_OUT_OF_DATE);
        }
    }

    ExitCode::SUCCESS
}

#[cfg(feature = "hot-reload")]
fn watch(pipeline: &FallbackPipeline) -> Result<()> {
    let mut watcher = PipelineWatcher::new()?;
    watcher.watch_config(pipeline.config())?;
    tracing::info!("Watching for changes (Ctrl+C to stop)");

    loop {
        let changed = watcher.wait()?;
        if changed.is_empty() {
            continue;
        }
        for path in &changed {
            tracing::info!("Changed: {}", path.display());
        }
        run_once(pipeline);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use cssvar_fallback::Error;

    fn parse(args: &[&str]) -> std::result::Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("cssvar-fallback").chain(args.iter().copied()))
    }

    #[test]
    fn command_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn primary_and_targets() {
        let args = parse(&["--primary", "main.css", "a.css", "b.css"]).unwrap();
        let config = args.pipeline_config().unwrap();

        assert_eq!(config.primary, PathBuf::from("main.css"));
        assert_eq!(config.targets, [PathBuf::from("a.css"), PathBuf::from("b.css")]);
        assert_eq!(config.root_selector, ":root");
        assert!(!config.check);
    }

    #[test]
    fn primary_or_config_is_required() {
        assert!(parse(&["a.css"]).is_err());
    }

    #[test]
    fn overrides() {
        let args = parse(&["-p", "main.css", "--root-selector", "html", "--check"]).unwrap();
        let config = args.pipeline_config().unwrap();

        assert_eq!(config.root_selector, "html");
        assert!(config.check);
    }

    #[test]
    fn empty_root_selector_is_rejected() {
        let args = parse(&["-p", "main.css", "--root-selector", " "]).unwrap();
        assert!(matches!(args.pipeline_config(), Err(Error::Config { .. })));
    }

    #[test]
    fn verbosity() {
        assert_eq!(parse(&["-p", "a.css"]).unwrap().log_level(), tracing::Level::INFO);
        assert_eq!(parse(&["-p", "a.css", "-vv"]).unwrap().log_level(), tracing::Level::TRACE);
        assert_eq!(parse(&["-p", "a.css", "-q"]).unwrap().log_level(), tracing::Level::ERROR);
        assert!(parse(&["-p", "a.css", "-q", "-v"]).is_err());
    }

    #[test]
    fn check_exit_codes() {
        let clean = RunReport::default();
        assert_eq!(exit_code(&clean, true), ExitCode::SUCCESS);

        let stale = RunReport {
            variables: 0,
            files: vec![FileReport {
                path: "a.css".into(),
                outcome: Ok(FileSummary {
                    status: FileStatus::WouldRewrite,
                    removed: 0,
                    inserted: 1,
                    unresolved: vec![],
                }),
            }],
        };
        assert_eq!(exit_code(&stale, true), ExitCode::from(EXIT_OUT_OF_DATE));
    }
}
