//! Multi-file orchestration.
//!
//! One run builds the variable table from the primary stylesheet, then takes
//! every target through remove, inject, print and persist. The table is
//! shared read-only by all targets, so a file that declares no variables of
//! its own still gets the primary's values. A failing file is reported and
//! the run moves on to the next one.

mod config;
mod persist;
mod report;

pub use config::PipelineConfig;
pub use persist::persist;
pub use report::{FileReport, FileStatus, FileSummary, RunReport};

use std::path::Path;

use crate::stylesheet::Stylesheet;
use crate::transform::{self, InjectionReport};
use crate::variables::VariableTable;
use crate::{Error, Result};

/// The result of transforming one stylesheet's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transformed {
    /// Printed output.
    pub css: String,
    /// Generated declarations removed.
    pub removed: usize,
    /// What the injection pass did.
    pub injection: InjectionReport,
}

/// Run both passes over a stylesheet and print it.
///
/// # Errors
///
/// Fails only when `css` does not parse.
pub fn transform_css(css: &str, table: &VariableTable) -> Result<Transformed> {
    let mut sheet = Stylesheet::from_css(css)?;

    let removed = transform::remove_fallbacks(&mut sheet);
    debug_assert!(transform::is_canonical(&sheet.nodes));
    let injection = transform::inject_fallbacks(&mut sheet, table);

    Ok(Transformed {
        css: sheet.to_css(),
        removed,
        injection,
    })
}

/// Runs the fallback pipeline for one configuration.
///
/// # Example
///
/// ```ignore
/// let config = PipelineConfig::new("static/css/main.css").with_target("static/css/login.css");
/// let report = FallbackPipeline::new(config).run()?;
/// for failure in report.failures() {
///     eprintln!("{}: {:?}", failure.path.display(), failure.outcome);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct FallbackPipeline {
    config: PipelineConfig,
}

impl FallbackPipeline {
    /// Create a pipeline.
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Read the primary stylesheet and build the variable table.
    pub fn build_table(&self) -> Result<VariableTable> {
        let primary = Stylesheet::from_file(&self.config.primary)?;
        Ok(VariableTable::from_root_scope(
            &primary,
            &self.config.root_selector,
        ))
    }

    /// Run the pipeline over the whole target set.
    ///
    /// # Errors
    ///
    /// Returns an error only when the primary stylesheet cannot be read or
    /// parsed. Failures of individual targets are recorded in the report.
    pub fn run(&self) -> Result<RunReport> {
        let table = self.build_table().inspect_err(|e| {
            tracing::error!(
                "Cannot build variables from {}: {}",
                self.config.primary.display(),
                e
            );
        })?;
        tracing::info!(
            "Loaded {} variable(s) from {}",
            table.len(),
            self.config.primary.display()
        );

        let files = self
            .config
            .target_set()
            .into_iter()
            .map(|path| {
                let outcome = self.process_file(&path, &table);
                log_outcome(&path, &outcome);
                FileReport { path, outcome }
            })
            .collect();

        Ok(RunReport {
            variables: table.len(),
            files,
        })
    }

    /// Transform one file with an already built table.
    pub fn process_file(&self, path: &Path, table: &VariableTable) -> Result<FileSummary> {
        let source = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let transformed = transform_css(&source, table)?;

        let status = if transformed.css == source {
            FileStatus::Unchanged
        } else if self.config.check {
            FileStatus::WouldRewrite
        } else {
            persist(path, &transformed.css)?;
            FileStatus::Rewritten
        };

        Ok(FileSummary {
            status,
            removed: transformed.removed,
            inserted: transformed.injection.inserted,
            unresolved: transformed.injection.unresolved,
        })
    }
}

fn log_outcome(path: &Path, outcome: &Result<FileSummary>) {
    match outcome {
        Ok(summary) => {
            let verb = match summary.status {
                FileStatus::Rewritten => "Rewrote",
                FileStatus::Unchanged => "Unchanged",
                FileStatus::WouldRewrite => "Would rewrite",
            };
            tracing::info!(
                "{} {} ({} fallback(s), {} unresolved)",
                verb,
                path.display(),
                summary.inserted,
                summary.unresolved.len()
            );
        }
        Err(e) => tracing::error!("Failed to process {}: {}", path.display(), e),
    }
}
