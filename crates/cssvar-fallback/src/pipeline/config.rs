//! Pipeline configuration.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::variables::DEFAULT_ROOT_SELECTOR;
use crate::{Error, Result};

/// What a pipeline run reads and rewrites.
///
/// # Example
///
/// ```toml
/// primary = "static/admin/css/bananas.css"
/// targets = ["static/admin/css/login.css"]
/// root_selector = ":root"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    /// Stylesheet whose root scope declares the variables.
    pub primary: PathBuf,
    /// Stylesheets to rewrite. The primary is always rewritten too.
    #[serde(default)]
    pub targets: Vec<PathBuf>,
    /// Selector of the rule holding the global variables.
    #[serde(default = "default_root_selector")]
    pub root_selector: String,
    /// Report files that would change without writing them.
    #[serde(default)]
    pub check: bool,
}

fn default_root_selector() -> String {
    DEFAULT_ROOT_SELECTOR.to_string()
}

impl PipelineConfig {
    /// Create a configuration that only rewrites the primary stylesheet.
    pub fn new(primary: impl Into<PathBuf>) -> Self {
        Self {
            primary: primary.into(),
            targets: vec![],
            root_selector: default_root_selector(),
            check: false,
        }
    }

    /// Add a target stylesheet.
    pub fn with_target(mut self, target: impl Into<PathBuf>) -> Self {
        self.targets.push(target.into());
        self
    }

    /// Add several target stylesheets.
    pub fn with_targets<I, P>(mut self, targets: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.targets.extend(targets.into_iter().map(Into::into));
        self
    }

    /// Use a different root-scope selector.
    pub fn with_root_selector(mut self, selector: impl Into<String>) -> Self {
        self.root_selector = selector.into();
        self
    }

    /// Enable or disable check mode.
    pub fn with_check(mut self, check: bool) -> Self {
        self.check = check;
        self
    }

    /// Load a configuration from a TOML file.
    ///
    /// Relative paths in the file are resolved against the file's directory.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
        Self::from_toml_str(&text, base_dir, path)
    }

    /// Parse a configuration from TOML text.
    ///
    /// `origin` names the source in error messages.
    pub fn from_toml_str(text: &str, base_dir: &Path, origin: &Path) -> Result<Self> {
        let mut config: Self =
            toml::from_str(text).map_err(|e| Error::config(origin, e.to_string()))?;

        config.validate(origin)?;

        config.primary = base_dir.join(&config.primary);
        for target in &mut config.targets {
            *target = base_dir.join(&*target);
        }

        Ok(config)
    }

    /// Check the configuration for values the pipeline cannot work with.
    pub fn validate(&self, origin: &Path) -> Result<()> {
        if self.primary.as_os_str().is_empty() {
            return Err(Error::config(origin, "'primary' must not be empty"));
        }
        if self.root_selector.trim().is_empty() {
            return Err(Error::config(origin, "'root_selector' must not be empty"));
        }
        Ok(())
    }

    /// The files one run rewrites, in processing order.
    ///
    /// Targets keep their declared order. The primary is prepended unless it
    /// is already listed, and paths naming the same file are kept once.
    pub fn target_set(&self) -> Vec<PathBuf> {
        let mut seen = HashSet::new();
        let mut files = vec![];

        let primary_listed = self
            .targets
            .iter()
            .any(|target| file_key(target) == file_key(&self.primary));
        let candidates = (!primary_listed)
            .then_some(&self.primary)
            .into_iter()
            .chain(&self.targets);

        for path in candidates {
            if seen.insert(file_key(path)) {
                files.push(path.clone());
            } else {
                tracing::warn!("Skipping duplicate target {}", path.display());
            }
        }

        files
    }
}

/// Identity of a file for de-duplication.
fn file_key(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
