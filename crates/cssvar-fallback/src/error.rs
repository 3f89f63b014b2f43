//! Error types for the fallback pipeline.

use std::path::PathBuf;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while processing stylesheets.
///
/// Every variant is scoped to a single file (or to the configuration). Failing
/// to resolve a variable reference is not an error at this level, see
/// [`ResolveError`](crate::resolve::ResolveError).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// CSS parsing error.
    #[error("CSS parse error at line {line}, column {column}: {message}")]
    Parse {
        message: String,
        line: u32,
        column: u32,
    },

    /// Reading a stylesheet failed.
    #[error("Failed to read stylesheet '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing a transformed stylesheet back failed.
    #[error("Failed to write stylesheet '{path}': {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid pipeline configuration.
    #[error("Invalid configuration '{path}': {message}")]
    Config { path: PathBuf, message: String },

    /// Hot-reload error.
    #[cfg(feature = "hot-reload")]
    #[error("Hot-reload error: {0}")]
    HotReload(String),
}

impl Error {
    /// Create a parse error.
    pub fn parse(message: impl Into<String>, line: u32, column: u32) -> Self {
        Self::Parse {
            message: message.into(),
            line,
            column,
        }
    }

    /// Create an I/O error for a failed read.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create an I/O error for a failed write.
    pub fn persist(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Persist {
            path: path.into(),
            source,
        }
    }

    /// Create a configuration error.
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }
}
