//! Outcome of a pipeline run.

use std::path::PathBuf;

use crate::Result;
use crate::transform::UnresolvedDeclaration;

/// What happened to one file's contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileStatus {
    /// The file was written with new contents.
    Rewritten,
    /// The output equals the current contents; nothing was written.
    Unchanged,
    /// Check mode: the file would have been rewritten.
    WouldRewrite,
}

impl FileStatus {
    /// Whether the file's contents differ from the pipeline output.
    pub fn is_changed(self) -> bool {
        matches!(self, FileStatus::Rewritten | FileStatus::WouldRewrite)
    }
}

/// Counters for one successfully processed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSummary {
    /// Whether the file was written.
    pub status: FileStatus,
    /// Generated declarations removed.
    pub removed: usize,
    /// Generated declarations inserted.
    pub inserted: usize,
    /// Declarations left without a fallback.
    pub unresolved: Vec<UnresolvedDeclaration>,
}

/// Result for one target file.
#[derive(Debug)]
pub struct FileReport {
    /// The target path.
    pub path: PathBuf,
    /// Summary, or the error that stopped this file.
    pub outcome: Result<FileSummary>,
}

/// Result of one pipeline run.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Number of variables in the table.
    pub variables: usize,
    /// One entry per target file, in processing order.
    pub files: Vec<FileReport>,
}

impl RunReport {
    /// Files that failed to process.
    pub fn failures(&self) -> impl Iterator<Item = &FileReport> {
        self.files.iter().filter(|file| file.outcome.is_err())
    }

    /// Whether any file failed.
    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }

    /// Summaries of files that processed successfully.
    pub fn summaries(&self) -> impl Iterator<Item = (&PathBuf, &FileSummary)> {
        self.files
            .iter()
            .filter_map(|file| file.outcome.as_ref().ok().map(|summary| (&file.path, summary)))
    }

    /// Paths whose contents were (or in check mode would be) changed.
    pub fn changed_files(&self) -> Vec<&PathBuf> {
        self.summaries()
            .filter(|(_, summary)| summary.status.is_changed())
            .map(|(path, _)| path)
            .collect()
    }

    /// Total fallbacks inserted across all files.
    pub fn total_inserted(&self) -> usize {
        self.summaries().map(|(_, summary)| summary.inserted).sum()
    }

    /// Total declarations left without a fallback across all files.
    pub fn total_unresolved(&self) -> usize {
        self.summaries().map(|(_, summary)| summary.unresolved.len()).sum()
    }
}
