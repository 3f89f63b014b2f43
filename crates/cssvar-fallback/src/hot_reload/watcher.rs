//! File watching for re-running the pipeline.

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use notify_debouncer_mini::{DebounceEventResult, DebouncedEventKind, Debouncer, new_debouncer};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::Duration;

use crate::pipeline::PipelineConfig;
use crate::{Error, Result};

/// Watches stylesheet files and reports debounced changes.
///
/// Parent directories are watched rather than the files themselves, since
/// many editors save by replacing the file.
///
/// # Example
///
/// ```ignore
/// let mut watcher = PipelineWatcher::new()?;
/// watcher.watch_config(pipeline.config())?;
///
/// loop {
///     let changed = watcher.wait()?;
///     if !changed.is_empty() {
///         pipeline.run()?;
///     }
/// }
/// ```
pub struct PipelineWatcher {
    debouncer: Debouncer<RecommendedWatcher>,
    rx: Receiver<DebounceEventResult>,
    watched_files: HashSet<PathBuf>,
    watched_dirs: HashSet<PathBuf>,
}

impl std::fmt::Debug for PipelineWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineWatcher")
            .field("watched_files", &self.watched_files)
            .field("watched_dirs", &self.watched_dirs)
            .finish_non_exhaustive()
    }
}

impl PipelineWatcher {
    /// Create a watcher with the default debounce delay.
    pub fn new() -> Result<Self> {
        Self::with_delay(Duration::from_millis(100))
    }

    /// Create a watcher with a custom debounce delay.
    pub fn with_delay(delay: Duration) -> Result<Self> {
        let (tx, rx) = mpsc::channel();

        let debouncer = new_debouncer(delay, tx).map_err(|e| Error::HotReload(e.to_string()))?;

        Ok(Self {
            debouncer,
            rx,
            watched_files: HashSet::new(),
            watched_dirs: HashSet::new(),
        })
    }

    /// Watch every file of a pipeline's target set.
    pub fn watch_config(&mut self, config: &PipelineConfig) -> Result<()> {
        for path in config.target_set() {
            self.watch(&path)?;
        }
        Ok(())
    }

    /// Start watching a stylesheet file.
    pub fn watch(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path
            .as_ref()
            .canonicalize()
            .map_err(|e| Error::io(path.as_ref(), e))?;
        let dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("/"));

        if !self.watched_dirs.contains(&dir) {
            self.debouncer
                .watcher()
                .watch(&dir, RecursiveMode::NonRecursive)
                .map_err(|e| Error::HotReload(e.to_string()))?;
            self.watched_dirs.insert(dir);
        }

        if self.watched_files.insert(path.clone()) {
            tracing::info!("Watching stylesheet: {}", path.display());
        }

        Ok(())
    }

    /// Get the watched files.
    pub fn watched_files(&self) -> impl Iterator<Item = &Path> {
        self.watched_files.iter().map(PathBuf::as_path)
    }

    /// Collect changes that are already pending, without blocking.
    pub fn poll(&mut self) -> Vec<PathBuf> {
        let mut changed = vec![];

        loop {
            match self.rx.try_recv() {
                Ok(result) => self.collect(result, &mut changed),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    tracing::error!("Stylesheet watcher disconnected");
                    break;
                }
            }
        }

        changed
    }

    /// Block until at least one batch of events arrives, then collect every
    /// pending change.
    ///
    /// The returned list can be empty when the events only concerned other
    /// files in the watched directories.
    pub fn wait(&mut self) -> Result<Vec<PathBuf>> {
        let first = self
            .rx
            .recv()
            .map_err(|_| Error::HotReload("watcher channel closed".to_string()))?;

        let mut changed = vec![];
        self.collect(first, &mut changed);
        for path in self.poll() {
            if !changed.contains(&path) {
                changed.push(path);
            }
        }

        Ok(changed)
    }

    fn collect(&self, result: DebounceEventResult, changed: &mut Vec<PathBuf>) {
        match result {
            Ok(events) => {
                for event in events {
                    if event.kind != DebouncedEventKind::Any {
                        continue;
                    }
                    let path = event
                        .path
                        .canonicalize()
                        .unwrap_or_else(|_| event.path.clone());
                    if self.watched_files.contains(&path) && !changed.contains(&path) {
                        tracing::debug!("Stylesheet changed: {}", path.display());
                        changed.push(path);
                    }
                }
            }
            Err(e) => {
                tracing::warn!("File watcher error: {}", e);
            }
        }
    }
}
