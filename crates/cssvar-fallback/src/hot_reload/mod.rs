//! Watch mode: re-run the pipeline when stylesheets change.

mod watcher;

pub use watcher::PipelineWatcher;
