//! Static fallbacks for CSS custom properties.
//!
//! This crate rewrites stylesheets so that every declaration using `var()`
//! is preceded by the same declaration with the variable's current literal
//! value, marked with a trailing `/* fallback */` comment:
//!
//! ```css
//! a {
//!   color: #ff6600 /* fallback */;
//!   color: var(--accent);
//! }
//! ```
//!
//! Engines without custom property support keep the literal; engines with
//! support override it with the `var()` declaration that follows.
//!
//! - **Variables**: read from the `:root` rule of one primary stylesheet
//! - **Idempotence**: previous fallbacks are removed before new ones are
//!   injected, so re-running on processed output changes nothing
//! - **Multiple files**: every target shares the primary's variables
//! - **Hot Reload**: re-run automatically when stylesheets change
//!
//! # Example
//!
//! ```ignore
//! use cssvar_fallback::prelude::*;
//!
//! let config = PipelineConfig::new("static/css/main.css")
//!     .with_target("static/css/login.css");
//! let report = FallbackPipeline::new(config).run()?;
//! println!("{} fallback(s) written", report.total_inserted());
//! ```

pub mod marker;
pub mod parser;
pub mod pipeline;
pub mod resolve;
pub mod stylesheet;
pub mod transform;
pub mod variables;

#[cfg(feature = "hot-reload")]
pub mod hot_reload;

mod error;

pub use error::{Error, Result};

/// Prelude module with commonly used types.
pub mod prelude {
    pub use crate::pipeline::{
        FallbackPipeline, FileReport, FileStatus, FileSummary, PipelineConfig, RunReport,
        transform_css,
    };
    pub use crate::resolve::{Resolution, ResolveError, ValueResolver};
    pub use crate::stylesheet::{Declaration, Node, Rule, Stylesheet};
    pub use crate::transform::{InjectionReport, inject_fallbacks, remove_fallbacks};
    pub use crate::variables::{DEFAULT_ROOT_SELECTOR, VariableTable};

    #[cfg(feature = "hot-reload")]
    pub use crate::hot_reload::PipelineWatcher;
}
