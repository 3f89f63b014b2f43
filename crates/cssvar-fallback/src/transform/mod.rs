//! The two stylesheet passes: remove stale fallbacks, then inject fresh ones.
//!
//! Removal always runs to completion before injection starts: no generated
//! declaration from an earlier run is ever kept or updated in place.

mod inject;
mod remove;

pub use inject::{InjectionReport, UnresolvedDeclaration, inject_fallbacks};
pub use remove::remove_fallbacks;

pub(crate) use remove::is_canonical;
