//! Resolution of `var()` references to literal values.

mod error;
mod resolver;

pub use error::ResolveError;
pub use resolver::{Resolution, ValueResolver, VariableReference};
