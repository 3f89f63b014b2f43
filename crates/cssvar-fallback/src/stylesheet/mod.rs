//! Stylesheet tree: rules, declarations and the stylesheet itself.

mod node;
mod sheet;

pub use node::{Declaration, Node, Rule};
pub use sheet::Stylesheet;
