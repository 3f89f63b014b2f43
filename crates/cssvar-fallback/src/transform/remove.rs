//! Removal of previously generated fallbacks.

use crate::stylesheet::{Node, Stylesheet};

/// Remove every generated declaration from the stylesheet, at every depth.
///
/// Returns the number of declarations removed. Only the generated flag is
/// looked at; values are not inspected.
pub fn remove_fallbacks(sheet: &mut Stylesheet) -> usize {
    let mut removed = 0;

    sheet.visit_blocks_mut(|nodes| {
        let before = nodes.len();
        nodes.retain(|node| !node.is_generated());
        removed += before - nodes.len();
    });

    if removed > 0 {
        tracing::debug!("Removed {} generated fallback declaration(s)", removed);
    }

    removed
}

/// Check that no generated declaration is left anywhere in `nodes`.
pub(crate) fn is_canonical(nodes: &[Node]) -> bool {
    nodes.iter().all(|node| match node {
        Node::Declaration(decl) => !decl.generated,
        Node::Rule(rule) => is_canonical(&rule.children),
        Node::Comment(_) | Node::AtStatement(_) => true,
    })
}
